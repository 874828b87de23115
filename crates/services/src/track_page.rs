use std::fmt;
use std::sync::Arc;

use track_core::Clock;
use track_core::model::{
    AnswerFeedback, ContentBundle, QuizSession, QuizStep, TrackInfo, TrackProgress,
};

use crate::error::PageError;
use crate::progress_store::ProgressStore;

/// Tabs of a track page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Modules,
    Quizzes,
    Labs,
    Flashcards,
    Diagram,
}

/// Page-level controller for one track.
///
/// Opening a section records it as viewed and a finished quiz records its
/// result. Everything else reads through to the bound `ProgressStore`.
pub struct TrackPage<'a> {
    info: TrackInfo,
    bundle: Arc<ContentBundle>,
    progress: &'a mut ProgressStore,
    clock: Clock,
    session: Option<QuizSession>,
}

impl<'a> TrackPage<'a> {
    #[must_use]
    pub fn new(
        info: TrackInfo,
        bundle: Arc<ContentBundle>,
        progress: &'a mut ProgressStore,
        clock: Clock,
    ) -> Self {
        Self {
            info,
            bundle,
            progress,
            clock,
            session: None,
        }
    }

    #[must_use]
    pub fn info(&self) -> &TrackInfo {
        &self.info
    }

    #[must_use]
    pub fn bundle(&self) -> &ContentBundle {
        &self.bundle
    }

    /// Marks the section as viewed where that counts toward completion.
    ///
    /// Quizzes and flashcards only count through answering and viewing cards.
    pub fn open_section(&mut self, section: Section) {
        let track = &self.info.id;
        match section {
            Section::Modules => self.progress.set_modules_read(track),
            Section::Labs => self.progress.set_labs_read(track),
            Section::Diagram => self.progress.set_diagram_viewed(track),
            Section::Quizzes | Section::Flashcards => {}
        }
    }

    /// Starts a fresh attempt, discarding any running one.
    pub fn start_quiz(&mut self) -> &QuizSession {
        let session = QuizSession::new(Arc::clone(self.bundle.quiz()), self.clock.now());
        tracing::debug!(track = %self.info.id, questions = session.quiz().len(), "quiz started");
        self.session.insert(session)
    }

    #[must_use]
    pub fn quiz_session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// # Errors
    ///
    /// Returns `PageError::NoQuizSession` before `start_quiz`, or the
    /// transition error when the selection is not allowed.
    pub fn select_answer(&mut self, option: usize) -> Result<AnswerFeedback, PageError> {
        let session = self.session.as_mut().ok_or(PageError::NoQuizSession)?;
        Ok(session.select_answer(option)?)
    }

    /// Moves to the next question. Finishing the quiz records the result.
    ///
    /// # Errors
    ///
    /// Returns `PageError::NoQuizSession` before `start_quiz`, or the
    /// transition error when the current question is unanswered.
    pub fn advance(&mut self) -> Result<QuizStep, PageError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(PageError::NoQuizSession)?;
        let step = session.advance(now)?;
        if let QuizStep::Complete(result) = step {
            tracing::debug!(
                track = %self.info.id,
                score = result.score,
                total = result.total,
                "quiz completed"
            );
            self.progress
                .record_quiz_result(&self.info.id, result.score, result.total);
        }
        Ok(step)
    }

    /// # Errors
    ///
    /// Returns `PageError::NoQuizSession` before `start_quiz`.
    pub fn restart_quiz(&mut self) -> Result<&QuizSession, PageError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(PageError::NoQuizSession)?;
        session.restart(now);
        Ok(&*session)
    }

    /// Records `term` as viewed. Returns true the first time it is seen.
    ///
    /// # Errors
    ///
    /// Returns `PageError::UnknownFlashcard` if the track has no such term.
    pub fn view_flashcard(&mut self, term: &str) -> Result<bool, PageError> {
        if !self.bundle.has_term(term) {
            return Err(PageError::UnknownFlashcard(term.to_owned()));
        }
        Ok(self
            .progress
            .record_flashcard_viewed(&self.info.id, term, self.bundle.flashcard_total()))
    }

    #[must_use]
    pub fn progress(&self) -> TrackProgress {
        self.progress.get_progress(&self.info.id)
    }

    #[must_use]
    pub fn overall_percentage(&self) -> u8 {
        self.progress.compute_overall_percentage(&self.info.id)
    }
}

impl fmt::Debug for TrackPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackPage")
            .field("track", &self.info.id)
            .field("clock", &self.clock)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
