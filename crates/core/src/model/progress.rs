use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::TrackId;
use crate::percent::rounded_percentage;

/// Everything persisted for all tracks, stored as one blob.
pub type ProgressData = BTreeMap<TrackId, TrackProgress>;

//
// ─── AXES ──────────────────────────────────────────────────────────────────────
//

/// One of the independent criteria that make up overall track completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionAxis {
    ModulesRead,
    QuizCompleted,
    LabsRead,
    DiagramViewed,
    FlashcardsViewed,
}

impl CompletionAxis {
    pub const ALL: [CompletionAxis; 5] = [
        CompletionAxis::ModulesRead,
        CompletionAxis::QuizCompleted,
        CompletionAxis::LabsRead,
        CompletionAxis::DiagramViewed,
        CompletionAxis::FlashcardsViewed,
    ];
}

//
// ─── TRACK PROGRESS ────────────────────────────────────────────────────────────
//

/// Per-track learner progress.
///
/// Serialized in camelCase so the stored blob keeps the `{ [trackId]: {...} }`
/// shape the site has always written. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackProgress {
    modules_read: bool,
    quiz_completed: bool,
    quiz_score: u32,
    quiz_total: u32,
    flashcards_viewed: BTreeSet<String>,
    flashcards_total: u32,
    labs_read: bool,
    #[serde(rename = "mindmapViewed", alias = "diagramViewed")]
    diagram_viewed: bool,
}

impl TrackProgress {
    #[must_use]
    pub fn modules_read(&self) -> bool {
        self.modules_read
    }

    #[must_use]
    pub fn quiz_completed(&self) -> bool {
        self.quiz_completed
    }

    #[must_use]
    pub fn quiz_score(&self) -> u32 {
        self.quiz_score
    }

    #[must_use]
    pub fn quiz_total(&self) -> u32 {
        self.quiz_total
    }

    #[must_use]
    pub fn flashcards_viewed(&self) -> &BTreeSet<String> {
        &self.flashcards_viewed
    }

    #[must_use]
    pub fn flashcards_total(&self) -> u32 {
        self.flashcards_total
    }

    #[must_use]
    pub fn labs_read(&self) -> bool {
        self.labs_read
    }

    #[must_use]
    pub fn diagram_viewed(&self) -> bool {
        self.diagram_viewed
    }

    /// Returns true if the flag changed.
    pub fn mark_modules_read(&mut self) -> bool {
        !std::mem::replace(&mut self.modules_read, true)
    }

    /// Returns true if the flag changed.
    pub fn mark_labs_read(&mut self) -> bool {
        !std::mem::replace(&mut self.labs_read, true)
    }

    /// Returns true if the flag changed.
    pub fn mark_diagram_viewed(&mut self) -> bool {
        !std::mem::replace(&mut self.diagram_viewed, true)
    }

    /// Stores the latest quiz attempt, replacing any previous one.
    pub fn record_quiz_result(&mut self, score: u32, total: u32) {
        self.quiz_completed = true;
        self.quiz_score = score;
        self.quiz_total = total;
    }

    /// Adds `term` to the viewed set and refreshes the known total.
    ///
    /// Returns true if the term had not been seen before.
    pub fn record_flashcard_viewed(&mut self, term: &str, total_terms: u32) -> bool {
        self.flashcards_total = total_terms;
        if self.flashcards_viewed.contains(term) {
            return false;
        }
        self.flashcards_viewed.insert(term.to_owned());
        true
    }

    #[must_use]
    pub fn flashcards_complete(&self) -> bool {
        self.flashcards_total > 0
            && u32::try_from(self.flashcards_viewed.len()).ok() == Some(self.flashcards_total)
    }

    #[must_use]
    pub fn is_complete(&self, axis: CompletionAxis) -> bool {
        match axis {
            CompletionAxis::ModulesRead => self.modules_read,
            CompletionAxis::QuizCompleted => self.quiz_completed,
            CompletionAxis::LabsRead => self.labs_read,
            CompletionAxis::DiagramViewed => self.diagram_viewed,
            CompletionAxis::FlashcardsViewed => self.flashcards_complete(),
        }
    }

    #[must_use]
    pub fn completed_axes(&self) -> u32 {
        let done = CompletionAxis::ALL
            .iter()
            .filter(|axis| self.is_complete(**axis))
            .count();
        u32::try_from(done).unwrap_or(u32::MAX)
    }

    /// Share of completed axes, rounded to the nearest whole percent.
    #[must_use]
    pub fn overall_percentage(&self) -> u8 {
        let axes = u32::try_from(CompletionAxis::ALL.len()).unwrap_or(u32::MAX);
        rounded_percentage(self.completed_axes(), axes)
    }
}
