use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::quiz::Quiz;
use crate::percent::rounded_percentage;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A transition that is not allowed from the current state.
///
/// The state is left untouched whenever one of these is returned, so callers
/// that want "ignore the click" semantics can simply drop the error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("current question is already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered yet")]
    NotAnswered,

    #[error("option {option} does not exist (question has {options} options)")]
    OptionOutOfRange { option: usize, options: usize },

    #[error("quiz is already complete")]
    Completed,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Unanswered,
    Answered { selected: usize },
}

/// Quiz progression. Strictly forward: `restart` is the only way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress {
        index: usize,
        score: u32,
        answer: Answer,
    },
    Complete {
        score: u32,
        total: u32,
    },
}

impl QuizState {
    pub const INITIAL: QuizState = QuizState::InProgress {
        index: 0,
        score: 0,
        answer: Answer::Unanswered,
    };

    /// Records `option` for the current question. Score moves in the same step.
    ///
    /// # Errors
    ///
    /// `AlreadyAnswered`, `OptionOutOfRange` or `Completed`.
    pub fn select_answer(self, quiz: &Quiz, option: usize) -> Result<Self, TransitionError> {
        let QuizState::InProgress {
            index,
            score,
            answer,
        } = self
        else {
            return Err(TransitionError::Completed);
        };
        if answer != Answer::Unanswered {
            return Err(TransitionError::AlreadyAnswered);
        }
        let question = quiz.get(index).ok_or(TransitionError::Completed)?;
        if option >= question.options().len() {
            return Err(TransitionError::OptionOutOfRange {
                option,
                options: question.options().len(),
            });
        }

        let score = if question.is_correct(option) {
            score.saturating_add(1)
        } else {
            score
        };
        Ok(QuizState::InProgress {
            index,
            score,
            answer: Answer::Answered { selected: option },
        })
    }

    /// Moves past an answered question, finishing the quiz after the last one.
    ///
    /// # Errors
    ///
    /// `NotAnswered` or `Completed`.
    pub fn advance(self, quiz: &Quiz) -> Result<Self, TransitionError> {
        match self {
            QuizState::Complete { .. } => Err(TransitionError::Completed),
            QuizState::InProgress {
                answer: Answer::Unanswered,
                ..
            } => Err(TransitionError::NotAnswered),
            QuizState::InProgress { index, score, .. } => {
                if index + 1 < quiz.len() {
                    Ok(QuizState::InProgress {
                        index: index + 1,
                        score,
                        answer: Answer::Unanswered,
                    })
                } else {
                    Ok(QuizState::Complete {
                        score,
                        total: quiz.total(),
                    })
                }
            }
        }
    }

    #[must_use]
    pub fn restart(self) -> Self {
        Self::INITIAL
    }

    #[must_use]
    pub fn score(self) -> u32 {
        match self {
            QuizState::InProgress { score, .. } | QuizState::Complete { score, .. } => score,
        }
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, QuizState::Complete { .. })
    }
}

//
// ─── VIEW DATA ─────────────────────────────────────────────────────────────────
//

/// What the learner sees right after answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// "Question `number` of `total`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizPosition {
    pub number: usize,
    pub total: usize,
}

/// Running "Score: score/answered" line. The current question counts once answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningScore {
    pub score: u32,
    pub answered: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBand {
    Excellent,
    Good,
    KeepStudying,
}

impl PerformanceBand {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => PerformanceBand::Excellent,
            60..=79 => PerformanceBand::Good,
            _ => PerformanceBand::KeepStudying,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent work! You've mastered this material.",
            PerformanceBand::Good => "Good job! Review the topics you missed.",
            PerformanceBand::KeepStudying => "Keep studying! Review the material and try again.",
        }
    }
}

/// Final outcome of a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score,
            total,
            percentage: rounded_percentage(score, total),
        }
    }

    #[must_use]
    pub fn band(&self) -> PerformanceBand {
        PerformanceBand::from_percentage(self.percentage)
    }
}

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Next { index: usize },
    Complete(QuizResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Transient attempt at a quiz. Never persisted.
#[derive(Clone)]
pub struct QuizSession {
    quiz: Arc<Quiz>,
    state: QuizState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz: Arc<Quiz>, started_at: DateTime<Utc>) -> Self {
        Self {
            quiz,
            state: QuizState::INITIAL,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::InProgress { index, .. } => self.quiz.get(index),
            QuizState::Complete { .. } => None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<QuizPosition> {
        match self.state {
            QuizState::InProgress { index, .. } => Some(QuizPosition {
                number: index + 1,
                total: self.quiz.len(),
            }),
            QuizState::Complete { .. } => None,
        }
    }

    /// The selected option for the current question, once answered.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            QuizState::InProgress {
                answer: Answer::Answered { selected },
                ..
            } => Some(selected),
            _ => None,
        }
    }

    #[must_use]
    pub fn running_score(&self) -> RunningScore {
        match self.state {
            QuizState::InProgress {
                index,
                score,
                answer,
            } => {
                let answered = index + usize::from(answer != Answer::Unanswered);
                RunningScore {
                    score,
                    answered: u32::try_from(answered).unwrap_or(u32::MAX),
                }
            }
            QuizState::Complete { score, total } => RunningScore {
                score,
                answered: total,
            },
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        match self.state {
            QuizState::Complete { score, total } => Some(QuizResult::new(score, total)),
            QuizState::InProgress { .. } => None,
        }
    }

    /// # Errors
    ///
    /// See [`QuizState::select_answer`]. The session is unchanged on error.
    pub fn select_answer(&mut self, option: usize) -> Result<AnswerFeedback, TransitionError> {
        let next = self.state.select_answer(&self.quiz, option)?;
        self.state = next;

        let question = self
            .current_question()
            .ok_or(TransitionError::Completed)?;
        Ok(AnswerFeedback {
            question_id: question.id(),
            selected: option,
            correct_answer: question.correct_answer(),
            is_correct: question.is_correct(option),
            explanation: question.explanation().to_owned(),
        })
    }

    /// `now` stamps `completed_at` when this call finishes the quiz.
    ///
    /// # Errors
    ///
    /// See [`QuizState::advance`]. The session is unchanged on error.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<QuizStep, TransitionError> {
        self.state = self.state.advance(&self.quiz)?;
        match self.state {
            QuizState::InProgress { index, .. } => Ok(QuizStep::Next { index }),
            QuizState::Complete { score, total } => {
                self.completed_at = Some(now);
                Ok(QuizStep::Complete(QuizResult::new(score, total)))
            }
        }
    }

    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.state = self.state.restart();
        self.started_at = now;
        self.completed_at = None;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.quiz.len())
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn quiz_with_key(key: &[usize]) -> Arc<Quiz> {
        let questions = key
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                let id = u32::try_from(i + 1).unwrap();
                Question::new(
                    QuestionId::new(id),
                    format!("Question {id}"),
                    vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct,
                    format!("Because {correct}"),
                )
                .unwrap()
            })
            .collect();
        Arc::new(Quiz::new(questions).unwrap())
    }

    fn play(session: &mut QuizSession, answers: &[usize]) -> QuizResult {
        let mut result = None;
        for &answer in answers {
            session.select_answer(answer).unwrap();
            if let QuizStep::Complete(r) = session.advance(fixed_now()).unwrap() {
                result = Some(r);
            }
        }
        result.expect("quiz should complete")
    }

    #[test]
    fn perfect_run_scores_full_marks() {
        let mut session = QuizSession::new(quiz_with_key(&[1, 0, 2, 1, 3]), fixed_now());
        let result = play(&mut session, &[1, 0, 2, 1, 3]);
        assert_eq!(result.score, 5);
        assert_eq!(result.percentage, 100);
        assert_eq!(result.band(), PerformanceBand::Excellent);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn all_zero_answers_only_match_second_question() {
        let mut session = QuizSession::new(quiz_with_key(&[1, 0, 2, 1, 3]), fixed_now());
        let result = play(&mut session, &[0, 0, 0, 0, 0]);
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 5);
        assert_eq!(result.percentage, 20);
        assert_eq!(result.band(), PerformanceBand::KeepStudying);
    }

    #[test]
    fn second_selection_is_rejected_and_changes_nothing() {
        let mut session = QuizSession::new(quiz_with_key(&[2]), fixed_now());
        let feedback = session.select_answer(2).unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.explanation, "Because 2");

        let before = session.state();
        assert_eq!(
            session.select_answer(0).unwrap_err(),
            TransitionError::AlreadyAnswered
        );
        assert_eq!(session.state(), before);
        assert_eq!(session.selected(), Some(2));
        assert_eq!(session.state().score(), 1);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = QuizSession::new(quiz_with_key(&[0, 1]), fixed_now());
        assert_eq!(
            session.advance(fixed_now()).unwrap_err(),
            TransitionError::NotAnswered
        );
        assert_eq!(session.state(), QuizState::INITIAL);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut session = QuizSession::new(quiz_with_key(&[0]), fixed_now());
        let err = session.select_answer(4).unwrap_err();
        assert_eq!(
            err,
            TransitionError::OptionOutOfRange {
                option: 4,
                options: 4
            }
        );
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn complete_is_terminal_until_restart() {
        let mut session = QuizSession::new(quiz_with_key(&[0]), fixed_now());
        play(&mut session, &[0]);

        assert_eq!(
            session.select_answer(0).unwrap_err(),
            TransitionError::Completed
        );
        assert_eq!(
            session.advance(fixed_now()).unwrap_err(),
            TransitionError::Completed
        );

        session.restart(fixed_now());
        assert_eq!(session.state(), QuizState::INITIAL);
        assert_eq!(session.state().score(), 0);
        assert!(session.completed_at().is_none());
    }

    #[test]
    fn restart_mid_quiz_returns_to_first_question() {
        let mut session = QuizSession::new(quiz_with_key(&[0, 1, 2]), fixed_now());
        session.select_answer(0).unwrap();
        session.advance(fixed_now()).unwrap();
        session.select_answer(1).unwrap();

        session.restart(fixed_now());
        assert_eq!(session.position(), Some(QuizPosition { number: 1, total: 3 }));
        assert_eq!(session.selected(), None);
        assert_eq!(session.state().score(), 0);
    }

    #[test]
    fn running_score_counts_answered_question() {
        let mut session = QuizSession::new(quiz_with_key(&[0, 1]), fixed_now());
        assert_eq!(session.running_score(), RunningScore { score: 0, answered: 0 });

        session.select_answer(0).unwrap();
        assert_eq!(session.running_score(), RunningScore { score: 1, answered: 1 });

        session.advance(fixed_now()).unwrap();
        assert_eq!(session.running_score(), RunningScore { score: 1, answered: 1 });
        assert_eq!(session.position(), Some(QuizPosition { number: 2, total: 2 }));
    }

    #[test]
    fn exactly_one_completion_and_score_within_bounds() {
        let key = [3, 2, 1, 0, 1, 2, 3];
        let quiz = quiz_with_key(&key);
        for pick in 0..4 {
            let mut state = QuizState::INITIAL;
            let mut completions = 0;
            for _ in 0..key.len() {
                state = state.select_answer(&quiz, pick).unwrap();
                state = state.advance(&quiz).unwrap();
                if state.is_complete() {
                    completions += 1;
                }
                assert!(state.score() <= quiz.total());
            }
            assert_eq!(completions, 1);
        }
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(PerformanceBand::from_percentage(80), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_percentage(79), PerformanceBand::Good);
        assert_eq!(PerformanceBand::from_percentage(60), PerformanceBand::Good);
        assert_eq!(PerformanceBand::from_percentage(59), PerformanceBand::KeepStudying);
    }
}
