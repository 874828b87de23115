use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionDraft, QuestionError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Ordered, non-empty list of questions with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    questions: Vec<Question>,
    total: u32,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for an empty list and
    /// `QuizError::DuplicateQuestionId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestionId(question.id()));
            }
        }
        let total = u32::try_from(questions.len()).map_err(|_| QuizError::TooManyQuestions {
            len: questions.len(),
        })?;
        Ok(Self { questions, total })
    }

    /// Validates every draft, then the quiz as a whole.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` (wrapped) or a quiz-level `QuizError`.
    pub fn from_drafts(drafts: Vec<QuestionDraft>) -> Result<Self, QuizError> {
        let questions = drafts
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question count as a score denominator.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }
}
