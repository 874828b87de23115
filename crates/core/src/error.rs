use thiserror::Error;

use crate::model::{ContentError, ParseIdError, QuestionError, QuizError, TransitionError};

/// Umbrella for every domain error in this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
