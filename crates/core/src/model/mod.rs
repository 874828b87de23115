mod content;
mod ids;
mod progress;
mod question;
mod quiz;
mod session;
mod track;

pub use content::{ContentBundle, ContentError, Flashcard};
pub use ids::{ParseIdError, QuestionId, TrackId};
pub use progress::{CompletionAxis, ProgressData, TrackProgress};
pub use question::{Question, QuestionDraft, QuestionError};
pub use quiz::{Quiz, QuizError};
pub use session::{
    Answer, AnswerFeedback, PerformanceBand, QuizPosition, QuizResult, QuizSession, QuizState,
    QuizStep, RunningScore, TransitionError,
};
pub use track::{Difficulty, TrackInfo};
