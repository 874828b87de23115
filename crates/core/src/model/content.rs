use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::quiz::{Quiz, QuizError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("flashcard term cannot be empty")]
    EmptyFlashcardTerm,

    #[error("duplicate flashcard term {0:?}")]
    DuplicateFlashcardTerm(String),

    #[error("too many flashcards: {len}")]
    TooManyFlashcards { len: usize },

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// A term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Everything a track page shows: overview, quiz, labs, flashcards and diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBundle {
    overview: String,
    quiz: Arc<Quiz>,
    labs: String,
    flashcards: Vec<Flashcard>,
    flashcard_total: u32,
    diagram: String,
}

impl ContentBundle {
    /// # Errors
    ///
    /// Returns `ContentError` when a flashcard term is blank or repeated.
    pub fn new(
        overview: impl Into<String>,
        quiz: Quiz,
        labs: impl Into<String>,
        flashcards: Vec<Flashcard>,
        diagram: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let mut seen = BTreeSet::new();
        for card in &flashcards {
            if card.term.trim().is_empty() {
                return Err(ContentError::EmptyFlashcardTerm);
            }
            if !seen.insert(card.term.as_str()) {
                return Err(ContentError::DuplicateFlashcardTerm(card.term.clone()));
            }
        }
        let flashcard_total =
            u32::try_from(flashcards.len()).map_err(|_| ContentError::TooManyFlashcards {
                len: flashcards.len(),
            })?;

        Ok(Self {
            overview: overview.into(),
            quiz: Arc::new(quiz),
            labs: labs.into(),
            flashcards,
            flashcard_total,
            diagram: diagram.into(),
        })
    }

    #[must_use]
    pub fn overview(&self) -> &str {
        &self.overview
    }

    /// Shared so quiz sessions can hold the questions without borrowing the bundle.
    #[must_use]
    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    #[must_use]
    pub fn labs(&self) -> &str {
        &self.labs
    }

    #[must_use]
    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    #[must_use]
    pub fn flashcard_total(&self) -> u32 {
        self.flashcard_total
    }

    #[must_use]
    pub fn diagram(&self) -> &str {
        &self.diagram
    }

    /// Exact-match lookup. Viewed terms in `TrackProgress` must pass this check.
    #[must_use]
    pub fn has_term(&self, term: &str) -> bool {
        self.flashcards.iter().any(|card| card.term == term)
    }
}
