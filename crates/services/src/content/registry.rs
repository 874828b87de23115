use std::collections::HashMap;
use std::sync::Arc;

use track_core::model::{ContentBundle, TrackId, TrackInfo};

use crate::error::RegistryError;

/// Source of track content. The core never assumes a fixed set of tracks.
pub trait ContentProvider: Send + Sync {
    /// Content for `track`, if the provider knows it.
    fn get(&self, track: &TrackId) -> Option<Arc<ContentBundle>>;

    /// Catalog entries in display order.
    fn tracks(&self) -> Vec<TrackInfo>;
}

/// In-memory provider filled by explicit registration or by loading a directory.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    entries: Vec<(TrackInfo, Arc<ContentBundle>)>,
    index: HashMap<TrackId, usize>,
}

impl ContentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a track after its bundle has been validated.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateTrack` if the id is already registered.
    pub fn register(&mut self, info: TrackInfo, bundle: ContentBundle) -> Result<(), RegistryError> {
        if self.index.contains_key(&info.id) {
            return Err(RegistryError::DuplicateTrack(info.id));
        }
        self.index.insert(info.id.clone(), self.entries.len());
        tracing::debug!(
            track = %info.id,
            questions = bundle.quiz().len(),
            flashcards = bundle.flashcards().len(),
            "registered track"
        );
        self.entries.push((info, Arc::new(bundle)));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn info(&self, track: &TrackId) -> Option<&TrackInfo> {
        self.index.get(track).map(|&i| &self.entries[i].0)
    }
}

impl ContentProvider for ContentRegistry {
    fn get(&self, track: &TrackId) -> Option<Arc<ContentBundle>> {
        self.index
            .get(track)
            .map(|&i| Arc::clone(&self.entries[i].1))
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.entries.iter().map(|(info, _)| info.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_core::model::{Difficulty, Flashcard, Question, QuestionId, Quiz};

    fn info(id: &str) -> TrackInfo {
        TrackInfo {
            id: TrackId::new(id).unwrap(),
            title: format!("GitHub {id}"),
            description: String::new(),
            duration: "8 hours".into(),
            modules: 6,
            difficulty: Difficulty::Beginner,
        }
    }

    fn bundle() -> ContentBundle {
        let quiz = Quiz::new(vec![
            Question::new(
                QuestionId::new(1),
                "What is a repository?",
                vec!["A project folder".into(), "A user".into()],
                0,
                "",
            )
            .unwrap(),
        ])
        .unwrap();
        ContentBundle::new("# Intro", quiz, "", vec![Flashcard::new("Repo", "Project")], "").unwrap()
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = ContentRegistry::new();
        registry.register(info("foundations"), bundle()).unwrap();
        registry.register(info("actions"), bundle()).unwrap();

        let ids: Vec<_> = registry
            .tracks()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, ["foundations", "actions"]);
    }

    #[test]
    fn rejects_duplicate_track() {
        let mut registry = ContentRegistry::new();
        registry.register(info("admin"), bundle()).unwrap();
        let err = registry.register(info("admin"), bundle()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTrack(id) if id.as_str() == "admin"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_track_is_none() {
        let registry = ContentRegistry::new();
        assert!(registry.get(&TrackId::new("missing").unwrap()).is_none());
        assert!(registry.is_empty());
    }
}
