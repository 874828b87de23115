use std::fmt;
use std::sync::Arc;

use storage::Storage;
use track_core::model::{TrackId, TrackInfo};

use crate::config::ServiceConfig;
use crate::content::{ContentProvider, ContentRegistry};
use crate::error::{AppServicesError, PageError};
use crate::progress_store::ProgressStore;
use crate::search::{SearchHit, search};
use crate::track_page::TrackPage;
use crate::Clock;

/// A catalog row: track metadata plus the learner's overall completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub info: TrackInfo,
    pub percentage: u8,
}

/// Assembles the content provider and progress store behind one handle.
pub struct AppServices {
    clock: Clock,
    content: Arc<dyn ContentProvider>,
    progress: ProgressStore,
}

impl AppServices {
    #[must_use]
    pub fn new(
        storage: &Storage,
        storage_key: impl Into<String>,
        content: Arc<dyn ContentProvider>,
        clock: Clock,
    ) -> Self {
        Self {
            clock,
            content,
            progress: ProgressStore::new(Arc::clone(&storage.blobs), storage_key),
        }
    }

    /// Build services from configuration.
    ///
    /// Uses `SQLite` when `database_path` is set and memory otherwise. Without
    /// a `content_dir` the catalog starts empty.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the config is invalid, the database cannot
    /// be opened or migrated, or the content directory fails to load.
    pub fn from_config(config: &ServiceConfig, clock: Clock) -> Result<Self, AppServicesError> {
        config.validate()?;

        let storage = match &config.database_path {
            Some(path) => Storage::sqlite(path)?,
            None => Storage::in_memory(),
        };
        let content = match &config.content_dir {
            Some(dir) => ContentRegistry::load_dir(dir)?,
            None => {
                tracing::info!("no content directory configured, catalog is empty");
                ContentRegistry::new()
            }
        };

        Ok(Self::new(
            &storage,
            config.storage_key.clone(),
            Arc::new(content),
            clock,
        ))
    }

    #[must_use]
    pub fn content(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.content)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }

    /// Every track with its current completion percentage.
    #[must_use]
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        let stored = self.progress.all_progress();
        self.content
            .tracks()
            .into_iter()
            .map(|info| {
                let percentage = stored
                    .get(&info.id)
                    .map_or(0, |progress| progress.overall_percentage());
                CatalogEntry { info, percentage }
            })
            .collect()
    }

    /// Opens the page controller for `track`.
    ///
    /// # Errors
    ///
    /// Returns `PageError::UnknownTrack` if no provider content exists for it.
    pub fn open_track(&mut self, track: &TrackId) -> Result<TrackPage<'_>, PageError> {
        let bundle = self
            .content
            .get(track)
            .ok_or_else(|| PageError::UnknownTrack(track.clone()))?;
        let info = self
            .content
            .tracks()
            .into_iter()
            .find(|info| &info.id == track)
            .ok_or_else(|| PageError::UnknownTrack(track.clone()))?;
        Ok(TrackPage::new(info, bundle, &mut self.progress, self.clock))
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search(self.content.as_ref(), query)
    }
}

impl fmt::Debug for AppServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppServices")
            .field("clock", &self.clock)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use track_core::model::{
        ContentBundle, Difficulty, Flashcard, Question, QuestionId, Quiz,
    };
    use track_core::time::fixed_clock;

    use crate::progress_store::DEFAULT_STORAGE_KEY;

    fn registry() -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        for id in ["foundations", "admin"] {
            let quiz = Quiz::new(vec![
                Question::new(QuestionId::new(1), "Who manages an enterprise?", vec!["Owners".into(), "Guests".into()], 0, "")
                    .unwrap(),
            ])
            .unwrap();
            let bundle =
                ContentBundle::new("# Overview", quiz, "", vec![Flashcard::new("SSO", "Single sign-on")], "").unwrap();
            let info = TrackInfo {
                id: TrackId::new(id).unwrap(),
                title: id.to_uppercase(),
                description: String::new(),
                duration: String::new(),
                modules: 3,
                difficulty: Difficulty::Advanced,
            };
            registry.register(info, bundle).unwrap();
        }
        registry
    }

    fn services() -> AppServices {
        AppServices::new(
            &Storage::in_memory(),
            DEFAULT_STORAGE_KEY,
            Arc::new(registry()),
            fixed_clock(),
        )
    }

    #[test]
    fn catalog_reports_percentage_per_track() {
        let mut services = services();
        let admin = TrackId::new("admin").unwrap();
        services.progress_mut().set_modules_read(&admin);

        let catalog = services.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].info.id.as_str(), "foundations");
        assert_eq!(catalog[0].percentage, 0);
        assert_eq!(catalog[1].percentage, 20);
    }

    #[test]
    fn open_track_rejects_unknown_ids() {
        let mut services = services();
        let err = services
            .open_track(&TrackId::new("copilot").unwrap())
            .unwrap_err();
        assert!(matches!(err, PageError::UnknownTrack(id) if id.as_str() == "copilot"));
    }

    #[test]
    fn page_updates_land_in_the_shared_store() {
        let mut services = services();
        let foundations = TrackId::new("foundations").unwrap();
        {
            let mut page = services.open_track(&foundations).unwrap();
            page.view_flashcard("SSO").unwrap();
        }
        assert_eq!(services.progress().compute_overall_percentage(&foundations), 20);
        assert_eq!(services.search("sign-on").len(), 2);
    }

    #[test]
    fn from_config_without_paths_uses_memory() {
        let services = AppServices::from_config(&ServiceConfig::default(), fixed_clock()).unwrap();
        assert!(services.catalog().is_empty());
        assert_eq!(services.progress().key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn from_config_reports_missing_content_dir() {
        let config = ServiceConfig {
            content_dir: Some(PathBuf::from("/definitely/not/here")),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            AppServices::from_config(&config, fixed_clock()).unwrap_err(),
            AppServicesError::Registry(_)
        ));
    }
}
