//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::sqlite::SqliteInitError;
use track_core::model::{TrackId, TransitionError};

/// Errors emitted while loading or registering track content.
///
/// Content defects are authoring problems and surface at load time.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("content directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid content in {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: track_core::Error,
    },
    #[error("track {0} is registered twice")]
    DuplicateTrack(TrackId),
}

/// Errors emitted by `TrackPage` and track lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PageError {
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),
    #[error("no quiz is running")]
    NoQuizSession,
    #[error("flashcard {0:?} is not part of this track")]
    UnknownFlashcard(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Errors emitted while reading `ServiceConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("storage key cannot be empty")]
    EmptyStorageKey,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
