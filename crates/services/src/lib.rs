#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod content;
pub mod error;
pub mod progress_store;
pub mod search;
pub mod track_page;

pub use track_core::Clock;

pub use app_services::{AppServices, CatalogEntry};
pub use config::ServiceConfig;
pub use content::{ContentProvider, ContentRegistry};
pub use error::{AppServicesError, ConfigError, PageError, RegistryError};
pub use progress_store::{DEFAULT_STORAGE_KEY, ProgressStore};
pub use search::{SearchHit, search};
pub use track_page::{Section, TrackPage};
