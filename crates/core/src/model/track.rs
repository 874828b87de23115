use serde::{Deserialize, Serialize};

use crate::model::ids::TrackId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Catalog entry describing a track, shown before its content is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form estimate such as "8 hours".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub modules: u32,
    pub difficulty: Difficulty,
}
