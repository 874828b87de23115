use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use storage::BlobStore;
use track_core::model::{ProgressData, TrackId, TrackProgress};

/// Storage key used when no other key is configured. Matches the key existing
/// site data was written under.
pub const DEFAULT_STORAGE_KEY: &str = "github-cert-progress";

/// Per-track progress persisted as one JSON blob under a single key.
///
/// Every mutation reads the whole map, updates one entry and writes the whole
/// map back. Concurrent stores on the same backend race with last-writer-wins.
///
/// Storage problems never reach the caller. The first failed write switches the
/// store to memory-only mode for the rest of its lifetime; the in-memory copy
/// keeps serving reads and absorbing updates.
pub struct ProgressStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
    snapshot: ProgressData,
    degraded: bool,
}

impl ProgressStore {
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
            snapshot: ProgressData::new(),
            degraded: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True once storage has failed and progress only lives in memory.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Stored progress for `track`, or the all-default record.
    #[must_use]
    pub fn get_progress(&self, track: &TrackId) -> TrackProgress {
        self.all_progress().remove(track).unwrap_or_default()
    }

    /// Every stored track, as seen at the moment of the call.
    #[must_use]
    pub fn all_progress(&self) -> ProgressData {
        if self.degraded {
            return self.snapshot.clone();
        }
        self.read_blob().unwrap_or_else(|| self.snapshot.clone())
    }

    /// Overall completion for `track` across the five axes.
    #[must_use]
    pub fn compute_overall_percentage(&self, track: &TrackId) -> u8 {
        self.get_progress(track).overall_percentage()
    }

    pub fn set_modules_read(&mut self, track: &TrackId) {
        self.update(track, |progress| {
            progress.mark_modules_read();
        });
        tracing::debug!(track = %track, "modules marked read");
    }

    pub fn set_labs_read(&mut self, track: &TrackId) {
        self.update(track, |progress| {
            progress.mark_labs_read();
        });
        tracing::debug!(track = %track, "labs marked read");
    }

    pub fn set_diagram_viewed(&mut self, track: &TrackId) {
        self.update(track, |progress| {
            progress.mark_diagram_viewed();
        });
        tracing::debug!(track = %track, "diagram marked viewed");
    }

    /// Stores the latest quiz attempt. Retries overwrite, they do not accumulate.
    pub fn record_quiz_result(&mut self, track: &TrackId, score: u32, total: u32) {
        self.update(track, |progress| progress.record_quiz_result(score, total));
        tracing::debug!(track = %track, score, total, "quiz result recorded");
    }

    /// Adds `term` to the viewed set. Returns true if it had not been seen before.
    pub fn record_flashcard_viewed(&mut self, track: &TrackId, term: &str, total_terms: u32) -> bool {
        let inserted = self.update(track, |progress| {
            progress.record_flashcard_viewed(term, total_terms)
        });
        tracing::debug!(track = %track, term, inserted, "flashcard viewed");
        inserted
    }

    /// Forgets everything stored for `track`.
    pub fn clear_track(&mut self, track: &TrackId) {
        let mut data = self.load_for_write();
        data.remove(track);
        self.store(data);
    }

    /// Forgets every track and deletes the blob.
    pub fn clear_all(&mut self) {
        self.snapshot.clear();
        if self.degraded {
            return;
        }
        if let Err(err) = self.blobs.remove(&self.key) {
            self.degrade(&err);
        }
    }

    fn update<R>(&mut self, track: &TrackId, apply: impl FnOnce(&mut TrackProgress) -> R) -> R {
        let mut data = self.load_for_write();
        let result = apply(data.entry(track.clone()).or_default());
        self.store(data);
        result
    }

    fn load_for_write(&mut self) -> ProgressData {
        if self.degraded {
            return self.snapshot.clone();
        }
        match self.blobs.read(&self.key) {
            Ok(Some(raw)) => parse_blob(&self.key, &raw),
            Ok(None) => ProgressData::new(),
            Err(err) => {
                self.degrade(&err);
                self.snapshot.clone()
            }
        }
    }

    fn store(&mut self, data: ProgressData) {
        self.snapshot = data;
        if self.degraded {
            return;
        }
        let raw = match serde_json::to_string(&self.snapshot) {
            Ok(raw) => raw,
            Err(err) => {
                self.degrade(&err);
                return;
            }
        };
        if let Err(err) = self.blobs.write(&self.key, &raw) {
            self.degrade(&err);
        }
    }

    fn read_blob(&self) -> Option<ProgressData> {
        match self.blobs.read(&self.key) {
            Ok(Some(raw)) => Some(parse_blob(&self.key, &raw)),
            Ok(None) => Some(ProgressData::new()),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "progress read failed, using memory copy");
                None
            }
        }
    }

    fn degrade(&mut self, err: &dyn std::error::Error) {
        if !self.degraded {
            tracing::warn!(
                key = %self.key,
                error = %err,
                "progress storage failed, keeping progress in memory for this session"
            );
        }
        self.degraded = true;
    }
}

/// Decodes the blob entry by entry so one bad track cannot take the others with it.
fn parse_blob(key: &str, raw: &str) -> ProgressData {
    let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored progress is unreadable, starting fresh");
            return ProgressData::new();
        }
    };

    let mut data = ProgressData::new();
    for (track, value) in entries {
        let id = match TrackId::new(track.as_str()) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(key, track = %track, error = %err, "dropping progress with invalid track id");
                continue;
            }
        };
        match serde_json::from_value::<TrackProgress>(value) {
            Ok(progress) => {
                data.insert(id, progress);
            }
            Err(err) => {
                tracing::warn!(key, track = %track, error = %err, "dropping unreadable track progress");
            }
        }
    }
    data
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key", &self.key)
            .field("tracks_in_memory", &self.snapshot.len())
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}
