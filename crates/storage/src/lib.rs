#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{BlobStore, DisabledBlobStore, InMemoryBlobStore, Storage, StorageError};
