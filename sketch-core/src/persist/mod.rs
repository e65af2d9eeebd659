//! Multi-project persistence.
//!
//! Projects are stored one record per id behind a [`Storage`] backend, with
//! a separate index for listing and a pointer to the last-active project.
//! Read paths never fail; write failures are logged and ignored by callers
//! so the in-memory project stays authoritative.

mod repository;
mod saver;
mod storage;

pub use repository::{
    IndexEntry, ProjectRepository, ACTIVE_KEY, INDEX_KEY, LEGACY_KEY, PROJECT_KEY_PREFIX,
};
pub use saver::DebouncedSaver;
pub use storage::{FsStorage, MemoryStorage, Storage, StorageError};
