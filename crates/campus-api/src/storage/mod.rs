// Storage layer for the Campus API
// Decision: Support both Postgres (production) and in-memory (dev mode)
//
// The credential store and the profile tables live here. Email uniqueness is
// a storage-layer guarantee on both backends, never an application-level
// read-then-write check.

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
