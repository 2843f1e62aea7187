//! Boundary contract for the session lifecycle collaborator.
//!
//! The engine only ever talks to durable storage through [`SessionStore`].
//! A failed save never rolls the in-memory snapshot back; the engine logs
//! and keeps going, because the in-memory state stays authoritative for the
//! current process.

use thiserror::Error;

use crate::SessionData;

/// Errors a store implementation can report.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed session document: {0}")]
    Format(String),
}

/// Loads and saves the whole snapshot as one document.
pub trait SessionStore {
    /// Returns the last persisted snapshot, or `None` when none exists.
    /// The engine then seeds a fresh default session.
    fn load(&self) -> Result<Option<SessionData>, StoreError>;

    /// Persists the given snapshot, replacing whatever was there.
    fn save(&self, data: &SessionData) -> Result<(), StoreError>;
}

impl std::fmt::Debug for dyn SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionStore")
    }
}
