//! Error types for the packaging core.
//!
//! Every operation that resolves, validates or encodes a package snapshot
//! reports failures through [`CoreError`]. The three kinds map directly onto
//! what an HTTP-facing caller needs to decide on a response:
//!
//! - **NotFound**: unknown package, unknown revision, or a missing content blob
//! - **Validation**: the stored metadata cannot be rendered (e.g. a
//!   non-numeric author identifier)
//! - **Storage**: the underlying store or blob fetch failed
//!
//! The core never retries; the first error encountered is returned.

use std::io;

use thiserror::Error;

use crate::package::BlobKey;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the packaging core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested snapshot or blob does not exist.
    #[error("not found: {0}")]
    NotFound(NotFound),

    /// Stored metadata cannot be rendered into a wire artifact.
    #[error("validation error: {0}")]
    Validation(String),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(StorageError),
}

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    /// No revision exists for the package identifier.
    #[error("package {id} has no revisions")]
    Package { id: u32 },

    /// The (identifier, revision) pair does not exist.
    #[error("package {id}r{rev}")]
    Snapshot { id: u32, rev: u32 },

    /// The blob store has nothing under this key.
    #[error("content blob {0}")]
    Blob(BlobKey),
}

/// Failures of the storage collaborators.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O failure while reading from a backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored record could not be decoded.
    #[error("corrupt record {record}: {reason}")]
    Corrupt { record: String, reason: String },

    /// The blob length disagrees with the size recorded for the content.
    #[error("size mismatch for blob {key}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        key: BlobKey,
        expected: u64,
        actual: u64,
    },

    /// The caller went away while the request was in flight.
    #[error("request cancelled")]
    Cancelled,
}

impl CoreError {
    /// Shorthand for a missing snapshot.
    pub fn snapshot_not_found(id: u32, rev: u32) -> Self {
        CoreError::NotFound(NotFound::Snapshot { id, rev })
    }

    /// Returns true if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }

    /// Returns true if this is a `Validation` error.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// Returns true if this is a `Storage` error.
    pub fn is_storage(&self) -> bool {
        matches!(self, CoreError::Storage(_))
    }
}

impl From<NotFound> for CoreError {
    fn from(e: NotFound) -> Self {
        CoreError::NotFound(e)
    }
}

impl From<StorageError> for CoreError {
    fn from(e: StorageError) -> Self {
        CoreError::Storage(e)
    }
}

impl From<io::Error> for CoreError {
    fn from(e: io::Error) -> Self {
        CoreError::Storage(StorageError::Io(e))
    }
}
