//! Storage collaborator interfaces.
//!
//! The packaging core reads snapshots and blobs through these traits and
//! never writes through them. Relational storage, object storage and their
//! connection management live behind implementations.
//!
//! Both traits are synchronous: from the encoder's perspective every fetch
//! blocks until it completes or fails. Implementations must be `Send + Sync`
//! so a single instance can serve concurrent requests.

use std::io::Read;

use crate::error::CoreResult;
use crate::package::{BlobKey, Package};

/// Source of package snapshots.
pub trait PackageStore: Send + Sync {
    /// Highest existing revision for the identifier.
    ///
    /// Fails with `NotFound` when the identifier has no revisions.
    fn latest_revision(&self, id: u32) -> CoreResult<u32>;

    /// The snapshot at (id, rev), with its content and include lists in
    /// stored order.
    fn fetch_snapshot(&self, id: u32, rev: u32) -> CoreResult<Package>;
}

/// Source of content bytes keyed by (content id, content revision).
pub trait BlobStore: Send + Sync {
    /// Open a reader over the uncompressed bytes of a blob.
    fn open(&self, key: BlobKey) -> CoreResult<Box<dyn Read + Send>>;
}
