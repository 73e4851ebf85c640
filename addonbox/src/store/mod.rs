//! Storage collaborators for snapshots and content blobs.
//!
//! ```text
//! ┌──────────────┐      ┌──────────────────┐
//! │   Resolver   │─────►│  PackageStore    │ (trait)
//! └──────────────┘      └────────┬─────────┘
//! ┌──────────────┐      ┌────────┴─────────┐
//! │ArchiveEncoder│─────►│   BlobStore      │ (trait)
//! └──────────────┘      └────────┬─────────┘
//!                           ┌────┴─────┐
//!                           ▼          ▼
//!                     MemoryStore  DirectoryStore
//! ```

mod directory;
mod memory;
mod traits;

pub use directory::{BlobFormat, DirectoryStore, BLOBS_DIR, PACKAGES_DIR, ZIP_MEMBER};
pub use memory::MemoryStore;
pub use traits::{BlobStore, PackageStore};
