//! Package snapshot data model.
//!
//! A package is published once and never mutated; a new upload creates a new
//! revision row sharing the identifier. The pair (identifier, revision) names
//! an immutable snapshot.
//!
//! # Type Hierarchy
//!
//! ```text
//! Package (snapshot)
//! ├── id, revision, package_type, name, dataname
//! ├── author, author_name, author_icon, description
//! ├── data: Option<Vec<u8>>      raw attached payload (e.g. a save blob)
//! ├── content: Vec<Content>      files, each backed by a blob (id, rev)
//! ├── includes: Vec<Include>     pinned references to other snapshots
//! └── uploaded, stats
//! ```
//!
//! Content blobs are revisioned independently of packages, so a [`Content`]
//! carries its own revision and resolves to a [`BlobKey`].

mod content;
mod core;
mod naming;
mod types;

pub use content::{BlobKey, Content, Include};
pub use core::{Package, PackageStats};
pub use naming::{bsp_map_name, normalize_path, unique_tag};
pub use types::PackageType;
