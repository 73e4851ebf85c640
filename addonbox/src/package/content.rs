//! Content files and include edges of a package snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a blob in the blob store: (content identifier, content revision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobKey {
    pub id: u32,
    pub rev: u32,
}

impl BlobKey {
    pub fn new(id: u32, rev: u32) -> Self {
        Self { id, rev }
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}r{}", self.id, self.rev)
    }
}

/// A single file belonging to a package snapshot.
///
/// # Example
///
/// ```
/// use addonbox::package::Content;
///
/// let content = Content::new(11, 1, "lua/weapons/gun.lua", 120, 64);
/// assert_eq!(content.blob_key().to_string(), "11r1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Content identifier.
    pub id: u32,

    /// Content revision, independent of the package revision.
    #[serde(rename = "rev")]
    pub revision: u32,

    /// Relative forward-slash path inside the game tree.
    pub path: String,

    /// Uncompressed size in bytes.
    pub size: u64,

    /// Stored (compressed) size in bytes.
    #[serde(rename = "psize")]
    pub stored_size: u64,
}

impl Content {
    pub fn new(id: u32, revision: u32, path: impl Into<String>, size: u64, stored_size: u64) -> Self {
        Self {
            id,
            revision,
            path: path.into(),
            size,
            stored_size,
        }
    }

    /// The blob backing this file.
    pub fn blob_key(&self) -> BlobKey {
        BlobKey::new(self.id, self.revision)
    }
}

/// A pinned reference to another package snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    pub id: u32,

    #[serde(rename = "rev")]
    pub revision: u32,

    #[serde(rename = "type")]
    pub package_type: super::PackageType,
}

impl Include {
    pub fn new(id: u32, revision: u32, package_type: super::PackageType) -> Self {
        Self {
            id,
            revision,
            package_type,
        }
    }
}
