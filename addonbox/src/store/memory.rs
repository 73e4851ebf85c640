//! In-memory package and blob store.
//!
//! Useful for embedding and tests. Snapshots are keyed by (id, rev) in a
//! `BTreeMap` so the latest revision is the last key in an id's range.

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};

use bytes::Bytes;
use parking_lot::RwLock;

use super::traits::{BlobStore, PackageStore};
use crate::error::{CoreResult, NotFound};
use crate::package::{BlobKey, Package};

/// Thread-safe in-memory store implementing both collaborator traits.
///
/// # Example
///
/// ```
/// use addonbox::package::{Package, PackageType};
/// use addonbox::store::{MemoryStore, PackageStore};
///
/// let store = MemoryStore::new();
/// store.insert_package(Package::new(1, 1, PackageType::Prop, "Crate"));
/// store.insert_package(Package::new(1, 2, PackageType::Prop, "Crate v2"));
///
/// assert_eq!(store.latest_revision(1).unwrap(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    packages: RwLock<BTreeMap<(u32, u32), Package>>,
    blobs: RwLock<HashMap<BlobKey, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot. An existing snapshot with the same (id, rev) is
    /// replaced.
    pub fn insert_package(&self, package: Package) {
        self.packages
            .write()
            .insert((package.id, package.revision), package);
    }

    /// Add a blob.
    pub fn insert_blob(&self, key: BlobKey, data: impl Into<Bytes>) {
        self.blobs.write().insert(key, data.into());
    }

    pub fn package_count(&self) -> usize {
        self.packages.read().len()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.read().len()
    }
}

impl PackageStore for MemoryStore {
    fn latest_revision(&self, id: u32) -> CoreResult<u32> {
        self.packages
            .read()
            .range((id, 0)..=(id, u32::MAX))
            .next_back()
            .map(|((_, rev), _)| *rev)
            .ok_or_else(|| NotFound::Package { id }.into())
    }

    fn fetch_snapshot(&self, id: u32, rev: u32) -> CoreResult<Package> {
        self.packages
            .read()
            .get(&(id, rev))
            .cloned()
            .ok_or_else(|| NotFound::Snapshot { id, rev }.into())
    }
}

impl BlobStore for MemoryStore {
    fn open(&self, key: BlobKey) -> CoreResult<Box<dyn Read + Send>> {
        let data = self
            .blobs
            .read()
            .get(&key)
            .cloned()
            .ok_or(NotFound::Blob(key))?;
        Ok(Box::new(Cursor::new(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageType;

    #[test]
    fn test_latest_revision_picks_max() {
        let store = MemoryStore::new();
        for rev in [1, 3, 2] {
            store.insert_package(Package::new(10, rev, PackageType::Prop, "p"));
        }
        store.insert_package(Package::new(11, 9, PackageType::Prop, "other"));
        assert_eq!(store.latest_revision(10).unwrap(), 3);
    }

    #[test]
    fn test_latest_revision_unknown_id() {
        let store = MemoryStore::new();
        store.insert_package(Package::new(11, 1, PackageType::Prop, "other"));
        let err = store.latest_revision(10).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fetch_snapshot() {
        let store = MemoryStore::new();
        store.insert_package(Package::new(10, 1, PackageType::Prop, "one"));
        assert_eq!(store.fetch_snapshot(10, 1).unwrap().name, "one");
        assert!(store.fetch_snapshot(10, 2).unwrap_err().is_not_found());
    }

    #[test]
    fn test_open_blob() {
        let store = MemoryStore::new();
        store.insert_blob(BlobKey::new(1, 1), b"hello".to_vec());

        let mut buf = Vec::new();
        store
            .open(BlobKey::new(1, 1))
            .unwrap()
            .read_to_end(&mut buf)
            .unwrap();
        assert_eq!(buf, b"hello");
    }

    #[test]
    fn test_open_missing_blob() {
        let store = MemoryStore::new();
        match store.open(BlobKey::new(1, 1)) {
            Err(err) => assert!(err.is_not_found()),
            Ok(_) => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_counts() {
        let store = MemoryStore::new();
        store.insert_package(Package::new(1, 1, PackageType::Prop, "a"));
        store.insert_blob(BlobKey::new(1, 1), Vec::<u8>::new());
        assert_eq!(store.package_count(), 1);
        assert_eq!(store.blob_count(), 1);
    }
}
