//! Package service facade.
//!
//! Wires configuration, the resolver, the blob store and both encoders into
//! the operations the HTTP-facing callers use. Each call is independent;
//! the only shared state is the read-only whitelist.

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::archive::ArchiveEncoder;
use crate::config::ServiceConfig;
use crate::error::{CoreResult, StorageError};
use crate::manifest::ManifestEncoder;
use crate::package::Package;
use crate::resolver::Resolver;
use crate::store::{BlobStore, PackageStore};

/// Serves manifests, archives and JSON views of stored snapshots.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use addonbox::config::ServiceConfig;
/// use addonbox::package::{Package, PackageType};
/// use addonbox::service::PackageService;
/// use addonbox::store::MemoryStore;
///
/// let store = Arc::new(MemoryStore::new());
/// store.insert_package(Package::new(42, 1, PackageType::Weapon, "SuperGun"));
///
/// let service = PackageService::new(ServiceConfig::default(), store.clone(), store);
/// let manifest = service.manifest(42, None).unwrap();
/// assert!(manifest.starts_with(b"\"script\""));
/// ```
#[derive(Clone)]
pub struct PackageService {
    resolver: Resolver,
    blobs: Arc<dyn BlobStore>,
    manifest: ManifestEncoder,
    archive: ArchiveEncoder,
}

impl PackageService {
    pub fn new(
        config: ServiceConfig,
        packages: Arc<dyn PackageStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            resolver: Resolver::new(packages),
            blobs,
            manifest: ManifestEncoder::new(config.content_url_base),
            archive: ArchiveEncoder::new(),
        }
    }

    /// Replace the archive encoder, e.g. to use a custom whitelist.
    pub fn with_archive_encoder(mut self, encoder: ArchiveEncoder) -> Self {
        self.archive = encoder;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve a snapshot; `rev` of `None` or below 1 means latest.
    pub fn package(&self, id: u32, rev: Option<u32>) -> CoreResult<Package> {
        self.resolver.resolve(id, rev)
    }

    /// Text manifest for a snapshot. Install mode is used for maps only.
    pub fn manifest(&self, id: u32, rev: Option<u32>) -> CoreResult<Vec<u8>> {
        let package = self.resolver.resolve(id, rev)?;
        let install = package.package_type.is_map();
        let bytes = self.manifest.encode(&package, install)?;
        info!(id, rev = package.revision, install, bytes = bytes.len(), "Served manifest");
        Ok(bytes)
    }

    /// Binary archive for a snapshot, fully buffered.
    pub fn archive(
        &self,
        id: u32,
        rev: Option<u32>,
        cancel: Option<&CancellationToken>,
    ) -> CoreResult<Bytes> {
        let package = self.resolver.resolve(id, rev)?;
        let bytes = self.archive.encode(&package, self.blobs.as_ref(), cancel)?;
        info!(id, rev = package.revision, bytes = bytes.len(), "Served archive");
        Ok(bytes)
    }

    /// JSON view of a snapshot.
    pub fn package_json(&self, id: u32, rev: Option<u32>) -> CoreResult<String> {
        let package = self.resolver.resolve(id, rev)?;
        serde_json::to_string_pretty(&package).map_err(|e| {
            StorageError::Corrupt {
                record: format!("{}r{}", package.id, package.revision),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Transitive includes of a snapshot, breadth-first.
    pub fn dependencies(&self, id: u32, rev: Option<u32>) -> CoreResult<Vec<Package>> {
        let package = self.resolver.resolve(id, rev)?;
        self.resolver.dependency_closure(&package)
    }

    /// Whether a path passes the archive whitelist in use.
    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.archive.whitelist().is_allowed(path)
    }
}
