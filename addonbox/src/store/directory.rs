//! Directory-backed package and blob store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── packages/<id>/<rev>.json    snapshot record (metadata, content, includes)
//! ├── packages/<id>/<rev>.data    optional raw attached payload
//! └── cdn/<id>/<rev>              content blob (see [`BlobFormat`])
//! ```
//!
//! Missing files map to `NotFound`; every other I/O failure is a
//! `StorageError`.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, trace};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::traits::{BlobStore, PackageStore};
use crate::error::{CoreError, CoreResult, NotFound, StorageError};
use crate::package::{BlobKey, Package};

/// Subdirectory holding snapshot records.
pub const PACKAGES_DIR: &str = "packages";

/// Subdirectory holding content blobs.
pub const BLOBS_DIR: &str = "cdn";

/// Name of the single member inside a zip blob.
pub const ZIP_MEMBER: &str = "file";

/// On-disk encoding of content blobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlobFormat {
    /// Uncompressed bytes.
    #[default]
    Raw,
    /// A single gzip member.
    Gzip,
    /// A zip archive holding the bytes in a member named `file`, as written
    /// by the legacy content service.
    Zip,
}

impl BlobFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobFormat::Raw => "raw",
            BlobFormat::Gzip => "gzip",
            BlobFormat::Zip => "zip",
        }
    }
}

impl fmt::Display for BlobFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlobFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(BlobFormat::Raw),
            "gzip" | "gz" => Ok(BlobFormat::Gzip),
            "zip" => Ok(BlobFormat::Zip),
            other => Err(format!("unknown blob format '{}', expected raw, gzip or zip", other)),
        }
    }
}

/// Filesystem store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    blob_format: BlobFormat,
}

impl DirectoryStore {
    /// Open a store rooted at `root`. Blobs are read as raw bytes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            blob_format: BlobFormat::Raw,
        }
    }

    /// Set how blobs are encoded on disk.
    pub fn with_blob_format(mut self, format: BlobFormat) -> Self {
        self.blob_format = format;
        self
    }

    pub fn blob_format(&self) -> BlobFormat {
        self.blob_format
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, id: u32) -> PathBuf {
        self.root.join(PACKAGES_DIR).join(id.to_string())
    }

    fn record_path(&self, id: u32, rev: u32) -> PathBuf {
        self.package_dir(id).join(format!("{}.json", rev))
    }

    fn payload_path(&self, id: u32, rev: u32) -> PathBuf {
        self.package_dir(id).join(format!("{}.data", rev))
    }

    fn blob_path(&self, key: BlobKey) -> PathBuf {
        self.root
            .join(BLOBS_DIR)
            .join(key.id.to_string())
            .join(key.rev.to_string())
    }

    /// Write a snapshot record and its payload.
    ///
    /// Used by import tooling and tests; the packaging core only reads.
    pub fn put_package(&self, package: &Package) -> CoreResult<()> {
        let dir = self.package_dir(package.id);
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_vec_pretty(package).map_err(|e| StorageError::Corrupt {
            record: format!("{}r{}", package.id, package.revision),
            reason: e.to_string(),
        })?;
        fs::write(self.record_path(package.id, package.revision), json)?;

        if let Some(data) = &package.data {
            fs::write(self.payload_path(package.id, package.revision), data)?;
        }

        Ok(())
    }

    /// Write a blob in the store's blob format.
    pub fn put_blob(&self, key: BlobKey, data: &[u8]) -> CoreResult<()> {
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        match self.blob_format {
            BlobFormat::Raw => fs::write(&path, data)?,
            BlobFormat::Gzip => {
                let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
                encoder.write_all(data)?;
                encoder.finish()?;
            }
            BlobFormat::Zip => {
                let mut zip = ZipWriter::new(File::create(&path)?);
                let options =
                    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                zip.start_file(ZIP_MEMBER, options)
                    .map_err(|e| map_zip(e, key))?;
                zip.write_all(data)?;
                zip.finish().map_err(|e| map_zip(e, key))?;
            }
        }

        Ok(())
    }
}

/// Map a zip error for a blob. A missing member means the blob is corrupt.
fn map_zip(err: ZipError, key: BlobKey) -> CoreError {
    match err {
        ZipError::Io(e) => CoreError::Storage(StorageError::Io(e)),
        other => CoreError::Storage(StorageError::Corrupt {
            record: format!("blob {}", key),
            reason: other.to_string(),
        }),
    }
}

/// Read the single member of a zip blob into memory.
fn read_zip_member(reader: BufReader<File>, key: BlobKey) -> CoreResult<Vec<u8>> {
    let mut archive = ZipArchive::new(reader).map_err(|e| map_zip(e, key))?;
    let mut member = archive.by_name(ZIP_MEMBER).map_err(|e| map_zip(e, key))?;

    let mut data = Vec::new();
    member.read_to_end(&mut data)?;
    Ok(data)
}

/// Map an I/O error, treating a missing file as `NotFound`.
fn map_io(err: io::Error, missing: NotFound) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::NotFound(missing)
    } else {
        CoreError::Storage(StorageError::Io(err))
    }
}

impl PackageStore for DirectoryStore {
    fn latest_revision(&self, id: u32) -> CoreResult<u32> {
        let dir = self.package_dir(id);
        let entries = fs::read_dir(&dir).map_err(|e| map_io(e, NotFound::Package { id }))?;

        let mut latest = None;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let rev = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.parse::<u32>().ok());
                match rev {
                    Some(rev) => latest = latest.max(Some(rev)),
                    None => trace!(path = %path.display(), "Ignoring unrecognised record"),
                }
            }
        }

        latest.ok_or_else(|| NotFound::Package { id }.into())
    }

    fn fetch_snapshot(&self, id: u32, rev: u32) -> CoreResult<Package> {
        let path = self.record_path(id, rev);
        let file = File::open(&path).map_err(|e| map_io(e, NotFound::Snapshot { id, rev }))?;

        let mut package: Package =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| StorageError::Corrupt {
                record: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if package.id != id || package.revision != rev {
            return Err(StorageError::Corrupt {
                record: path.display().to_string(),
                reason: format!(
                    "record holds {}r{}, expected {}r{}",
                    package.id, package.revision, id, rev
                ),
            }
            .into());
        }

        match fs::read(self.payload_path(id, rev)) {
            Ok(data) => package.data = Some(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(id, rev, path = %path.display(), "Loaded snapshot record");
        Ok(package)
    }
}

impl BlobStore for DirectoryStore {
    fn open(&self, key: BlobKey) -> CoreResult<Box<dyn Read + Send>> {
        let file = File::open(self.blob_path(key)).map_err(|e| map_io(e, NotFound::Blob(key)))?;
        let reader = BufReader::new(file);

        match self.blob_format {
            BlobFormat::Raw => Ok(Box::new(reader)),
            BlobFormat::Gzip => Ok(Box::new(GzDecoder::new(reader))),
            BlobFormat::Zip => {
                let data = read_zip_member(reader, key)?;
                trace!(key = %key, bytes = data.len(), "Extracted zip blob member");
                Ok(Box::new(Cursor::new(data)))
            }
        }
    }
}
