//! Binary archive encoder.

use std::io::Read;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::format::{ARCHIVE_TAGS, FORMAT_VERSION, MAGIC};
use super::json::to_html_safe_vec;
use crate::error::{CoreResult, StorageError};
use crate::package::{Content, Package};
use crate::store::BlobStore;
use crate::whitelist::Whitelist;

/// Metadata object embedded as a null-terminated JSON string.
#[derive(Serialize)]
struct DescriptionJson<'a> {
    description: &'a str,
    #[serde(rename = "type")]
    package_type: &'a str,
    tags: &'a [&'a str],
}

/// Upper bound on buffer space reserved up front from recorded sizes.
///
/// Recorded sizes are untrusted; larger bodies grow the buffer as they are
/// actually read.
const MAX_PREALLOC: u64 = 1 << 20;

/// Renders package snapshots into version 3 binary archives.
///
/// The whole archive is assembled in memory before it is returned, so a
/// failed blob fetch never leaves a truncated body behind.
///
/// # Example
///
/// ```
/// use addonbox::archive::{read_archive, ArchiveEncoder};
/// use addonbox::package::{BlobKey, Content, Package, PackageType};
/// use addonbox::store::MemoryStore;
///
/// let blobs = MemoryStore::new();
/// blobs.insert_blob(BlobKey::new(7, 1), b"print(1)".to_vec());
///
/// let package = Package::new(42, 1, PackageType::Weapon, "SuperGun")
///     .with_content(vec![Content::new(7, 1, "lua/autorun/a.lua", 8, 8)]);
///
/// let bytes = ArchiveEncoder::new().encode(&package, &blobs, None).unwrap();
/// let archive = read_archive(&bytes).unwrap();
/// assert_eq!(archive.header.name, "SuperGun");
/// assert_eq!(archive.entries[0].data.as_ref(), b"print(1)");
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveEncoder {
    whitelist: Arc<Whitelist>,
}

impl Default for ArchiveEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveEncoder {
    /// Encoder using the built-in content whitelist.
    pub fn new() -> Self {
        Self {
            whitelist: Arc::new(Whitelist::builtin().clone()),
        }
    }

    /// Encoder using a custom whitelist.
    pub fn with_whitelist(whitelist: Arc<Whitelist>) -> Self {
        Self { whitelist }
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Encode the archive for `package`, fetching bodies from `blobs`.
    ///
    /// Returns an empty buffer when no content entry passes the whitelist.
    /// The cancellation token, when given, is checked before every blob
    /// fetch.
    pub fn encode(
        &self,
        package: &Package,
        blobs: &dyn BlobStore,
        cancel: Option<&CancellationToken>,
    ) -> CoreResult<Bytes> {
        let author_id = package.author_id()?;

        let files = self.select(package);
        if files.is_empty() {
            debug!(
                id = package.id,
                rev = package.revision,
                content = package.content.len(),
                "No whitelisted content, archive is empty"
            );
            return Ok(Bytes::new());
        }

        let record = || format!("{}r{}", package.id, package.revision);

        let description = to_html_safe_vec(&DescriptionJson {
            description: &package.description,
            package_type: package.package_type.tag(),
            tags: &ARCHIVE_TAGS,
        })
        .map_err(|e| StorageError::Corrupt {
            record: record(),
            reason: format!("cannot serialize description: {}", e),
        })?;

        let body_len = files
            .iter()
            .try_fold(0u64, |total, c| total.checked_add(c.size))
            .ok_or_else(|| StorageError::Corrupt {
                record: record(),
                reason: "recorded content sizes overflow".to_string(),
            })?;
        let mut buf = BytesMut::with_capacity(256 + body_len.min(MAX_PREALLOC) as usize);

        buf.put_slice(MAGIC);
        buf.put_u8(FORMAT_VERSION);
        buf.put_u64_le(author_id);
        buf.put_u64_le(package.uploaded_unix());
        buf.put_u8(0); // required content

        put_cstr(&mut buf, package.name.as_bytes());
        put_cstr(&mut buf, &description);
        put_cstr(
            &mut buf,
            package.author_name.as_deref().unwrap_or_default().as_bytes(),
        );
        buf.put_u32_le(package.revision);

        for (index, content) in files.iter().enumerate() {
            buf.put_u32_le(index as u32 + 1);
            put_cstr(&mut buf, content.path.as_bytes());
            buf.put_u64_le(content.size);
            buf.put_u32_le(0); // crc, never computed
        }
        buf.put_u32_le(0);

        for content in &files {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(id = package.id, rev = package.revision, "Archive encode cancelled");
                return Err(StorageError::Cancelled.into());
            }
            read_body(blobs, content, &mut buf)?;
        }

        buf.put_u32_le(0); // content checksum, unused

        debug!(
            id = package.id,
            rev = package.revision,
            files = files.len(),
            bytes = buf.len(),
            "Encoded archive"
        );

        Ok(buf.freeze())
    }

    /// Whitelisted content in stored order.
    ///
    /// The whitelist sees the normalized path; the table keeps the stored
    /// path verbatim.
    fn select<'a>(&self, package: &'a Package) -> Vec<&'a Content> {
        package
            .content
            .iter()
            .filter(|content| {
                let allowed = self.whitelist.is_allowed(&content.path);
                if !allowed {
                    debug!(
                        id = package.id,
                        path = %content.path,
                        "Skipping content not on the whitelist"
                    );
                }
                allowed
            })
            .collect()
    }
}

fn put_cstr(buf: &mut BytesMut, s: &[u8]) {
    buf.put_slice(s);
    buf.put_u8(0);
}

/// Append one blob body, enforcing the recorded uncompressed size.
fn read_body(blobs: &dyn BlobStore, content: &Content, buf: &mut BytesMut) -> CoreResult<()> {
    let key = content.blob_key();
    let expected = content.size;

    let mut data = Vec::with_capacity(expected.min(MAX_PREALLOC) as usize);
    blobs
        .open(key)?
        .take(expected.saturating_add(1))
        .read_to_end(&mut data)?;

    let actual = data.len() as u64;
    if actual != expected {
        return Err(StorageError::SizeMismatch {
            key,
            expected,
            actual,
        }
        .into());
    }

    trace!(key = %key, bytes = actual, "Appended blob body");
    buf.put_slice(&data);
    Ok(())
}

/// Encode an archive with the built-in whitelist and no cancellation.
pub fn encode_archive(package: &Package, blobs: &dyn BlobStore) -> CoreResult<Bytes> {
    ArchiveEncoder::new().encode(package, blobs, None)
}
