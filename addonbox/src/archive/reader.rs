//! Conformant reader for version 3 archives.
//!
//! Parses the header, file table and bodies back out of encoded bytes.
//! Used for inspection and to verify encoder output.

use bytes::{Buf, Bytes};
use serde::Deserialize;
use thiserror::Error;

use super::format::{FIXED_HEADER_LEN, FORMAT_VERSION, MAGIC};

/// Errors decoding archive bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("archive is empty")]
    Empty,

    #[error("bad magic: expected GMAD, got {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u8),

    #[error("unexpected end of data reading {0}")]
    UnexpectedEof(&'static str),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("invalid description object: {0}")]
    InvalidDescription(#[from] serde_json::Error),

    #[error("file table index {actual} out of sequence, expected {expected}")]
    BadIndex { expected: u32, actual: u32 },

    #[error("{0} trailing bytes after archive end")]
    TrailingBytes(usize),
}

/// The metadata object embedded in the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveDescription {
    pub description: String,
    #[serde(rename = "type")]
    pub package_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Archive header fields, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub version: u8,
    pub author_id: u64,
    pub timestamp: u64,
    pub required_content: u8,
    pub name: String,
    pub description: ArchiveDescription,
    pub author_name: String,
    pub revision: u32,
}

/// One file of the archive with its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// 1-based sequence number from the file table.
    pub index: u32,
    pub path: String,
    pub size: u64,
    pub crc: u32,
    pub data: Bytes,
}

/// A decoded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub header: ArchiveHeader,
    pub entries: Vec<ArchiveEntry>,
    /// Trailing checksum placeholder.
    pub checksum: u32,
}

impl Archive {
    /// Sum of the uncompressed sizes in the file table.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

/// Decode a complete archive.
///
/// Trailing bytes after the checksum are rejected.
pub fn read_archive(data: &[u8]) -> Result<Archive, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }
    if data.len() < FIXED_HEADER_LEN {
        return Err(DecodeError::UnexpectedEof("header"));
    }

    let mut buf = data;

    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if &magic != MAGIC {
        return Err(DecodeError::BadMagic(magic));
    }

    let version = buf.get_u8();
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let author_id = buf.get_u64_le();
    let timestamp = buf.get_u64_le();
    let required_content = buf.get_u8();

    let name = read_cstr(&mut buf, "name")?;
    let description = serde_json::from_str(&read_cstr(&mut buf, "description")?)?;
    let author_name = read_cstr(&mut buf, "author name")?;
    let revision = read_u32(&mut buf, "revision")?;

    let header = ArchiveHeader {
        version,
        author_id,
        timestamp,
        required_content,
        name,
        description,
        author_name,
        revision,
    };

    let mut table = Vec::new();
    loop {
        let index = read_u32(&mut buf, "file index")?;
        if index == 0 {
            break;
        }
        let expected = table.len() as u32 + 1;
        if index != expected {
            return Err(DecodeError::BadIndex {
                expected,
                actual: index,
            });
        }
        let path = read_cstr(&mut buf, "file path")?;
        let size = read_u64(&mut buf, "file size")?;
        let crc = read_u32(&mut buf, "file crc")?;
        table.push((index, path, size, crc));
    }

    let mut entries = Vec::with_capacity(table.len());
    for (index, path, size, crc) in table {
        let len = usize::try_from(size).map_err(|_| DecodeError::UnexpectedEof("file body"))?;
        if buf.remaining() < len {
            return Err(DecodeError::UnexpectedEof("file body"));
        }
        let data = buf.copy_to_bytes(len);
        entries.push(ArchiveEntry {
            index,
            path,
            size,
            crc,
            data,
        });
    }

    let checksum = read_u32(&mut buf, "checksum")?;
    if buf.has_remaining() {
        return Err(DecodeError::TrailingBytes(buf.remaining()));
    }

    Ok(Archive {
        header,
        entries,
        checksum,
    })
}

fn read_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, DecodeError> {
    if buf.remaining() < 4 {
        return Err(DecodeError::UnexpectedEof(what));
    }
    Ok(buf.get_u32_le())
}

fn read_u64(buf: &mut &[u8], what: &'static str) -> Result<u64, DecodeError> {
    if buf.remaining() < 8 {
        return Err(DecodeError::UnexpectedEof(what));
    }
    Ok(buf.get_u64_le())
}

fn read_cstr(buf: &mut &[u8], what: &'static str) -> Result<String, DecodeError> {
    let end = buf
        .iter()
        .position(|b| *b == 0)
        .ok_or(DecodeError::UnexpectedEof(what))?;
    let s = std::str::from_utf8(&buf[..end])
        .map_err(|_| DecodeError::InvalidUtf8(what))?
        .to_string();
    buf.advance(end + 1);
    Ok(s)
}
