//! Binary addon archive format (version 3).
//!
//! # Layout
//!
//! ```text
//! "GMAD" | u8 version=3 | u64 author id | u64 timestamp | u8 0
//! name\0 | {"description","type","tags":["fun"]}\0 | author name\0
//! u32 revision
//! file table: { u32 index (1-based) | path\0 | u64 size | u32 crc=0 }*  u32 0
//! file bodies, in table order
//! u32 0
//! ```
//!
//! All integers are little-endian. Only whitelisted content enters the
//! table, under its stored path; a snapshot with no whitelisted content
//! encodes to an empty body.

mod encoder;
mod format;
mod json;
mod reader;

pub use encoder::{encode_archive, ArchiveEncoder};
pub use format::{ARCHIVE_TAGS, FORMAT_VERSION, MAGIC};
pub use reader::{read_archive, Archive, ArchiveDescription, ArchiveEntry, ArchiveHeader, DecodeError};
