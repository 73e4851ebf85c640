//! Constants of the version 3 archive layout.

/// Leading magic bytes.
pub const MAGIC: &[u8; 4] = b"GMAD";

/// The only format version produced and accepted.
pub const FORMAT_VERSION: u8 = 3;

/// Fixed tag list embedded in the description object.
pub const ARCHIVE_TAGS: [&str; 1] = ["fun"];

/// Size of the fixed-width header prefix: magic, version, author id,
/// timestamp and the required-content byte.
pub const FIXED_HEADER_LEN: usize = 4 + 1 + 8 + 8 + 1;
