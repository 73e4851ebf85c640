//! Package snapshot type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{Content, Include};
use super::naming::{bsp_map_name, unique_tag};
use super::types::PackageType;
use crate::error::{CoreError, CoreResult};

/// Popularity counters, maintained outside the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStats {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub favorites: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub goods: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bads: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// An immutable package snapshot identified by (id, revision).
///
/// # Example
///
/// ```
/// use addonbox::package::{Content, Package, PackageType};
///
/// let package = Package::new(42, 1, PackageType::Weapon, "SuperGun")
///     .with_author("76561197960287930")
///     .with_content(vec![Content::new(1, 1, "lua/weapons/gun.lua", 120, 60)]);
///
/// assert_eq!(package.unique_tag(), "weapon_42");
/// assert_eq!(package.author_id().unwrap(), 76561197960287930);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: u32,

    /// Positive, monotonically increasing per identifier.
    #[serde(rename = "rev")]
    pub revision: u32,

    #[serde(rename = "type")]
    pub package_type: PackageType,

    pub name: String,

    /// Associates a save with the map it was made on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dataname: String,

    /// Decimal account identifier of the author, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, rename = "authorname", skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    #[serde(default, rename = "authoricon", skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Raw attached payload, appended verbatim after the manifest text.
    ///
    /// Stored beside the snapshot record, never inside it.
    #[serde(skip)]
    pub data: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<Include>,

    pub uploaded: DateTime<Utc>,

    #[serde(flatten)]
    pub stats: PackageStats,
}

impl Package {
    /// Create a snapshot with empty metadata, uploaded at the unix epoch.
    pub fn new(id: u32, revision: u32, package_type: PackageType, name: impl Into<String>) -> Self {
        Self {
            id,
            revision,
            package_type,
            name: name.into(),
            dataname: String::new(),
            author: None,
            author_name: None,
            author_icon: None,
            description: String::new(),
            data: None,
            content: Vec::new(),
            includes: Vec::new(),
            uploaded: DateTime::<Utc>::default(),
            stats: PackageStats::default(),
        }
    }

    pub fn with_dataname(mut self, dataname: impl Into<String>) -> Self {
        self.dataname = dataname.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_content(mut self, content: Vec<Content>) -> Self {
        self.content = content;
        self
    }

    pub fn with_includes(mut self, includes: Vec<Include>) -> Self {
        self.includes = includes;
        self
    }

    pub fn with_uploaded(mut self, uploaded: DateTime<Utc>) -> Self {
        self.uploaded = uploaded;
        self
    }

    /// Numeric author identifier.
    ///
    /// An absent or empty author is 0. Anything else must be a decimal
    /// number; a non-numeric value is a validation error.
    pub fn author_id(&self) -> CoreResult<u64> {
        match self.author.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(author) => author.parse::<u64>().map_err(|e| {
                CoreError::Validation(format!(
                    "author of package {}r{} is not a numeric identifier ({:?}): {}",
                    self.id, self.revision, author, e
                ))
            }),
        }
    }

    /// The `type_identifier` tag the client uses to key installs.
    pub fn unique_tag(&self) -> String {
        unique_tag(&self.package_type, self.id)
    }

    /// Name of the playable map: the stem of the last `.bsp` file, or the
    /// package name when there is none.
    pub fn map_name(&self) -> String {
        bsp_map_name(&self.content).unwrap_or_else(|| self.name.clone())
    }

    /// Upload time as unix seconds, clamped at zero.
    pub fn uploaded_unix(&self) -> u64 {
        self.uploaded.timestamp().max(0) as u64
    }

    /// Attached payload bytes, empty when there is none.
    pub fn payload(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}r{}/{})",
            self.name, self.id, self.revision, self.package_type
        )
    }
}
