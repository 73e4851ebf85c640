//! Package type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Package type tag.
///
/// Known tags get their own variant; anything else is carried verbatim in
/// [`PackageType::Other`] so that stored rows round-trip without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageType {
    Weapon,
    Entity,
    Prop,
    Map,
    /// A saved game bound to a map through its data-name.
    Savemap,
    Other(String),
}

impl PackageType {
    /// The wire tag for this type.
    pub fn tag(&self) -> &str {
        match self {
            PackageType::Weapon => "weapon",
            PackageType::Entity => "entity",
            PackageType::Prop => "prop",
            PackageType::Map => "map",
            PackageType::Savemap => "savemap",
            PackageType::Other(tag) => tag,
        }
    }

    /// Maps are the only type installed through the client's map menu.
    pub fn is_map(&self) -> bool {
        *self == PackageType::Map
    }
}

impl From<&str> for PackageType {
    fn from(tag: &str) -> Self {
        match tag {
            "weapon" => PackageType::Weapon,
            "entity" => PackageType::Entity,
            "prop" => PackageType::Prop,
            "map" => PackageType::Map,
            "savemap" => PackageType::Savemap,
            other => PackageType::Other(other.to_string()),
        }
    }
}

impl From<String> for PackageType {
    fn from(tag: String) -> Self {
        PackageType::from(tag.as_str())
    }
}

impl From<PackageType> for String {
    fn from(package_type: PackageType) -> Self {
        match package_type {
            PackageType::Other(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl FromStr for PackageType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PackageType::from(s))
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
