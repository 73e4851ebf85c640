//! Naming helpers derived from package metadata.

use std::path::Path;

use super::content::Content;
use super::types::PackageType;

/// Compute the client's unique install tag: `{type}_{id}`.
///
/// # Example
///
/// ```
/// use addonbox::package::{unique_tag, PackageType};
///
/// assert_eq!(unique_tag(&PackageType::Map, 42), "map_42");
/// ```
pub fn unique_tag(package_type: &PackageType, id: u32) -> String {
    format!("{}_{}", package_type.tag(), id)
}

/// Stem of the last `.bsp` file in the content list, if any.
///
/// Maps can ship several files; the client launches the map by its BSP
/// name rather than the package's display name.
pub fn bsp_map_name(content: &[Content]) -> Option<String> {
    content
        .iter()
        .rev()
        .map(|c| Path::new(&c.path))
        .find(|p| p.extension().is_some_and(|ext| ext == "bsp"))
        .and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Normalize a content path for filtering and archiving.
///
/// Lowercases, converts backslashes to forward slashes and strips leading
/// slashes.
///
/// # Example
///
/// ```
/// use addonbox::package::normalize_path;
///
/// assert_eq!(normalize_path("/Models\\Gun.MDL"), "models/gun.mdl");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim_start_matches('/')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_tag_known_types() {
        assert_eq!(unique_tag(&PackageType::Weapon, 1), "weapon_1");
        assert_eq!(unique_tag(&PackageType::Savemap, 99), "savemap_99");
    }

    #[test]
    fn test_unique_tag_other_type() {
        let t = PackageType::Other("npc".to_string());
        assert_eq!(unique_tag(&t, 5), "npc_5");
    }

    #[test]
    fn test_bsp_map_name_none() {
        let content = vec![Content::new(1, 1, "materials/a.vtf", 1, 1)];
        assert_eq!(bsp_map_name(&content), None);
        assert_eq!(bsp_map_name(&[]), None);
    }

    #[test]
    fn test_bsp_map_name_last_wins() {
        let content = vec![
            Content::new(1, 1, "maps/first.bsp", 1, 1),
            Content::new(2, 1, "maps/second.bsp", 1, 1),
            Content::new(3, 1, "maps/second.nav", 1, 1),
        ];
        assert_eq!(bsp_map_name(&content), Some("second".to_string()));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("lua/weapons/gun.lua"), "lua/weapons/gun.lua");
        assert_eq!(normalize_path("Lua\\Weapons\\Gun.lua"), "lua/weapons/gun.lua");
        assert_eq!(normalize_path("//maps/x.bsp"), "maps/x.bsp");
    }
}
