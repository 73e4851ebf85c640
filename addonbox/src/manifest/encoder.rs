//! Text manifest encoder.

use tracing::debug;

use super::hooks::InstallHooks;
use super::keyvalues::KeyValues;
use crate::error::CoreResult;
use crate::package::Package;

/// Key of the single top-level block wrapping the manifest.
pub const ROOT_KEY: &str = "script";

/// Default base for content retrieval URLs; the content id is appended.
pub const DEFAULT_CONTENT_URL_BASE: &str = "http://127.0.0.1/content/getzip?id=";

/// Renders package snapshots as legacy text manifests.
///
/// # Example
///
/// ```
/// use addonbox::manifest::ManifestEncoder;
/// use addonbox::package::{Package, PackageType};
///
/// let encoder = ManifestEncoder::new("http://cdn.example/get?id=");
/// let package = Package::new(42, 1, PackageType::Weapon, "SuperGun");
///
/// let bytes = encoder.encode(&package, false).unwrap();
/// let text = String::from_utf8(bytes).unwrap();
/// assert!(text.starts_with("\"script\"\n{\n\"scriptid\"\t\"42\"\n"));
/// ```
#[derive(Debug, Clone)]
pub struct ManifestEncoder {
    content_url_base: String,
}

impl Default for ManifestEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_URL_BASE)
    }
}

impl ManifestEncoder {
    pub fn new(content_url_base: impl Into<String>) -> Self {
        Self {
            content_url_base: content_url_base.into(),
        }
    }

    pub fn content_url_base(&self) -> &str {
        &self.content_url_base
    }

    /// Retrieval URL for a content identifier.
    pub fn content_url(&self, content_id: u32) -> String {
        format!("{}{}", self.content_url_base, content_id)
    }

    /// Build the manifest document.
    ///
    /// In install mode the unique tag and any non-empty install hooks follow
    /// the scalar header. Content and includes follow as nested blocks; every
    /// content entry is listed, whitelisted or not.
    pub fn document(&self, package: &Package, install: bool) -> CoreResult<KeyValues> {
        // The author never appears in the manifest, but a snapshot whose
        // author cannot be parsed is rejected on every encode path.
        package.author_id()?;

        let mut script = KeyValues::new();
        script
            .push("scriptid", package.id)
            .push("revision", package.revision)
            .push("type", &package.package_type)
            .push("dataname", &package.dataname)
            .push("name", &package.name);

        if install {
            script.push("uid", package.unique_tag());
            for (key, snippet) in InstallHooks::for_package(package).entries() {
                script.push_non_empty(key, snippet);
            }
        }

        if !package.content.is_empty() {
            let mut content = KeyValues::new();
            for c in &package.content {
                let mut item = KeyValues::new();
                item.push("id", c.id)
                    .push("rev", c.revision)
                    .push("name", &c.path)
                    .push("url", self.content_url(c.id))
                    .push("size", c.stored_size);
                content.push_block(format!("content_{}", c.id), item);
            }
            script.push_block("content", content);
        }

        if !package.includes.is_empty() {
            let mut includes = KeyValues::new();
            for i in &package.includes {
                let mut item = KeyValues::new();
                item.push("id", i.id)
                    .push("rev", i.revision)
                    .push("type", &i.package_type);
                includes.push_block(format!("include_{}", i.id), item);
            }
            script.push_block("includes", includes);
        }

        let mut root = KeyValues::new();
        root.push_block(ROOT_KEY, script);
        Ok(root)
    }

    /// Encode the manifest bytes.
    ///
    /// The text block ends with one extra newline. An attached payload
    /// follows immediately with no separator; the client reads everything
    /// after the text header as the payload.
    pub fn encode(&self, package: &Package, install: bool) -> CoreResult<Vec<u8>> {
        let document = self.document(package, install)?;

        let mut text = document.render();
        text.push('\n');

        let payload = package.payload();
        let mut out = Vec::with_capacity(text.len() + payload.len());
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(payload);

        debug!(
            id = package.id,
            rev = package.revision,
            install,
            bytes = out.len(),
            payload = payload.len(),
            "Encoded manifest"
        );

        Ok(out)
    }
}

/// Encode a manifest with the default content URL base.
pub fn encode_manifest(package: &Package, install: bool) -> CoreResult<Vec<u8>> {
    ManifestEncoder::default().encode(package, install)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{Content, Include, PackageType};

    const BASE: &str = "http://cdn.test/get?id=";

    fn encoder() -> ManifestEncoder {
        ManifestEncoder::new(BASE)
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_minimal_manifest_exact_bytes() {
        let pkg = Package::new(42, 1, PackageType::Weapon, "SuperGun");
        let out = text(encoder().encode(&pkg, false).unwrap());
        assert_eq!(
            out,
            "\"script\"\n{\n\
             \"scriptid\"\t\"42\"\n\
             \"revision\"\t\"1\"\n\
             \"type\"\t\"weapon\"\n\
             \"dataname\"\t\"\"\n\
             \"name\"\t\"SuperGun\"\n\
             }\n\n"
        );
    }

    #[test]
    fn test_scalar_order() {
        let pkg = Package::new(1, 2, PackageType::Prop, "Crate").with_dataname("gm_construct");
        let doc = encoder().document(&pkg, false).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();
        let keys: Vec<&str> = script.keys().collect();
        assert_eq!(keys, vec!["scriptid", "revision", "type", "dataname", "name"]);
        assert_eq!(script.get_str("dataname"), Some("gm_construct"));
    }

    #[test]
    fn test_content_block_after_scalars_with_field_order() {
        let pkg = Package::new(42, 1, PackageType::Weapon, "SuperGun").with_content(vec![
            Content::new(11, 3, "lua/weapons/gun.lua", 120, 64),
            Content::new(12, 1, "models/gun.sw.vtx", 800, 500),
        ]);
        let doc = encoder().document(&pkg, false).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();

        let keys: Vec<&str> = script.keys().collect();
        assert_eq!(keys.last(), Some(&"content"));

        let content = script.get_block("content").unwrap();
        let entry_keys: Vec<&str> = content.keys().collect();
        // Manifests list every file, including ones the archive would drop.
        assert_eq!(entry_keys, vec!["content_11", "content_12"]);

        let first = content.get_block("content_11").unwrap();
        let fields: Vec<&str> = first.keys().collect();
        assert_eq!(fields, vec!["id", "rev", "name", "url", "size"]);
        assert_eq!(first.get_str("rev"), Some("3"));
        assert_eq!(first.get_str("name"), Some("lua/weapons/gun.lua"));
        assert_eq!(first.get_str("url"), Some("http://cdn.test/get?id=11"));
        assert_eq!(first.get_str("size"), Some("64"));
    }

    #[test]
    fn test_includes_block() {
        let pkg = Package::new(90, 1, PackageType::Savemap, "My Save")
            .with_includes(vec![Include::new(7, 2, PackageType::Map)]);
        let doc = encoder().document(&pkg, false).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();
        assert!(script.get("content").is_none());

        let include = script
            .get_block("includes")
            .and_then(|b| b.get_block("include_7"))
            .unwrap();
        let fields: Vec<&str> = include.keys().collect();
        assert_eq!(fields, vec!["id", "rev", "type"]);
        assert_eq!(include.get_str("type"), Some("map"));
    }

    #[test]
    fn test_install_mode_map() {
        let pkg = Package::new(7, 1, PackageType::Map, "Flat")
            .with_content(vec![Content::new(1, 1, "maps/gm_flat.bsp", 10, 5)]);
        let doc = encoder().document(&pkg, true).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();

        let keys: Vec<&str> = script.keys().collect();
        assert_eq!(
            keys,
            vec![
                "scriptid",
                "revision",
                "type",
                "dataname",
                "name",
                "uid",
                "luamenu_installed",
                "luamenu_action",
                "content",
            ]
        );
        assert_eq!(script.get_str("uid"), Some("map_7"));
        assert_eq!(
            script.get_str("luamenu_action"),
            Some("OnMapSelected('gm_flat');")
        );
    }

    #[test]
    fn test_install_mode_without_hooks_omits_them() {
        let pkg = Package::new(3, 1, PackageType::Entity, "Ball");
        let doc = encoder().document(&pkg, true).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();
        assert_eq!(script.get_str("uid"), Some("entity_3"));
        assert!(script.get("luamenu_installed").is_none());
        assert!(script.get("luaclient_action").is_none());
    }

    #[test]
    fn test_non_install_mode_has_no_uid() {
        let pkg = Package::new(7, 1, PackageType::Map, "Flat");
        let doc = encoder().document(&pkg, false).unwrap();
        let script = doc.get_block(ROOT_KEY).unwrap();
        assert!(script.get("uid").is_none());
        assert!(script.get("luamenu_action").is_none());
    }

    #[test]
    fn test_payload_appended_without_separator() {
        let payload = vec![0u8, 1, 2, 0xff];
        let pkg = Package::new(5, 1, PackageType::Savemap, "Save").with_data(payload.clone());
        let out = encoder().encode(&pkg, false).unwrap();

        assert!(out.ends_with(&payload));
        let header_len = out.len() - payload.len();
        assert!(out[..header_len].ends_with(b"}\n\n"));
    }

    #[test]
    fn test_non_numeric_author_is_validation_error() {
        let pkg = Package::new(5, 1, PackageType::Prop, "Thing").with_author("abc");
        let err = encoder().encode(&pkg, false).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_deterministic_output() {
        let pkg = Package::new(42, 1, PackageType::Weapon, "SuperGun").with_content(vec![
            Content::new(1, 1, "a.lua", 1, 1),
            Content::new(2, 1, "b.lua", 1, 1),
        ]);
        let a = encoder().encode(&pkg, true).unwrap();
        let b = encoder().encode(&pkg, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_url_base() {
        assert_eq!(
            ManifestEncoder::default().content_url(9),
            format!("{}9", DEFAULT_CONTENT_URL_BASE)
        );
    }
}
