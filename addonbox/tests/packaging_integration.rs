//! Integration tests for the packaging pipeline.
//!
//! These tests drive the full flow through the public API:
//! - store → resolver → manifest / archive bytes
//! - archive output decoded again with the conformant reader
//! - the directory-backed store on a temporary data root
//!
//! Run with: `cargo test --test packaging_integration`

use std::sync::Arc;

use addonbox::archive::{encode_archive, read_archive};
use addonbox::config::ServiceConfig;
use addonbox::manifest::{encode_manifest, KeyValues, ManifestEncoder, Value};
use addonbox::package::{BlobKey, Content, Include, Package, PackageType};
use addonbox::service::PackageService;
use addonbox::store::{BlobFormat, DirectoryStore, MemoryStore};
use addonbox::CoreError;

// ============================================================================
// Helper Functions
// ============================================================================

/// The SuperGun weapon: one scripted file and one denied model variant.
fn super_gun() -> Package {
    Package::new(42, 1, PackageType::Weapon, "SuperGun")
        .with_author("76561197960287930")
        .with_author_name("Garry")
        .with_description("It shoots.")
        .with_content(vec![
            Content::new(100, 1, "lua/weapons/gun.lua", 120, 70),
            Content::new(101, 1, "models/gun.sw.vtx", 800, 300),
        ])
}

fn super_gun_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert_package(super_gun());
    store.insert_blob(BlobKey::new(100, 1), vec![b'g'; 120]);
    store.insert_blob(BlobKey::new(101, 1), vec![b'v'; 800]);
    store
}

fn service_over(store: Arc<MemoryStore>) -> PackageService {
    PackageService::new(ServiceConfig::default(), store.clone(), store)
}

fn script_block(doc: &KeyValues) -> &KeyValues {
    doc.get_block("script").expect("script block")
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn test_super_gun_archive_contains_only_whitelisted_file() {
    let service = service_over(super_gun_store());

    let bytes = service.archive(42, None, None).unwrap();
    let archive = read_archive(&bytes).unwrap();

    assert_eq!(archive.header.name, "SuperGun");
    assert_eq!(archive.header.author_id, 76561197960287930);
    assert_eq!(archive.header.author_name, "Garry");
    assert_eq!(archive.header.revision, 1);
    assert_eq!(archive.header.description.description, "It shoots.");
    assert_eq!(archive.header.description.package_type, "weapon");
    assert_eq!(archive.header.description.tags, vec!["fun"]);

    assert_eq!(archive.entries.len(), 1);
    let entry = &archive.entries[0];
    assert_eq!(entry.index, 1);
    assert_eq!(entry.path, "lua/weapons/gun.lua");
    assert_eq!(entry.size, 120);
    assert_eq!(entry.crc, 0);
    assert_eq!(entry.data.as_ref(), vec![b'g'; 120].as_slice());

    // The denied model body never reaches the output.
    assert!(!bytes.windows(8).any(|w| w == b"vvvvvvvv"));
    assert!(!bytes.windows(10).any(|w| w == b"models/gun"));
}

#[test]
fn test_super_gun_manifest_lists_all_content() {
    let service = service_over(super_gun_store());

    let text = String::from_utf8(service.manifest(42, None).unwrap()).unwrap();
    assert!(text.contains("\"name\"\t\"lua/weapons/gun.lua\""));
    assert!(text.contains("\"name\"\t\"models/gun.sw.vtx\""));
    assert!(text.contains("\"size\"\t\"70\""));
    assert!(text.contains("\"size\"\t\"300\""));
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_empty_content_archive_is_empty_success() {
    let package = Package::new(1, 1, PackageType::Prop, "Nothing");
    let bytes = encode_archive(&package, &MemoryStore::new()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn test_non_numeric_author_fails_both_encoders() {
    let package = super_gun().with_author("abc");
    let store = super_gun_store();

    let archive_err = encode_archive(&package, store.as_ref()).unwrap_err();
    assert!(matches!(archive_err, CoreError::Validation(_)));

    let manifest_err = encode_manifest(&package, false).unwrap_err();
    assert!(matches!(manifest_err, CoreError::Validation(_)));
}

#[test]
fn test_absent_author_is_zero() {
    let store = super_gun_store();
    let mut package = super_gun();
    package.author = None;

    let archive = read_archive(&encode_archive(&package, store.as_ref()).unwrap()).unwrap();
    assert_eq!(archive.header.author_id, 0);
}

#[test]
fn test_revision_resolution() {
    let store = Arc::new(MemoryStore::new());
    for rev in 1..=3 {
        store.insert_package(Package::new(9, rev, PackageType::Entity, format!("v{}", rev)));
    }
    let service = service_over(store);

    assert_eq!(service.package(9, Some(0)).unwrap().revision, 3);
    assert_eq!(service.package(9, None).unwrap().revision, 3);
    assert_eq!(service.package(9, Some(1)).unwrap().name, "v1");
    assert!(service.package(10, None).unwrap_err().is_not_found());
}

// ============================================================================
// Manifest ordering
// ============================================================================

#[test]
fn test_manifest_field_order() {
    let package = super_gun().with_includes(vec![Include::new(7, 2, PackageType::Map)]);
    let doc = ManifestEncoder::default().document(&package, false).unwrap();
    let script = script_block(&doc);

    let keys: Vec<_> = script.keys().collect();
    assert_eq!(
        keys,
        vec!["scriptid", "revision", "type", "dataname", "name", "content", "includes"]
    );

    let content = script.get_block("content").unwrap();
    for (_, entry) in content.entries() {
        match entry {
            Value::Block(fields) => {
                let keys: Vec<_> = fields.keys().collect();
                assert_eq!(keys, vec!["id", "rev", "name", "url", "size"]);
            }
            Value::Scalar(_) => panic!("content entries are blocks"),
        }
    }

    let include = script
        .get_block("includes")
        .and_then(|b| b.get_block("include_7"))
        .unwrap();
    assert_eq!(include.keys().collect::<Vec<_>>(), vec!["id", "rev", "type"]);
}

#[test]
fn test_manifest_payload_follows_text() {
    let package = Package::new(5, 1, PackageType::Savemap, "Save")
        .with_dataname("gm_flatgrass")
        .with_data(b"\x00SAVE\xff".to_vec());

    let bytes = encode_manifest(&package, false).unwrap();
    assert!(bytes.ends_with(b"}\n\n\x00SAVE\xff"));
}

// ============================================================================
// Directory-backed store
// ============================================================================

#[test]
fn test_directory_store_end_to_end() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = Arc::new(DirectoryStore::new(temp.path()).with_blob_format(BlobFormat::Gzip));

    let mut second = super_gun().with_description("Second revision");
    second.revision = 2;
    store.put_package(&super_gun()).unwrap();
    store.put_package(&second).unwrap();
    store.put_blob(BlobKey::new(100, 1), &[b'g'; 120]).unwrap();
    store.put_blob(BlobKey::new(101, 1), &[b'v'; 800]).unwrap();

    let service = PackageService::new(ServiceConfig::default(), store.clone(), store);
    let archive = read_archive(&service.archive(42, None, None).unwrap()).unwrap();

    assert_eq!(archive.header.description.description, "Second revision");
    assert_eq!(archive.entries.len(), 1);
    assert_eq!(archive.entries[0].data.len(), 120);
}

#[test]
fn test_directory_store_zip_blobs_end_to_end() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = Arc::new(DirectoryStore::new(temp.path()).with_blob_format(BlobFormat::Zip));

    store.put_package(&super_gun()).unwrap();
    store.put_blob(BlobKey::new(100, 1), &[b'g'; 120]).unwrap();
    store.put_blob(BlobKey::new(101, 1), &[b'v'; 800]).unwrap();

    let service = PackageService::new(ServiceConfig::default(), store.clone(), store);
    let archive = read_archive(&service.archive(42, None, None).unwrap()).unwrap();

    assert_eq!(archive.entries.len(), 1);
    assert_eq!(archive.entries[0].data, vec![b'g'; 120]);
}

#[test]
fn test_directory_store_missing_blob_is_not_found() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = Arc::new(DirectoryStore::new(temp.path()));
    store.put_package(&super_gun()).unwrap();

    let service = PackageService::new(ServiceConfig::default(), store.clone(), store);
    assert!(service.archive(42, None, None).unwrap_err().is_not_found());
}
