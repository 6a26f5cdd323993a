//! Tests for StorageService
//!
//! These tests verify:
//! - Storage name validation
//! - Key type resolution on create
//! - JSON key coercion on put/get
//! - Per-call open/close leaves consistent metadata

use bytes::Bytes;
use serde_json::json;

use bucketkv::protocol::key_from_json;
use bucketkv::service::validate_storage_name;
use bucketkv::{Config, HashFunction, Key, KeyType, KvError, StorageService};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_service() -> (TempDir, StorageService) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().storage_root(temp_dir.path()).build();
    (temp_dir, StorageService::new(config))
}

fn json_bytes(value: serde_json::Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&value).unwrap())
}

// =============================================================================
// Storage Name Tests
// =============================================================================

#[test]
fn test_valid_storage_names() {
    for name in ["s1", "my-storage", "with.dot", "ünïcode", "a b"] {
        assert!(validate_storage_name(name).is_ok(), "{} rejected", name);
    }
}

#[test]
fn test_invalid_storage_names() {
    for name in ["", ".", "..", "a/b", "../escape", "a\\b", "nul\0", "line\nbreak"] {
        assert!(
            matches!(
                validate_storage_name(name),
                Err(KvError::InvalidStorageName(..))
            ),
            "{:?} accepted",
            name
        );
    }
}

#[test]
fn test_invalid_name_rejected_before_touching_disk() {
    let (temp, service) = setup_temp_service();

    let result = service.create("../outside", "integer");
    assert!(matches!(result, Err(KvError::InvalidStorageName(..))));
    assert!(!temp.path().parent().unwrap().join("outside").exists());
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_storage() {
    let (temp, service) = setup_temp_service();

    service.create("s1", "integer").unwrap();

    let root = temp.path().join("s1");
    assert!(root.join("parameters").is_file());
    assert!(root.join("data").is_dir());

    let info = service.info("s1").unwrap();
    assert_eq!(info.key_type(), KeyType::Integer);
    assert_eq!(info.capacity(), 4);
    assert_eq!(info.size(), 0);
}

#[test]
fn test_create_uses_configured_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .storage_root(temp.path())
        .default_capacity(16)
        .hash_fn(Some(HashFunction::Crc32))
        .build();
    let service = StorageService::new(config);

    service.create("s1", "string").unwrap();

    let info = service.info("s1").unwrap();
    assert_eq!(info.capacity(), 16);
    assert_eq!(info.hash_fn(), Some(HashFunction::Crc32));
}

#[test]
fn test_create_unknown_key_type() {
    let (temp, service) = setup_temp_service();

    let result = service.create("s1", "java.lang.Object");
    assert!(matches!(result, Err(KvError::NoSuchKeyType(_))));
    assert!(!temp.path().join("s1").exists());
}

#[test]
fn test_create_twice() {
    let (_temp, service) = setup_temp_service();
    service.create("s1", "integer").unwrap();
    service.put("s1", &json!(1), json_bytes(json!("a"))).unwrap();

    let result = service.create("s1", "string");
    assert!(matches!(result, Err(KvError::AlreadyExists(_))));

    // Original storage untouched
    let info = service.info("s1").unwrap();
    assert_eq!(info.key_type(), KeyType::Integer);
    assert_eq!(info.size(), 1);
}

// =============================================================================
// Put / Get Tests
// =============================================================================

#[test]
fn test_put_get_roundtrip() {
    let (_temp, service) = setup_temp_service();
    service.create("s1", "integer").unwrap();

    service.put("s1", &json!(1), json_bytes(json!("a"))).unwrap();

    let value = service.get("s1", &json!(1)).unwrap();
    assert_eq!(value, json_bytes(json!("a")));
}

#[test]
fn test_get_absent_key() {
    let (_temp, service) = setup_temp_service();
    service.create("s1", "long").unwrap();

    let result = service.get("s1", &json!(7));
    assert!(matches!(result, Err(KvError::KeyNotFound)));
}

#[test]
fn test_missing_storage() {
    let (_temp, service) = setup_temp_service();

    assert!(matches!(
        service.get("nope", &json!(1)),
        Err(KvError::NotFound(_))
    ));
    assert!(matches!(
        service.put("nope", &json!(1), json_bytes(json!(1))),
        Err(KvError::NotFound(_))
    ));
}

#[test]
fn test_wrong_key_kind() {
    let (_temp, service) = setup_temp_service();
    service.create("s1", "integer").unwrap();

    let result = service.put("s1", &json!("one"), json_bytes(json!("a")));
    assert!(matches!(result, Err(KvError::InvalidKeyType { .. })));
    assert_eq!(service.info("s1").unwrap().size(), 0);
}

#[test]
fn test_size_persists_between_calls() {
    let (_temp, service) = setup_temp_service();
    service.create("s1", "string").unwrap();

    for i in 0..6 {
        service
            .put("s1", &json!(format!("k{}", i)), json_bytes(json!(i)))
            .unwrap();
    }
    service.put("s1", &json!("k0"), json_bytes(json!("again"))).unwrap();

    let info = service.info("s1").unwrap();
    assert_eq!(info.size(), 6);
    assert_eq!(info.capacity(), 8);
    assert_eq!(
        service.get("s1", &json!("k0")).unwrap(),
        json_bytes(json!("again"))
    );
}

// =============================================================================
// JSON Key Coercion Tests
// =============================================================================

#[test]
fn test_key_from_json_integer_range() {
    assert_eq!(
        key_from_json(&json!(-5), KeyType::Integer).unwrap(),
        Key::Integer(-5)
    );
    assert!(key_from_json(&json!(3_000_000_000i64), KeyType::Integer).is_err());
    assert!(key_from_json(&json!(1.5), KeyType::Integer).is_err());
    assert_eq!(
        key_from_json(&json!(3_000_000_000i64), KeyType::Long).unwrap(),
        Key::Long(3_000_000_000)
    );
}

#[test]
fn test_key_from_json_strings_and_bytes() {
    assert_eq!(
        key_from_json(&json!("k"), KeyType::String).unwrap(),
        Key::from("k")
    );
    assert_eq!(
        key_from_json(&json!("ab"), KeyType::Bytes).unwrap(),
        Key::Bytes(b"ab".to_vec())
    );
    assert_eq!(
        key_from_json(&json!([0, 255]), KeyType::Bytes).unwrap(),
        Key::Bytes(vec![0, 255])
    );
    assert!(key_from_json(&json!([256]), KeyType::Bytes).is_err());
    assert!(key_from_json(&json!(1), KeyType::String).is_err());
}

#[test]
fn test_key_from_json_error_describes_value() {
    match key_from_json(&json!(null), KeyType::Long) {
        Err(KvError::InvalidKeyType { expected, found }) => {
            assert_eq!(expected, KeyType::Long);
            assert_eq!(found, "null");
        }
        other => panic!("Expected InvalidKeyType, got {:?}", other),
    }
}
