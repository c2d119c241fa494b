//! Tests for Engine
//!
//! These tests verify:
//! - Opening new and existing databases
//! - Write/read round trips and the on-disk format
//! - Empty-key rejection
//! - read_all and delete semantics

use std::collections::BTreeMap;
use std::fs;

use cachedb::config::Config;
use cachedb::engine::Engine;
use cachedb::CacheDbError;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    city: String,
    country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct User {
    name: String,
    age: String,
    company: String,
    address: Address,
}

fn user(name: &str, company: &str) -> User {
    User {
        name: name.to_string(),
        age: "24".to_string(),
        company: company.to_string(),
        address: Address {
            city: "Shanghai".to_string(),
            country: "China".to_string(),
        },
    }
}

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path().join("db")).unwrap();
    (temp_dir, engine)
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("a").join("b").join("db");

    let engine = Engine::open_path(&root).unwrap();

    assert!(root.is_dir());
    assert_eq!(engine.root_dir(), root.as_path());
    assert_eq!(engine.lock_count(), 0);
}

#[test]
fn test_open_existing_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("db");

    {
        let engine = Engine::open_path(&root).unwrap();
        engine.write("users", "emory", &user("Emory", "Google")).unwrap();
    }

    let engine = Engine::open_path(&root).unwrap();
    let loaded: User = engine.read("users", "emory").unwrap();
    assert_eq!(loaded, user("Emory", "Google"));
}

#[test]
fn test_open_normalizes_root() {
    let temp_dir = TempDir::new().unwrap();
    let messy = temp_dir.path().join("x").join("..").join(".").join("db");

    let engine = Engine::open_path(&messy).unwrap();

    assert_eq!(engine.root_dir(), temp_dir.path().join("db").as_path());
    assert!(temp_dir.path().join("db").is_dir());
}

#[test]
fn test_open_empty_root_is_invalid() {
    let config = Config::builder().root_dir("").build();

    let result = Engine::open(config);

    assert!(matches!(result, Err(CacheDbError::InvalidConfiguration(_))));
}

#[cfg(unix)]
#[test]
fn test_created_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "lin", &user("Lin", "Google")).unwrap();

    let dir_mode = fs::metadata(engine.root_dir().join("users")).unwrap().permissions().mode();
    let file_mode = fs::metadata(engine.root_dir().join("users").join("lin.json"))
        .unwrap()
        .permissions()
        .mode();

    // Modes are subject to the process umask, which only clears bits
    assert_eq!(dir_mode & 0o700, 0o700);
    assert_eq!(dir_mode & 0o022, 0);
    assert_eq!(file_mode & 0o777 & !0o644, 0);
    assert_eq!(file_mode & 0o600, 0o600);
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_write_read_roundtrip() {
    let (_temp, engine) = setup_temp_engine();
    let original = user("Gao", "Microsoft");

    engine.write("users", "gao", &original).unwrap();
    let loaded: User = engine.read("users", "gao").unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn test_write_on_disk_format() {
    let (_temp, engine) = setup_temp_engine();
    let mut record = BTreeMap::new();
    record.insert("Age", "30");
    record.insert("Name", "Alice");

    engine.write("users", "alice", &record).unwrap();

    let path = engine.root_dir().join("users").join("alice.json");
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{\n\t\"Age\": \"30\",\n\t\"Name\": \"Alice\"\n}\n");
    assert!(!engine.root_dir().join("users").join("alice.json.tmp").exists());
}

#[test]
fn test_write_overwrite() {
    let (_temp, engine) = setup_temp_engine();

    engine.write("users", "smith", &user("Smith", "Alibaba")).unwrap();
    engine.write("users", "smith", &user("Smith", "Tesla")).unwrap();

    let loaded: User = engine.read("users", "smith").unwrap();
    assert_eq!(loaded.company, "Tesla");
}

#[test]
fn test_write_overwrites_stale_tmp() {
    let (_temp, engine) = setup_temp_engine();
    let dir = engine.root_dir().join("users");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ross.json.tmp"), b"{ half a rec").unwrap();

    engine.write("users", "ross", &user("Ross", "Tesla")).unwrap();

    assert!(!dir.join("ross.json.tmp").exists());
    let loaded: User = engine.read("users", "ross").unwrap();
    assert_eq!(loaded.name, "Ross");
}

#[test]
fn test_write_registers_collection_lock() {
    let (_temp, engine) = setup_temp_engine();

    engine.write("users", "a", &1).unwrap();
    engine.write("users", "b", &2).unwrap();
    engine.write("orders", "a", &3).unwrap();

    assert_eq!(engine.lock_count(), 2);
}

#[test]
fn test_write_unencodable_value() {
    let (_temp, engine) = setup_temp_engine();
    let mut record = BTreeMap::new();
    record.insert((1, 2), "tuple keys are not JSON object keys");

    let result = engine.write("users", "bad", &record);

    assert!(matches!(result, Err(CacheDbError::Encode(_))));
    assert!(!engine.root_dir().join("users").join("bad.json").exists());
}

#[test]
fn test_read_missing_record() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "alice", &user("Alice", "Google")).unwrap();

    let result: cachedb::Result<User> = engine.read("users", "bob");

    match result {
        Err(CacheDbError::NotFound(path)) => {
            assert_eq!(path, std::path::PathBuf::from("users").join("bob"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_read_missing_collection() {
    let (_temp, engine) = setup_temp_engine();

    let result: cachedb::Result<User> = engine.read("nobody", "alice");

    assert!(result.unwrap_err().is_not_found());
}

#[test]
fn test_read_malformed_record() {
    let (_temp, engine) = setup_temp_engine();
    let dir = engine.root_dir().join("users");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("broken.json"), b"{\"Name\": ").unwrap();

    let result: cachedb::Result<User> = engine.read("users", "broken");

    assert!(matches!(result, Err(CacheDbError::Decode(_))));
}

#[test]
fn test_read_wrong_shape() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "n", &42).unwrap();

    let result: cachedb::Result<User> = engine.read("users", "n");

    assert!(matches!(result, Err(CacheDbError::Decode(_))));
}

#[test]
fn test_read_raw_returns_encoded_bytes() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("numbers", "answer", &42).unwrap();

    let bytes = engine.read_raw("numbers", "answer").unwrap();

    assert_eq!(&bytes[..], b"42\n");
}

// =============================================================================
// Empty Key Tests
// =============================================================================

#[test]
fn test_write_rejects_empty_keys() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(
        engine.write("", "alice", &1),
        Err(CacheDbError::MissingCollection)
    ));
    assert!(matches!(
        engine.write("users", "", &1),
        Err(CacheDbError::MissingResourceName)
    ));
    // Nothing touched the disk
    assert_eq!(fs::read_dir(engine.root_dir()).unwrap().count(), 0);
    assert_eq!(engine.lock_count(), 0);
}

#[test]
fn test_read_rejects_empty_keys() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(
        engine.read::<i32>("", "alice"),
        Err(CacheDbError::MissingCollection)
    ));
    assert!(matches!(
        engine.read::<i32>("users", ""),
        Err(CacheDbError::MissingResourceName)
    ));
    assert!(matches!(engine.read_all(""), Err(CacheDbError::MissingCollection)));
    assert!(matches!(engine.delete("", ""), Err(CacheDbError::MissingCollection)));
}

// =============================================================================
// ReadAll Tests
// =============================================================================

#[test]
fn test_read_all_returns_every_record() {
    let (_temp, engine) = setup_temp_engine();
    let users = vec![
        user("Emory", "Google"),
        user("Lin", "Google"),
        user("Gao", "Microsoft"),
        user("John", "ByteDance"),
    ];
    for u in &users {
        engine.write("users", &u.name, u).unwrap();
    }

    let raw = engine.read_all("users").unwrap();
    assert_eq!(raw.len(), users.len());

    let mut decoded: Vec<User> = engine.read_all_as("users").unwrap();
    decoded.sort_by(|a, b| a.name.cmp(&b.name));
    let mut expected = users.clone();
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(decoded, expected);
}

#[test]
fn test_read_all_missing_collection() {
    let (_temp, engine) = setup_temp_engine();

    assert!(engine.read_all("nobody").unwrap_err().is_not_found());
}

#[test]
fn test_read_all_includes_stray_files() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "alice", &1).unwrap();
    fs::write(engine.root_dir().join("users").join("bob.json.tmp"), b"leftover").unwrap();

    let mut raw: Vec<Vec<u8>> = engine
        .read_all("users")
        .unwrap()
        .into_iter()
        .map(|b| b.to_vec())
        .collect();
    raw.sort();

    assert_eq!(raw, vec![b"1\n".to_vec(), b"leftover".to_vec()]);
}

#[test]
fn test_read_all_empty_collection() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "alice", &1).unwrap();
    engine.delete("users", "alice").unwrap();

    assert!(engine.read_all("users").unwrap().is_empty());
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_record() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "alice", &user("Alice", "Google")).unwrap();
    engine.write("users", "bob", &user("Bob", "Google")).unwrap();

    engine.delete("users", "alice").unwrap();

    assert!(!engine.root_dir().join("users").join("alice.json").exists());
    assert!(engine.read::<User>("users", "alice").unwrap_err().is_not_found());
    assert_eq!(engine.read::<User>("users", "bob").unwrap().name, "Bob");
}

#[test]
fn test_delete_missing_is_not_found_twice() {
    let (_temp, engine) = setup_temp_engine();
    engine.write("users", "alice", &1).unwrap();

    assert!(engine.delete("users", "ghost").unwrap_err().is_not_found());

    engine.delete("users", "alice").unwrap();
    assert!(engine.delete("users", "alice").unwrap_err().is_not_found());
}

#[test]
fn test_delete_whole_collection() {
    let (_temp, engine) = setup_temp_engine();
    for name in ["a", "b", "c"] {
        engine.write("users", name, &user(name, "Google")).unwrap();
    }
    engine.write("orders", "o1", &1).unwrap();

    engine.delete("users", "").unwrap();

    assert!(!engine.root_dir().join("users").exists());
    assert!(engine.read_all("users").unwrap_err().is_not_found());
    assert_eq!(engine.read::<i32>("orders", "o1").unwrap(), 1);
}

#[test]
fn test_delete_nested_directory() {
    let (_temp, engine) = setup_temp_engine();
    let nested = engine.root_dir().join("users").join("archive");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("old.json"), b"{}").unwrap();

    engine.delete("users", "archive").unwrap();

    assert!(!nested.exists());
    assert!(engine.root_dir().join("users").is_dir());
}
