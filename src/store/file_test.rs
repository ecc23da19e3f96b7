use super::*;
use crate::api::UserId;

fn user() -> User {
    User { id: UserId::Text("u-42".into()), email: Some("a@b.com".into()), name: None, extra: serde_json::Map::new() }
}

fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
    FileTokenStore::new(dir.path().join("nested").join("session.json"), StorageKeys::default())
}

#[test]
fn missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.load().is_none());
    assert!(!store.has_token());
}

#[test]
fn save_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("tok-1", &user()).unwrap();

    assert!(store.path().exists());
    let loaded = store.load().unwrap();
    assert_eq!(loaded.token, "tok-1");
    assert_eq!(loaded.user, user());
}

#[test]
fn survives_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    store_in(&dir).save("tok-1", &user()).unwrap();

    // A second instance over the same file is the "page reload".
    let reloaded = store_in(&dir);
    assert_eq!(reloaded.load().map(|s| s.token).as_deref(), Some("tok-1"));
}

#[test]
fn clear_removes_file_when_no_other_slots() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("tok-1", &user()).unwrap();
    store.clear().unwrap();

    assert!(!store.path().exists());
    assert!(store.load().is_none());
    store.clear().unwrap();
}

#[test]
fn clear_keeps_foreign_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"safe_theme":"dark"}"#).unwrap();

    let store = FileTokenStore::new(&path, StorageKeys::default());
    store.save("tok-1", &user()).unwrap();
    store.clear().unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"safe_theme": "dark"}));
}

#[test]
fn corrupt_file_loads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileTokenStore::new(&path, StorageKeys::default());
    assert!(store.load().is_none());

    // The next save replaces the damaged file.
    store.save("tok-2", &user()).unwrap();
    assert_eq!(store.load().map(|s| s.token).as_deref(), Some("tok-2"));
}

#[test]
fn corrupt_user_slot_loads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"safe_auth_token":"tok","safe_user_data":"{\"no_id\":true}"}"#).unwrap();

    let store = FileTokenStore::new(&path, StorageKeys::default());
    assert!(store.load().is_none());
    assert!(store.has_token());
}
