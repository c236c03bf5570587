use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use scribe::session::{Message, Session, SessionStore};
use scribe::storage::{FileStorage, LocalStorage, SESSIONS_KEY};

#[allow(dead_code)]
pub fn storage_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("local_storage.json")
}

#[allow(dead_code)]
pub fn create_temp_store() -> (SessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = FileStorage::new_with_path(storage_path(&tmp))
        .expect("failed to create file storage with path");
    let store = SessionStore::open(Box::new(storage)).expect("failed to open session store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn reopen_store(tmp: &TempDir) -> SessionStore {
    let storage = FileStorage::new_with_path(storage_path(tmp)).expect("reopen storage");
    SessionStore::open(Box::new(storage)).expect("reopen session store")
}

/// Write `sessions` straight into the storage file under the sessions key
#[allow(dead_code)]
pub fn seed_sessions(tmp: &TempDir, sessions: &[Session]) {
    let mut storage = FileStorage::new_with_path(storage_path(tmp)).expect("open storage");
    let raw = serde_json::to_string(sessions).expect("serialize sessions");
    storage.set_item(SESSIONS_KEY, &raw).expect("seed sessions");
}

#[allow(dead_code)]
pub fn saved_session(id: &str, name: &str, prompts: &[&str]) -> Session {
    Session {
        id: id.to_string(),
        name: name.to_string(),
        messages: prompts.iter().map(|p| Message::user(*p)).collect(),
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
