#![allow(dead_code)]
use asmanager::config::Config;
use asmanager::db::{MemoryStore, SharedStore, SqliteStore};
use asmanager::models::record::WireRecord;
use asmanager::server::{AppState, build_router};
use assert_cmd::{Command, cargo_bin_cmd};
use axum_test::TestServer;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub fn asm() -> Command {
    cargo_bin_cmd!("asmanager")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_asmanager.db", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_asmanager_out.{}", name, ext));
    fs::remove_file(&path).ok();
    path
}

pub fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

pub fn sqlite_store(name: &str) -> SharedStore {
    Arc::new(SqliteStore::open(&setup_test_db(name)).expect("open sqlite store"))
}

/// One store of each variant; every store test runs against both.
pub fn both_stores(name: &str) -> Vec<SharedStore> {
    vec![memory_store(), sqlite_store(name)]
}

/// Build a wire record from a `json!` object literal.
pub fn record(value: Value) -> WireRecord {
    value.as_object().cloned().expect("record literal must be an object")
}

pub fn test_server(store: SharedStore) -> TestServer {
    let cfg = Config {
        static_dir: env::temp_dir()
            .join("asmanager_no_static_dir")
            .to_string_lossy()
            .to_string(),
        ..Config::default()
    };
    TestServer::new(build_router(AppState::new(store, &cfg))).expect("test server")
}
