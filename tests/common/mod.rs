#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use eco_core::{
    core::{utils::PathResolver, FixedClock, FootprintManager},
    ledger::FactorTable,
    storage::JsonFileStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

/// A fresh home directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn file_store(base: &Path) -> JsonFileStore {
    JsonFileStore::with_retention(
        PathResolver::store_dir_in(base),
        PathResolver::backup_dir_in(base),
        3,
    )
    .expect("create json store")
}

/// Opens a manager on the store under `base`, pinned to [`today`].
pub fn open_manager(base: &Path) -> FootprintManager {
    FootprintManager::open(
        Box::new(file_store(base)),
        FactorTable::builtin(),
        Box::new(FixedClock::new(today())),
    )
    .expect("open footprint manager")
}
