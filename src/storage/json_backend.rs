use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::errors::StorageError;

use super::{KeyValueStore, Result};

const STORE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed store: one JSON file per key, with rolling backups of overwritten values.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// Describes a backup snapshot of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub key: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
    /// Per-key counter; higher is newer. `None` for files not written by this store.
    pub sequence: Option<u64>,
    pub size_bytes: u64,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf, backups_dir: PathBuf) -> Result<Self> {
        Self::with_retention(data_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, backups_dir: PathBuf, retention: usize) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_key(key), STORE_EXTENSION))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_key(key))
    }

    /// Snapshots the current value of `key`, if any. Returns the new backup.
    pub fn backup(&self, key: &str, note: Option<&str>) -> Result<Option<BackupInfo>> {
        let source = self.path_for(key);
        if !source.exists() {
            return Ok(None);
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let sequence = self
            .list_backups(key)?
            .iter()
            .filter_map(|info| info.sequence)
            .max()
            .unwrap_or(0)
            + 1;
        let mut name = format!(
            "{}_{}_{}",
            canonical_key(key),
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT),
            sequence
        );
        if let Some(label) = sanitize_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push('.');
        name.push_str(STORE_EXTENSION);
        let path = dir.join(&name);
        fs::copy(&source, &path)?;
        self.prune_backups(key)?;
        tracing::debug!(key, backup = %name, "backup written");
        Ok(self
            .list_backups(key)?
            .into_iter()
            .find(|info| info.name == name))
    }

    /// Backups for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            let (created_at, sequence) = parse_backup_name(name);
            entries.push(BackupInfo {
                key: key.to_string(),
                name: name.to_string(),
                created_at,
                sequence,
                size_bytes,
                path,
            });
        }
        entries.sort_by_key(|info| {
            (
                Reverse(info.sequence),
                Reverse(info.created_at),
                Reverse(info.name.clone()),
            )
        });
        Ok(entries)
    }

    /// Replaces the value of `backup.key` with the backup contents and returns them.
    pub fn restore(&self, backup: &BackupInfo) -> Result<String> {
        if !backup.path.exists() {
            return Err(StorageError::NotFound(format!("backup `{}`", backup.name)));
        }
        let contents = fs::read_to_string(&backup.path)?;
        self.set_item(&backup.key, &contents)?;
        tracing::info!(key = %backup.key, backup = %backup.name, "backup restored");
        Ok(contents)
    }

    fn prune_backups(&self, key: &str) -> Result<()> {
        for stale in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                tracing::warn!(key, backup = %stale.name, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            self.backup(key, None)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads `<key>_<YYYYMMDD>_<HHMMSS>_<seq>[_<note>].json` back into a timestamp and sequence.
fn parse_backup_name(name: &str) -> (Option<DateTime<Utc>>, Option<u64>) {
    let Some(stem) = name.strip_suffix(&format!(".{}", STORE_EXTENSION)) else {
        return (None, None);
    };
    let segments: Vec<&str> = stem.split('_').collect();
    let Some(index) = (0..segments.len().saturating_sub(1))
        .rev()
        .find(|&idx| is_digits(segments[idx], 8) && is_digits(segments[idx + 1], 6))
    else {
        return (None, None);
    };
    let created_at = NaiveDateTime::parse_from_str(
        &format!("{}{}", segments[index], segments[index + 1]),
        "%Y%m%d%H%M%S",
    )
    .ok()
    .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc));
    let sequence = segments
        .get(index + 2)
        .filter(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .and_then(|segment| segment.parse().ok());
    (created_at, sequence)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
