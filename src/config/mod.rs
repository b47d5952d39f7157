//! Persistent user preferences: custom emission factors, sample seeding, backups, output.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::{EcoError, StorageError},
    ledger::{EmissionFactor, FactorTable},
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extra or replacement factors merged over the built-in table at startup.
    #[serde(default)]
    pub custom_factors: BTreeMap<String, EmissionFactor>,
    /// Seed the example activities and goals when the store has none.
    #[serde(default)]
    pub seed_sample_data: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            custom_factors: BTreeMap::new(),
            seed_sample_data: false,
            backup_retention: Self::default_backup_retention(),
            plain_output: false,
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    /// Built-in factors with `custom_factors` applied.
    pub fn factor_table(&self) -> Result<FactorTable, EcoError> {
        FactorTable::builtin().with_overrides(&self.custom_factors)
    }

    /// Applies a `key value` pair from the CLI.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), EcoError> {
        match key {
            "seed_sample_data" => self.seed_sample_data = parse_flag(key, value)?,
            "plain_output" => self.plain_output = parse_flag(key, value)?,
            "backup_retention" => {
                let retention: usize = value.parse().map_err(|_| {
                    EcoError::InvalidInput(format!("`{key}` expects a whole number, got `{value}`"))
                })?;
                if retention == 0 {
                    return Err(EcoError::InvalidInput(format!("`{key}` must be at least 1")));
                }
                self.backup_retention = retention;
            }
            other => {
                return Err(EcoError::InvalidInput(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, EcoError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(EcoError::InvalidInput(format!(
            "`{key}` expects true or false, got `{value}`"
        ))),
    }
}

/// Loads and saves [`Config`] at `<home>/config/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StorageError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StorageError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, StorageError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{TMP_SUFFIX}"));
    tmp
}
