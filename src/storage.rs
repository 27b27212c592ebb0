use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config;
use crate::player::Player;
use crate::settings::Settings;

pub const SETTINGS_KEY: &str = "settings";
pub const BEST_KEY: &str = "best";

/// Best-of record across runs. Each field is tracked independently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BestRun {
    pub time: f32,
    pub max_mass: f32,
    pub level: u32,
    pub kills: u32,
}

impl Default for BestRun {
    fn default() -> Self {
        Self {
            time: 0.0,
            max_mass: 0.0,
            level: 1,
            kills: 0,
        }
    }
}

impl BestRun {
    pub fn from_player(player: &Player) -> Self {
        Self {
            time: player.stats.time,
            max_mass: player.stats.max_mass,
            level: player.level,
            kills: player.stats.kills,
        }
    }

    /// Per-field maximum of two records.
    pub fn merge(&self, run: &BestRun) -> BestRun {
        BestRun {
            time: self.time.max(run.time),
            max_mass: self.max_mass.max(run.max_mass),
            level: self.level.max(run.level),
            kills: self.kills.max(run.kills),
        }
    }
}

#[derive(Debug)]
pub enum StorageError {
    /// No value has been stored under this key yet.
    Missing { key: String },
    /// The stored value exists but does not decode.
    Corrupt { key: String, reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "no stored value for '{key}'"),
            Self::Corrupt { key, reason } => write!(f, "stored value for '{key}' is corrupt: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Durable home for settings and the best-run record.
pub trait Storage {
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;
    fn load_best(&self) -> Result<BestRun>;
    fn save_best(&mut self, best: &BestRun) -> Result<()>;
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// One JSON file per key inside a directory.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{key}.json", config::STORAGE_PREFIX))
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StorageError::Missing {
                key: key.to_string(),
            }
            .into());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        decode(key, &raw)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(value).context("serializing value")?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_settings(&self) -> Result<Settings> {
        self.read(SETTINGS_KEY)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    fn load_best(&self) -> Result<BestRun> {
        self.read(BEST_KEY)
    }

    fn save_best(&mut self, best: &BestRun) -> Result<()> {
        self.write(BEST_KEY, best)
    }
}

/// In-process storage holding raw JSON strings, for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    pub values: HashMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw = self.values.get(key).ok_or_else(|| StorageError::Missing {
            key: key.to_string(),
        })?;
        decode(key, raw)
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("memory storage is read-only");
        }
        let json = serde_json::to_string(value).context("serializing value")?;
        self.values.insert(key.to_string(), json);
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load_settings(&self) -> Result<Settings> {
        self.read(SETTINGS_KEY)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    fn load_best(&self) -> Result<BestRun> {
        self.read(BEST_KEY)
    }

    fn save_best(&mut self, best: &BestRun) -> Result<()> {
        self.write(BEST_KEY, best)
    }
}
