//! Service configuration: a plain struct loaded from an optional TOML file
//! and passed into the handler layer at startup. Missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "YOKLAMAD_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "yoklamad.toml";

/// Settings for the speech transcription collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the transcription service.
    pub base_url: String,
    /// Locale tag sent with every transcription request.
    pub locale: String,
    /// Upper bound on one capture-plus-transcription round trip.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5005".into(),
            locale: "tr-TR".into(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// SQLite database file, created on first start.
    pub db_path: PathBuf,
    /// Directory student photos are stored under, created on first start.
    pub upload_dir: PathBuf,
    pub speech: SpeechConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            db_path: PathBuf::from("school.db"),
            upload_dir: PathBuf::from("static/uploads"),
            speech: SpeechConfig::default(),
        }
    }
}

impl Config {
    /// Load from `$YOKLAMAD_CONFIG`, falling back to `yoklamad.toml` in the
    /// working directory. A missing file yields the defaults so a first run
    /// needs no setup.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
