//! # Configuration
//!
//! Puntes persists exactly one value: the root of the notes tree.
//!
//! Config lives at `<config dir>/gopuntes/config.toml` (`~/.config` on Linux).
//! A missing file is the normal first-run case and is reported as
//! `Ok(None)`, which sends the app into the path prompt.
//!
//! ```toml
//! notes_path = "/home/u/notes"
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// Config Struct
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Absolute path of the notes root. Empty means "not configured yet".
    #[serde(default)]
    pub notes_path: String,
}

impl Config {
    pub fn new(notes_path: impl Into<String>) -> Self {
        Self {
            notes_path: notes_path.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.notes_path.trim().is_empty()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file exists but does not parse.
    Corrupt { path: PathBuf, message: String },
    /// Reading or writing the file failed.
    Io { path: PathBuf, message: String },
    /// No per-user config directory on this system.
    NoConfigDir,
}

impl ConfigError {
    fn io(path: &Path, e: &io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Corrupt { path, message } => {
                write!(f, "config file {} is corrupt: {message}", path.display())
            }
            ConfigError::Io { path, message } => {
                write!(f, "config I/O error on {}: {message}", path.display())
            }
            ConfigError::NoConfigDir => write!(f, "could not determine a config directory"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Store
// ============================================================================

const APP_DIR: &str = "gopuntes";
const CONFIG_FILE: &str = "config.toml";

/// Loads and saves `Config` at a fixed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at an explicit file path (used by `--config` and tests).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/gopuntes/config.toml`.
    pub fn default_location() -> Result<Self, ConfigError> {
        dirs::config_dir()
            .map(|dir| Self::at(dir.join(APP_DIR).join(CONFIG_FILE)))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config.
    ///
    /// Returns `Ok(None)` when the file is missing or `notes_path` is empty,
    /// and `ConfigError::Corrupt` when the file exists but does not parse.
    pub fn load(&self) -> Result<Option<Config>, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(ConfigError::io(&self.path, &e)),
        };

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Corrupt {
            path: self.path.clone(),
            message: e.message().to_string(),
        })?;
        debug!("Config: {:?}", config);

        if !config.is_configured() {
            warn!("Config at {} has an empty notes_path", self.path.display());
            return Ok(None);
        }

        info!("Loaded config from {}", self.path.display());
        Ok(Some(config))
    }

    /// Persist the config.
    ///
    /// Writes a `.tmp` sibling, syncs it, then renames it over the target so
    /// `load()` never sees a half-written file.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, &e))?;
        }

        let body = toml::to_string(config).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let mut file = fs::File::create(&tmp_path).map_err(|e| ConfigError::io(&tmp_path, &e))?;
        file.write_all(body.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ConfigError::io(&tmp_path, &e))?;
        drop(file);
        fs::rename(&tmp_path, &self.path).map_err(|e| ConfigError::io(&self.path, &e))?;

        info!("Saved notes_path to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Path entry
// ============================================================================

/// Normalize a path typed into the prompt: trim it, expand a leading `~`,
/// and make it absolute against the current directory.
///
/// Returns `None` for blank input or when no absolute form can be built.
pub fn normalize_entered_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let expanded = match (trimmed.strip_prefix('~'), dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(trimmed),
    };

    match std::path::absolute(&expanded) {
        Ok(absolute) => Some(absolute.display().to_string()),
        Err(e) => {
            warn!("Cannot resolve {}: {}", expanded.display(), e);
            None
        }
    }
}
