//! # Errors
//!
//! Each component owns its error enum (`ConfigError`, `ScanError`,
//! `LoadError`, `RenderError`). `AppError` wraps them so the state machine
//! can hold any of them in `AppState::Fatal` or show them as a notice.
//!
//! ```text
//! ErrorKind            Source                         Policy
//! ───────────────────  ─────────────────────────────  ───────────────────
//! ConfigCorrupt        ConfigError::Corrupt           fatal
//! IoFailure            ConfigError::{Io, NoConfigDir} fatal
//! ScanFailure          ScanError                      fatal
//! UnsupportedPlatform  LoadError::UnsupportedPlatform fatal
//! ReadFailure          LoadError::Read                back to Browsing
//! LaunchFailure        LoadError::Launch              back to Browsing
//! RenderFailure        RenderError                    back to Browsing
//! ```
//!
//! A missing config file is not an error: `ConfigStore::load` returns
//! `Ok(None)` for it.

use std::fmt;

use crate::core::config::ConfigError;
use crate::core::loader::LoadError;
use crate::core::render::RenderError;
use crate::core::scanner::ScanError;

/// Flat classification of every failure the app can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigCorrupt,
    ScanFailure,
    ReadFailure,
    RenderFailure,
    UnsupportedPlatform,
    LaunchFailure,
    IoFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Config(ConfigError),
    Scan(ScanError),
    Load(LoadError),
    Render(RenderError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(ConfigError::Corrupt { .. }) => ErrorKind::ConfigCorrupt,
            AppError::Config(_) => ErrorKind::IoFailure,
            AppError::Scan(_) => ErrorKind::ScanFailure,
            AppError::Load(LoadError::Read { .. }) => ErrorKind::ReadFailure,
            AppError::Load(LoadError::UnsupportedPlatform(_)) => ErrorKind::UnsupportedPlatform,
            AppError::Load(LoadError::Launch { .. }) => ErrorKind::LaunchFailure,
            AppError::Render(_) => ErrorKind::RenderFailure,
        }
    }

    /// Errors scoped to a single note leave the rest of the session usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ReadFailure | ErrorKind::RenderFailure | ErrorKind::LaunchFailure
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{e}"),
            AppError::Scan(e) => write!(f, "{e}"),
            AppError::Load(e) => write!(f, "{e}"),
            AppError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ScanError> for AppError {
    fn from(e: ScanError) -> Self {
        AppError::Scan(e)
    }
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Load(e)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}
