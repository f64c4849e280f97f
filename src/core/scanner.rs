//! # Note Scanner
//!
//! Walks the notes root and collects every `.md` and `.pdf` file.
//!
//! - Entries are visited in file-name order inside each directory, so two
//!   scans of an unchanged tree return the same sequence.
//! - Symlinked directories are not descended into (no cycles). A symlink
//!   that points at a regular file is still listed.
//! - Only a failure at the root fails the scan. Unreadable subdirectories
//!   are logged and skipped.

use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Markdown,
    Pdf,
}

impl NoteKind {
    /// Classify a path by its lowercased extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" => Some(NoteKind::Markdown),
            "pdf" => Some(NoteKind::Pdf),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteKind::Markdown => "md",
            NoteKind::Pdf => "pdf",
        }
    }
}

/// A note discovered under the root. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef {
    pub path: PathBuf,
    pub kind: NoteKind,
}

impl NoteRef {
    pub fn new(path: impl Into<PathBuf>, kind: NoteKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// File name shown in the list and matched by the filter.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Path relative to `root`, falling back to the full path.
    pub fn display_path(&self, root: &Path) -> String {
        self.path
            .strip_prefix(root)
            .unwrap_or(&self.path)
            .display()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub root: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to scan notes directory '{}': {}",
            self.root.display(),
            self.message
        )
    }
}

impl std::error::Error for ScanError {}

/// Recursively collect the notes under `root`.
pub fn scan(root: &Path) -> Result<Vec<NoteRef>, ScanError> {
    let fail = |message: String| ScanError {
        root: root.to_path_buf(),
        message,
    };

    let metadata = fs::metadata(root).map_err(|e| fail(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(fail("not a directory".to_string()));
    }
    // Surface permission problems on the root itself instead of an empty list
    fs::read_dir(root).map_err(|e| fail(e.to_string()))?;

    let mut notes = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
    {
        let path = entry.path();
        if entry.file_type().is_dir() {
            continue;
        }
        // Symlinks are only listed when they resolve to a regular file
        if entry.path_is_symlink() && !path.is_file() {
            debug!("Skipping symlink {}", path.display());
            continue;
        }
        if let Some(kind) = NoteKind::from_path(path) {
            notes.push(NoteRef::new(path, kind));
        }
    }

    info!("Scanned {}: {} notes", root.display(), notes.len());
    Ok(notes)
}
