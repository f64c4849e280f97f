//! # Content Loader
//!
//! Reads Markdown notes and hands PDFs to the platform's default viewer.
//! Both operations are async and meant to run on the tokio runtime, never
//! on the UI loop.

use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use crate::core::scanner::NoteRef;

/// Notes larger than this are refused instead of being read into memory.
pub const MAX_NOTE_BYTES: u64 = 8 * 1024 * 1024;

/// How long to wait for the opener's exit status. An opener still running
/// after this is left alone and the launch counts as done.
pub const LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The note could not be read.
    Read { path: PathBuf, message: String },
    /// No known opener command for this OS.
    UnsupportedPlatform(String),
    /// The opener could not be started or exited unsuccessfully.
    Launch { path: PathBuf, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            LoadError::UnsupportedPlatform(os) => write!(f, "unsupported operating system: {os}"),
            LoadError::Launch { path, message } => {
                write!(f, "failed to open {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Read the whole note into memory.
pub async fn read_markdown(note: &NoteRef) -> Result<Vec<u8>, LoadError> {
    read_capped(&note.path, MAX_NOTE_BYTES).await
}

async fn read_capped(path: &Path, limit: u64) -> Result<Vec<u8>, LoadError> {
    let fail = |message: String| LoadError::Read {
        path: path.to_path_buf(),
        message,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| fail(e.to_string()))?;
    if metadata.len() > limit {
        return Err(fail(format!(
            "note is {} bytes, larger than the {} byte limit",
            metadata.len(),
            limit
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| fail(e.to_string()))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// The command line that opens `path` with the default viewer on `os`
/// (a value of `std::env::consts::OS`).
pub fn opener_for(os: &str, path: &Path) -> Option<(&'static str, Vec<String>)> {
    let target = path.display().to_string();
    match os {
        "macos" => Some(("open", vec![target])),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            Some(("xdg-open", vec![target]))
        }
        // `start` treats the first quoted argument as a window title
        "windows" => Some((
            "cmd",
            vec!["/C".into(), "start".into(), String::new(), target],
        )),
        _ => None,
    }
}

/// Hand the note to the platform viewer.
///
/// Succeeds as soon as the opener process exits successfully; it does not
/// wait for the user to close the document. An opener that is still running
/// after [`LAUNCH_TIMEOUT`] is left running and the launch succeeds.
pub async fn open_externally(note: &NoteRef) -> Result<(), LoadError> {
    let os = std::env::consts::OS;
    let (program, args) = opener_for(os, &note.path)
        .ok_or_else(|| LoadError::UnsupportedPlatform(os.to_string()))?;
    launch(program, &args, &note.path, LAUNCH_TIMEOUT).await
}

async fn launch(
    program: &str,
    args: &[String],
    path: &Path,
    timeout: Duration,
) -> Result<(), LoadError> {
    let fail = |message: String| LoadError::Launch {
        path: path.to_path_buf(),
        message,
    };

    info!("Launching {} {:?}", program, args);
    // Opener chatter would corrupt the alternate screen
    let status = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match tokio::time::timeout(timeout, status).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(fail(format!("{program} exited with {status}"))),
        Ok(Err(e)) => Err(fail(format!("could not run {program}: {e}"))),
        Err(_) => {
            // Dropping the wait leaves the child running
            warn!("{} still running after {:?}, leaving it detached", program, timeout);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::NoteKind;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_read_markdown_returns_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# Hi").unwrap();

        let bytes = assert_ok!(read_markdown(&NoteRef::new(&path, NoteKind::Markdown)).await);
        assert_eq!(bytes, b"# Hi");
    }

    #[tokio::test]
    async fn test_read_missing_note_fails() {
        let dir = TempDir::new().unwrap();
        let note = NoteRef::new(dir.path().join("gone.md"), NoteKind::Markdown);

        let err = assert_err!(read_markdown(&note).await);
        assert!(matches!(err, LoadError::Read { ref path, .. } if *path == note.path));
    }

    #[tokio::test]
    async fn test_read_refuses_oversized_notes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.md");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();

        let err = assert_err!(read_capped(&path, 16).await);
        assert!(err.to_string().contains("byte limit"));
        assert_ok!(read_capped(&path, 64).await);
    }

    #[test]
    fn test_opener_per_platform() {
        let path = Path::new("/notes/b.pdf");

        let (program, args) = opener_for("linux", path).unwrap();
        assert_eq!(program, "xdg-open");
        assert_eq!(args, vec!["/notes/b.pdf".to_string()]);

        assert_eq!(opener_for("macos", path).unwrap().0, "open");

        let (program, args) = opener_for("windows", path).unwrap();
        assert_eq!(program, "cmd");
        assert_eq!(args[..3], ["/C".to_string(), "start".to_string(), String::new()]);

        assert!(opener_for("plan9", path).is_none());
    }

    #[tokio::test]
    async fn test_launch_of_missing_program_fails() {
        let err = assert_err!(
            launch(
                "puntes-no-such-opener",
                &[],
                Path::new("b.pdf"),
                Duration::from_secs(5)
            )
            .await
        );
        assert!(matches!(err, LoadError::Launch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_reports_exit_status() {
        assert_ok!(launch("true", &[], Path::new("b.pdf"), Duration::from_secs(5)).await);

        let err =
            assert_err!(launch("false", &[], Path::new("b.pdf"), Duration::from_secs(5)).await);
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_opener_is_left_running() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("done");
        let script = format!("sleep 0.3; touch '{}'", marker.display());

        assert_ok!(
            launch(
                "sh",
                &["-c".to_string(), script],
                Path::new("b.pdf"),
                Duration::from_millis(50)
            )
            .await
        );

        // Not killed when the wait gave up
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(marker.exists());
    }
}
