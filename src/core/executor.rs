//! # Executor
//!
//! Runs `Command`s off the UI loop. Each dispatch becomes one tokio task
//! that sends exactly one result `Action` back over the channel, even when
//! the work inside it panics. Filesystem walks, config I/O and rendering go
//! to the blocking pool; note reads and the opener use tokio's async APIs.

use log::{debug, warn};
use std::sync::{Arc, mpsc};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Command, Dispatch};
use crate::core::config::{ConfigError, ConfigStore};
use crate::core::loader;
use crate::core::render::{self, RenderError, Renderer};
use crate::core::scanner::{self, ScanError};

pub struct Executor {
    store: ConfigStore,
    renderer: Arc<dyn Renderer>,
    tx: mpsc::Sender<Action>,
}

impl Executor {
    pub fn new(store: ConfigStore, renderer: Arc<dyn Renderer>, tx: mpsc::Sender<Action>) -> Self {
        Self {
            store,
            renderer,
            tx,
        }
    }

    /// Start `dispatch` on the runtime. Must be called from within a tokio
    /// runtime context.
    pub fn spawn(&self, dispatch: Dispatch) -> AbortHandle {
        let Dispatch { ticket, command } = dispatch;
        debug!("Spawning {:?} for {:?}", command, ticket);
        let tx = self.tx.clone();

        let handle = match command {
            Command::LoadConfig => {
                let store = self.store.clone();
                tokio::spawn(async move {
                    let path = store.path().to_path_buf();
                    let result = off_loop(move || store.load())
                        .await
                        .unwrap_or_else(|message| Err(ConfigError::Io { path, message }));
                    send(&tx, Action::ConfigLoaded(ticket, result));
                })
            }
            Command::SaveConfig(config) => {
                let store = self.store.clone();
                tokio::spawn(async move {
                    let path = store.path().to_path_buf();
                    let result = off_loop(move || store.save(&config))
                        .await
                        .unwrap_or_else(|message| Err(ConfigError::Io { path, message }));
                    send(&tx, Action::ConfigSaved(ticket, result));
                })
            }
            Command::Scan(root) => tokio::spawn(async move {
                let walk_root = root.clone();
                let result = off_loop(move || scanner::scan(&walk_root))
                    .await
                    .unwrap_or_else(|message| Err(ScanError { root, message }));
                send(&tx, Action::NotesScanned(ticket, result));
            }),
            Command::ReadNote(note) => tokio::spawn(async move {
                let result = loader::read_markdown(&note).await;
                send(
                    &tx,
                    Action::NoteRead {
                        ticket,
                        note,
                        result,
                    },
                );
            }),
            Command::RenderNote { note, bytes, width } => {
                let renderer = Arc::clone(&self.renderer);
                tokio::spawn(async move {
                    let result =
                        off_loop(move || render::render_note(renderer.as_ref(), &bytes, width))
                            .await
                            .unwrap_or_else(|message| Err(RenderError::Failed(message)));
                    send(
                        &tx,
                        Action::NoteRendered {
                            ticket,
                            note,
                            result,
                        },
                    );
                })
            }
            Command::OpenNote(note) => tokio::spawn(async move {
                let result = loader::open_externally(&note).await;
                send(
                    &tx,
                    Action::NoteOpened {
                        ticket,
                        note,
                        result,
                    },
                );
            }),
        };

        handle.abort_handle()
    }
}

/// Run blocking work on the blocking pool. A panic inside `work` comes back
/// as `Err(message)` so the caller can still report a result.
async fn off_loop<T, F>(work: F) -> Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| format!("worker task failed: {e}"))
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver command result: receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::scanner::{NoteKind, NoteRef};
    use crate::core::state::{Slot, Ticket};
    use crate::test_support::PlainRenderer;
    use std::time::Duration;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(5);

    fn executor_in(dir: &TempDir) -> (Executor, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let store = ConfigStore::at(dir.path().join("cfg").join("config.toml"));
        (Executor::new(store, Arc::new(PlainRenderer), tx), rx)
    }

    fn ticket(slot: Slot) -> Ticket {
        Ticket {
            slot,
            generation: 7,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_save_then_load_through_executor() {
        let dir = TempDir::new().unwrap();
        let (executor, rx) = executor_in(&dir);
        let config = Config::new("/home/u/notes");

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Config),
            command: Command::SaveConfig(config.clone()),
        });
        assert_eq!(
            rx.recv_timeout(WAIT).unwrap(),
            Action::ConfigSaved(ticket(Slot::Config), Ok(()))
        );

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Config),
            command: Command::LoadConfig,
        });
        assert_eq!(
            rx.recv_timeout(WAIT).unwrap(),
            Action::ConfigLoaded(ticket(Slot::Config), Ok(Some(config)))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scan_sends_exactly_one_result() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "# A").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        let (executor, rx) = executor_in(&dir);

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Scan),
            command: Command::Scan(dir.path().to_path_buf()),
        });

        match rx.recv_timeout(WAIT).unwrap() {
            Action::NotesScanned(t, Ok(notes)) => {
                assert_eq!(t, ticket(Slot::Scan));
                assert_eq!(
                    notes,
                    vec![NoteRef::new(dir.path().join("a.md"), NoteKind::Markdown)]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scan_failure_is_delivered() {
        let dir = TempDir::new().unwrap();
        let (executor, rx) = executor_in(&dir);
        let missing = dir.path().join("missing");

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Scan),
            command: Command::Scan(missing.clone()),
        });

        match rx.recv_timeout(WAIT).unwrap() {
            Action::NotesScanned(_, Err(err)) => assert_eq!(err.root, missing),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_read_and_render_note() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# Hi").unwrap();
        let note = NoteRef::new(&path, NoteKind::Markdown);
        let (executor, rx) = executor_in(&dir);

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Content),
            command: Command::ReadNote(note.clone()),
        });
        let bytes = match rx.recv_timeout(WAIT).unwrap() {
            Action::NoteRead {
                result: Ok(bytes), ..
            } => bytes,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(bytes, b"# Hi");

        executor.spawn(Dispatch {
            ticket: ticket(Slot::Content),
            command: Command::RenderNote {
                note: note.clone(),
                bytes,
                width: 40,
            },
        });
        match rx.recv_timeout(WAIT).unwrap() {
            Action::NoteRendered {
                note: rendered,
                result: Ok(text),
                ..
            } => {
                assert_eq!(rendered, note);
                assert_eq!(text.lines.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aborted_task_sends_at_most_one_result() {
        let dir = TempDir::new().unwrap();
        let (executor, rx) = executor_in(&dir);

        let handle = executor.spawn(Dispatch {
            ticket: ticket(Slot::Content),
            command: Command::ReadNote(NoteRef::new(
                dir.path().join("missing.md"),
                NoteKind::Markdown,
            )),
        });
        handle.abort();

        // Either the abort won the race or the one result arrived; never two
        if rx.recv_timeout(Duration::from_millis(500)).is_ok() {
            assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        }
    }
}
