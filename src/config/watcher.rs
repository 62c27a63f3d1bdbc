//! Mock directory watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::routing::naming::MOCK_EXTENSION;

/// A watcher that reports changes to `.json` files under the mock directory.
///
/// Creating, removing or renaming a directory is reported too, since moving a
/// directory only produces events for the directory itself. It only
/// notifies; rebuilding routes is up to the receiver.
pub struct MockDirWatcher {
    dir: PathBuf,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl MockDirWatcher {
    /// Create a new MockDirWatcher.
    ///
    /// Returns the watcher and a receiver yielding each changed file.
    pub fn new(dir: &Path) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (
            Self {
                dir: dir.to_path_buf(),
                change_tx,
            },
            change_rx,
        )
    }

    /// Start watching recursively. Dropping the returned handle stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for path in event.paths.into_iter().filter(|p| should_forward(&event.kind, p)) {
                        tracing::debug!(path = %path.display(), kind = ?event.kind, "Mock file change detected");
                        let _ = tx.send(path);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.dir, RecursiveMode::Recursive)?;

        tracing::info!(path = %self.dir.display(), "Watching for mock file changes");
        Ok(watcher)
    }
}

fn should_forward(kind: &EventKind, path: &Path) -> bool {
    if is_mock_file(path) {
        return kind.is_create() || kind.is_modify() || kind.is_remove();
    }
    // Directories, including ones that were just moved away or deleted.
    is_structural(kind) && !path.is_file()
}

fn is_structural(kind: &EventKind) -> bool {
    kind.is_create() || kind.is_remove() || matches!(kind, EventKind::Modify(ModifyKind::Name(_)))
}

fn is_mock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(MOCK_EXTENSION))
}
