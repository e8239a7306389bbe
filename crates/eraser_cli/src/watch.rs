//! Watch mode: re-check files as they change.

use notify::{EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Quiet period a path needs before it is re-checked.
pub const WATCH_DELAY: Duration = Duration::from_millis(150);

/// Per-path debouncing of change events. Each event for a path pushes its
/// deadline back; a path is due once its deadline has passed.
#[derive(Debug, Default)]
pub struct PathDebouncer {
    deadlines: FxHashMap<PathBuf, Instant>,
}

impl PathDebouncer {
    pub fn record(&mut self, path: PathBuf, now: Instant) {
        self.deadlines.insert(path, now + WATCH_DELAY);
    }

    /// Remove and return every path whose deadline has passed, sorted.
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut due: Vec<PathBuf> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &due {
            self.deadlines.remove(path);
        }
        due.sort();
        due
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

fn is_in_skipped_directory(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c.as_os_str().to_str(), Some(".git" | ".hg" | ".svn")))
}

/// Watch `targets` and call `on_change` with each batch of changed files.
///
/// Returns only when the watcher fails.
pub fn watch_paths(
    targets: &[PathBuf],
    mut on_change: impl FnMut(&[PathBuf]),
) -> Result<(), notify::Error> {
    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    for target in targets {
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(target, mode)?;
    }

    let mut debouncer = PathDebouncer::default();
    loop {
        let timeout = if debouncer.is_empty() {
            Duration::from_secs(3600)
        } else {
            Duration::from_millis(25)
        };

        match rx.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    let now = Instant::now();
                    for path in event.paths {
                        if path.is_file() && !is_in_skipped_directory(&path) {
                            debouncer.record(path, now);
                        }
                    }
                }
            }
            Ok(Err(err)) => tracing::warn!(error = %err, "watch error"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(notify::Error::generic("file watcher stopped"));
            }
        }

        let due = debouncer.take_due(Instant::now());
        if !due.is_empty() {
            on_change(&due);
        }
    }
}
