//! Per-key debouncing of asynchronous work.
//!
//! Each key has at most one pending task. Scheduling again for the same key
//! aborts the pending task and starts a new delay; the last call wins.

use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Runs at most one delayed task per key.
#[derive(Clone, Default)]
pub struct Debouncer {
    pending: Arc<DashMap<String, Pending>>,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any task pending for `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: impl Into<String>, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();

        // The task may only finish, and clear its entry, after the entry exists.
        let (start, started) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            if started.await.is_err() {
                return;
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
            pending.remove_if(&task_key, |_, p| p.generation == generation);
        });

        if let Some(previous) = self.pending.insert(key, Pending { generation, handle }) {
            previous.handle.abort();
        }
        let _ = start.send(());
    }

    /// Abort the task pending for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some((_, pending)) => {
                let was_running = !pending.handle.is_finished();
                pending.handle.abort();
                was_running
            }
            None => false,
        }
    }

    /// Whether a task for `key` is waiting or running.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending
            .get(key)
            .map_or(false, |pending| !pending.handle.is_finished())
    }

    /// Abort every pending task.
    pub fn cancel_all(&self) {
        self.pending.retain(|_, pending| {
            pending.handle.abort();
            false
        });
    }
}
