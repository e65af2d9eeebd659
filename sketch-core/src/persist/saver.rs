//! Debounced project writes with save-status feedback.
//!
//! ```text
//! schedule(p1) ─┐
//! schedule(p2) ─┼─ Saving ─ quiet period ─▶ write(p2) ─▶ Saved ─ linger ─▶ Idle
//! schedule(p3) ─┘   (restarts on each call; only the latest project is written)
//! ```
//!
//! Writes are serialized: a flush never interleaves with a timer write, so
//! the newest project always lands last.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::repository::ProjectRepository;
use crate::project::Project;
use crate::state::SaveStatus;

/// State shared between the saver and its timer tasks.
#[derive(Debug)]
struct Shared {
    repo: ProjectRepository,
    pending: Mutex<Option<Arc<Project>>>,
    /// Held from taking the pending project until its write completes.
    write_lock: Mutex<()>,
    status: watch::Sender<SaveStatus>,
    /// Bumped on every write so a stale linger timer cannot reset a newer `Saved`.
    generation: AtomicU64,
    linger: Duration,
}

impl Shared {
    fn take_pending(&self) -> Option<Arc<Project>> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Write whatever is pending, in order with every other writer.
    fn write_pending(self: &Arc<Self>) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(project) = self.take_pending() {
            self.write(&project);
        }
    }

    /// Publish `status`, notifying watchers only on a change.
    fn set_status(&self, status: SaveStatus) {
        self.status.send_if_modified(|current| {
            let changed = *current != status;
            *current = status;
            changed
        });
    }

    fn write(self: &Arc<Self>, project: &Project) {
        self.set_status(SaveStatus::Saving);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = self.repo.save(project) {
            tracing::warn!(project = %project.id, "Failed to save project: {e}");
            self.status.send_replace(SaveStatus::Idle);
            return;
        }
        tracing::debug!(project = %project.id, "Project saved");

        let Ok(handle) = Handle::try_current() else {
            self.status.send_replace(SaveStatus::Idle);
            return;
        };
        self.status.send_replace(SaveStatus::Saved);
        let shared = Arc::clone(self);
        handle.spawn(async move {
            tokio::time::sleep(shared.linger).await;
            if shared.generation.load(Ordering::SeqCst) == generation {
                shared.status.send_if_modified(|status| {
                    let saved = *status == SaveStatus::Saved;
                    if saved {
                        *status = SaveStatus::Idle;
                    }
                    saved
                });
            }
        });
    }
}

/// Coalesces rapid project changes into a single repository write.
///
/// Each [`schedule`](Self::schedule) replaces the pending project and
/// restarts the quiet period. Outside a tokio runtime the write happens
/// immediately. Dropping the saver flushes whatever is pending.
#[derive(Debug)]
pub struct DebouncedSaver {
    shared: Arc<Shared>,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl DebouncedSaver {
    /// Create a saver writing through `repo`.
    #[must_use]
    pub fn new(repo: ProjectRepository, debounce: Duration, linger: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            shared: Arc::new(Shared {
                repo,
                pending: Mutex::new(None),
                write_lock: Mutex::new(()),
                status,
                generation: AtomicU64::new(0),
                linger,
            }),
            debounce,
            timer: None,
        }
    }

    /// The repository writes go through.
    #[must_use]
    pub fn repository(&self) -> &ProjectRepository {
        &self.shared.repo
    }

    /// Current save status.
    #[must_use]
    pub fn status(&self) -> SaveStatus {
        *self.shared.status.borrow()
    }

    /// Watch save-status transitions.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    /// Whether a write is waiting for its quiet period.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Queue `project` for writing, superseding anything already pending.
    ///
    /// The status reads `Saving` from now until the write completes.
    pub fn schedule(&mut self, project: Arc<Project>) {
        *self
            .shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(project);

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let Ok(handle) = Handle::try_current() else {
            self.flush();
            return;
        };

        self.shared.set_status(SaveStatus::Saving);
        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;
        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            let write = tokio::task::spawn_blocking(move || shared.write_pending());
            if let Err(e) = write.await {
                tracing::warn!("Save task failed: {e}");
            }
        }));
    }

    /// Write the pending project now, if any.
    ///
    /// Waits for a timer write already in progress, then writes.
    pub fn flush(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.shared.write_pending();
    }

    /// Replace anything pending with `project` and write it now.
    pub fn save_now(&mut self, project: Arc<Project>) {
        *self
            .shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(project);
        self.flush();
    }
}

impl Drop for DebouncedSaver {
    fn drop(&mut self) {
        self.flush();
    }
}
