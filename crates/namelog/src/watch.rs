//! Live update watching: re-fetch signals with a disposer handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use namelog_ledger::EventSignal;

/// Handle to a live watch on a name.
///
/// Dropping the handle unsubscribes. [`WatchHandle::unsubscribe`] is safe
/// to call any number of times; after the first call no further callback
/// invocations happen, including for signals already in flight.
pub struct WatchHandle {
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub(crate) fn spawn<F>(mut signal: EventSignal, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);

        let task = tokio::spawn(async move {
            while signal.recv().await.is_some() {
                // Checked after the await so an unsubscribe that raced a
                // delivered signal still suppresses the callback.
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                on_change();
            }
        });

        Self { active, task }
    }

    /// Stop the watch. Idempotent.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Whether the watch is still delivering callbacks.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.is_active())
            .finish()
    }
}
