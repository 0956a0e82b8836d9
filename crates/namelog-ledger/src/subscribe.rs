//! Change subscriptions: signal-only, at-least-once.
//!
//! A subscription never delivers event payloads. It delivers "something
//! changed for this name, re-fetch" signals; push delivery may coalesce
//! or reorder relative to a concurrent direct read, so the reduced state
//! must always come from a fresh fetch.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use namelog_core::FixedKey;

use crate::filter::EventFilter;

/// A live stream of change signals for one name.
///
/// Backed by a broadcast channel of touched names; signals for other
/// names are filtered out. A lagged receiver coalesces everything it
/// missed into a single signal, which is loss-free under the
/// at-least-once, payload-free contract.
pub struct EventSignal {
    rx: broadcast::Receiver<FixedKey>,
    name: FixedKey,
}

impl EventSignal {
    /// Wrap a broadcast receiver, scoped to the filter's name.
    pub fn new(rx: broadcast::Receiver<FixedKey>, filter: &EventFilter) -> Self {
        Self {
            rx,
            name: filter.name,
        }
    }

    /// Wait for the next change signal.
    ///
    /// Returns `None` once the ledger side is gone and no further signals
    /// can arrive.
    pub async fn recv(&mut self) -> Option<()> {
        loop {
            match self.rx.recv().await {
                Ok(name) if name == self.name => return Some(()),
                Ok(_) => continue,
                // Missed signals collapse into one "re-fetch now".
                Err(RecvError::Lagged(_)) => return Some(()),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl std::fmt::Debug for EventSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSignal").field("name", &self.name).finish()
    }
}
