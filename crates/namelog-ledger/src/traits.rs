//! The Ledger trait: the abstract boundary to the external event log.
//!
//! The log itself is externally owned and shared; other writers may
//! append at any time. Implementations wrap whatever transport actually
//! reaches it. [`crate::MemoryLedger`] is the in-process reference.

use async_trait::async_trait;
use std::sync::Arc;

use namelog_core::{ChangeEvent, CommitId, EventEnvelope};

use crate::error::Result;
use crate::filter::EventFilter;
use crate::subscribe::EventSignal;

/// Async interface to the append-only naming ledger.
///
/// # Design Notes
///
/// - **Read-only fetches**: `fetch_events` never mutates ledger state.
/// - **Order is load-bearing**: events come back in ledger (append)
///   order; the reducer's last-writer-wins depends on it.
/// - **Errors are loud**: transport failure surfaces as an error, so an
///   empty `Ok` always means "no events for this name".
/// - **Confirmed appends**: `append` resolves once inclusion is
///   confirmed; finality semantics belong to the ledger.
/// - **No retries**: the client never retries an append on its own, since
///   a retry could double-submit a non-idempotent write.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetch all change events in scope, in ledger order.
    async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>>;

    /// Append a signed envelope, resolving with its commit id once the
    /// ledger confirms inclusion.
    async fn append(&self, envelope: EventEnvelope) -> Result<CommitId>;

    /// Subscribe to change signals in scope.
    async fn subscribe(&self, filter: &EventFilter) -> Result<EventSignal>;

    /// Identifier of this ledger instance, for session validation.
    async fn chain_id(&self) -> Result<u64>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>> {
        (**self).fetch_events(filter).await
    }

    async fn append(&self, envelope: EventEnvelope) -> Result<CommitId> {
        (**self).append(envelope).await
    }

    async fn subscribe(&self, filter: &EventFilter) -> Result<EventSignal> {
        (**self).subscribe(filter).await
    }

    async fn chain_id(&self) -> Result<u64> {
        (**self).chain_id().await
    }
}
