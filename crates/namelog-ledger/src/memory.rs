//! In-memory ledger implementation.
//!
//! The reference implementation of [`Ledger`] and the test double for
//! everything built on top of it. Same observable contract as a real
//! ledger transport: ordered journal, confirmed appends, loud transport
//! failures, signal-only subscriptions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use namelog_core::{ChangeEvent, CommitId, EventEnvelope, FixedKey, PublicKey};

use crate::error::{LedgerError, Result};
use crate::filter::EventFilter;
use crate::subscribe::EventSignal;
use crate::traits::Ledger;

const NOTIFY_CAPACITY: usize = 256;

/// One confirmed entry of the journal.
#[derive(Debug, Clone)]
pub struct Committed {
    /// Ledger-assigned position, 1-indexed.
    pub seq: u64,
    /// Content-addressed commit id.
    pub commit_id: CommitId,
    /// The envelope as appended.
    pub envelope: EventEnvelope,
}

/// In-memory append-only ledger.
///
/// Appends are verified (signature) and authorized: the first writer to
/// touch a name owns it, and later appends by a different key are
/// rejected. That rule exists so the rejection path is exercisable; the
/// client does not rely on it.
///
/// Test controls (`fail_next_fetch`, `fail_next_append`, `reject_next`)
/// script one-shot faults; `append_calls` counts every append that
/// reached the ledger, scripted faults included.
pub struct MemoryLedger {
    chain_id: u64,
    inner: RwLock<Inner>,
    notify: broadcast::Sender<FixedKey>,
}

struct Inner {
    journal: Vec<Committed>,
    owners: HashMap<FixedKey, PublicKey>,
    append_calls: usize,
    fail_next_fetch: bool,
    fail_next_append: bool,
    reject_next: Option<String>,
}

impl MemoryLedger {
    /// Create an empty ledger with chain id 1.
    pub fn new() -> Self {
        Self::with_chain_id(1)
    }

    /// Create an empty ledger with a specific chain id.
    pub fn with_chain_id(chain_id: u64) -> Self {
        let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            chain_id,
            inner: RwLock::new(Inner {
                journal: Vec::new(),
                owners: HashMap::new(),
                append_calls: 0,
                fail_next_fetch: false,
                fail_next_append: false,
                reject_next: None,
            }),
            notify,
        }
    }

    /// Fail the next `fetch_events` call with a transport error.
    pub fn fail_next_fetch(&self) {
        self.inner.write().unwrap().fail_next_fetch = true;
    }

    /// Fail the next `append` call with a transport error.
    pub fn fail_next_append(&self) {
        self.inner.write().unwrap().fail_next_append = true;
    }

    /// Reject the next `append` call with the given reason.
    pub fn reject_next(&self, reason: &str) {
        self.inner.write().unwrap().reject_next = Some(reason.to_string());
    }

    /// How many append calls reached the ledger (including scripted
    /// faults and rejections).
    pub fn append_calls(&self) -> usize {
        self.inner.read().unwrap().append_calls
    }

    /// Total committed entries across all names.
    pub fn journal_len(&self) -> usize {
        self.inner.read().unwrap().journal.len()
    }

    /// The owning key of a name, if any writer has touched it.
    pub fn owner_of(&self, name: &FixedKey) -> Option<PublicKey> {
        self.inner.read().unwrap().owners.get(name).copied()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>> {
        let mut inner = self.inner.write().unwrap();

        if std::mem::take(&mut inner.fail_next_fetch) {
            return Err(LedgerError::Transport("injected fetch failure".into()));
        }

        let events: Vec<ChangeEvent> = inner
            .journal
            .iter()
            .map(|c| &c.envelope.event)
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        tracing::debug!(name = %filter.name, count = events.len(), "fetched events");
        Ok(events)
    }

    async fn append(&self, envelope: EventEnvelope) -> Result<CommitId> {
        let name = envelope.event.name;

        let commit_id = {
            let mut inner = self.inner.write().unwrap();
            inner.append_calls += 1;

            if std::mem::take(&mut inner.fail_next_append) {
                return Err(LedgerError::Transport("injected append failure".into()));
            }
            if let Some(reason) = inner.reject_next.take() {
                return Err(LedgerError::Rejected { reason });
            }

            envelope
                .verify()
                .map_err(|e| LedgerError::InvalidEvent(e.to_string()))?;

            match inner.owners.get(&name) {
                Some(owner) if *owner != envelope.author => {
                    return Err(LedgerError::Rejected {
                        reason: "name is owned by a different key".into(),
                    });
                }
                Some(_) => {}
                None => {
                    inner.owners.insert(name, envelope.author);
                }
            }

            let seq = inner.journal.len() as u64 + 1;
            let commit_id = envelope.commit_id();
            inner.journal.push(Committed {
                seq,
                commit_id,
                envelope,
            });
            commit_id
        };

        tracing::info!(name = %name, commit = %commit_id, "append committed");
        // No receivers is fine; signals are best effort at this end.
        let _ = self.notify.send(name);
        Ok(commit_id)
    }

    async fn subscribe(&self, filter: &EventFilter) -> Result<EventSignal> {
        Ok(EventSignal::new(self.notify.subscribe(), filter))
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use namelog_core::{Keypair, RecordType};

    fn envelope(keypair: &Keypair, name: &str, data: &'static [u8]) -> EventEnvelope {
        let event = ChangeEvent::new(
            FixedKey::encode(name),
            FixedKey::EMPTY,
            RecordType::Txt,
            Bytes::from_static(data),
        );
        EventEnvelope::sign(event, 1_736_870_400_000, keypair)
    }

    #[tokio::test]
    async fn test_append_then_fetch_in_order() {
        let ledger = MemoryLedger::new();
        let keypair = Keypair::generate();

        ledger.append(envelope(&keypair, "alice", b"v1")).await.unwrap();
        ledger.append(envelope(&keypair, "alice", b"v2")).await.unwrap();

        let events = ledger
            .fetch_events(&EventFilter::for_name("alice"))
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(&events[0].data[..], b"v1");
        assert_eq!(&events[1].data[..], b"v2");
    }

    #[tokio::test]
    async fn test_fetch_is_scoped_by_name() {
        let ledger = MemoryLedger::new();
        let kp_a = Keypair::generate();
        let kp_b = Keypair::generate();

        ledger.append(envelope(&kp_a, "alice", b"a")).await.unwrap();
        ledger.append(envelope(&kp_b, "bob", b"b")).await.unwrap();

        let events = ledger
            .fetch_events(&EventFilter::for_name("alice"))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(&events[0].data[..], b"a");
    }

    #[tokio::test]
    async fn test_empty_result_means_no_events() {
        let ledger = MemoryLedger::new();
        let events = ledger
            .fetch_events(&EventFilter::for_name("nobody"))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_injected_fetch_failure_is_an_error() {
        let ledger = MemoryLedger::new();
        ledger.fail_next_fetch();

        let err = ledger
            .fetch_events(&EventFilter::for_name("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));

        // One-shot: the next fetch succeeds.
        assert!(ledger
            .fetch_events(&EventFilter::for_name("alice"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_second_writer_is_rejected() {
        let ledger = MemoryLedger::new();
        let owner = Keypair::generate();
        let intruder = Keypair::generate();

        ledger.append(envelope(&owner, "alice", b"mine")).await.unwrap();

        let err = ledger
            .append(envelope(&intruder, "alice", b"theirs"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));

        // Different name is fair game for the other key.
        assert!(ledger.append(envelope(&intruder, "bob", b"ok")).await.is_ok());
    }

    #[tokio::test]
    async fn test_bad_signature_is_invalid_event() {
        let ledger = MemoryLedger::new();
        let keypair = Keypair::generate();
        let mut env = envelope(&keypair, "alice", b"v");
        env.event.data = Bytes::from_static(b"forged");

        let err = ledger.append(env).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEvent(_)));
    }

    #[tokio::test]
    async fn test_scripted_rejection_reason_verbatim() {
        let ledger = MemoryLedger::new();
        let keypair = Keypair::generate();
        ledger.reject_next("out of gas");

        let err = ledger.append(envelope(&keypair, "alice", b"v")).await.unwrap_err();
        match err {
            LedgerError::Rejected { reason } => assert_eq!(reason, "out of gas"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subscribe_signals_appends() {
        let ledger = MemoryLedger::new();
        let keypair = Keypair::generate();
        let filter = EventFilter::for_name("alice");
        let mut signal = ledger.subscribe(&filter).await.unwrap();

        ledger.append(envelope(&keypair, "alice", b"v")).await.unwrap();
        assert_eq!(signal.recv().await, Some(()));
    }

    #[tokio::test]
    async fn test_append_calls_counts_faults_too() {
        let ledger = MemoryLedger::new();
        let keypair = Keypair::generate();

        ledger.fail_next_append();
        let _ = ledger.append(envelope(&keypair, "alice", b"v")).await;
        ledger.append(envelope(&keypair, "alice", b"v")).await.unwrap();

        assert_eq!(ledger.append_calls(), 2);
        assert_eq!(ledger.journal_len(), 1);
    }

    #[tokio::test]
    async fn test_chain_id() {
        let ledger = MemoryLedger::with_chain_id(5);
        assert_eq!(ledger.chain_id().await.unwrap(), 5);
    }
}
