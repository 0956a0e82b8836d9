//! The client facade: resolve, update, clear, and watch name records.
//!
//! Ties the codecs, the ledger seam, and the signer seam together into
//! the interface a UI layer consumes. Record state is always derived
//! fresh from the log; nothing here caches across calls, so concurrent
//! resolves for different names never contend.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use namelog_core::{
    normalize_name, reduce, ChangeEvent, CodecRegistry, CommitId, EventEnvelope, FixedKey,
    RecordState, RecordType,
};
use namelog_ledger::{EventFilter, Ledger};

use crate::error::{ClientError, Result};
use crate::signer::Signer;
use crate::watch::WatchHandle;

/// Client configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// When set, `submit`/`clear` validate the ledger's chain id first
    /// and fail with `WrongChain` on mismatch.
    pub expected_chain_id: Option<u64>,
}

/// The namelog client.
///
/// Concurrency policy is last-writer-wins at (name, type, label)
/// granularity: there is deliberately no version check against a prior
/// read, and no automatic retry. Two concurrent writers to the same key
/// race; the later event in ledger order wins. Callers needing stronger
/// guarantees must layer their own version check above `submit`.
pub struct NameClient<L: Ledger> {
    ledger: L,
    signer: Arc<dyn Signer>,
    codecs: CodecRegistry,
    config: ClientConfig,
}

impl<L: Ledger> NameClient<L> {
    /// Create a client over a ledger and signer with default codecs.
    pub fn new(ledger: L, signer: Arc<dyn Signer>, config: ClientConfig) -> Self {
        Self {
            ledger,
            signer,
            codecs: CodecRegistry::new(),
            config,
        }
    }

    /// Replace the codec registry (overrides for tests or extensions).
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    /// The codec registry in use.
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Fetch a name's raw event sequence, in ledger order.
    pub async fn fetch_events(&self, name: &str) -> Result<Vec<ChangeEvent>> {
        let filter = EventFilter::for_name(name);
        let events = self.ledger.fetch_events(&filter).await?;
        tracing::debug!(name, count = events.len(), "fetched change events");
        Ok(events)
    }

    /// Resolve a name to its current record state.
    ///
    /// Pure fetch + fold; two concurrent resolves for different names are
    /// independent.
    pub async fn resolve(&self, name: &str) -> Result<RecordState> {
        let events = self.fetch_events(name).await?;
        Ok(reduce(&events, &self.codecs))
    }

    /// Submit a record update.
    ///
    /// An empty value is rejected before anything reaches the signer or
    /// ledger: clearing must go through [`NameClient::clear`] so a blank
    /// form field cannot silently wipe a record.
    ///
    /// Resolves with the commit id once the ledger confirms inclusion.
    /// A failed submission leaves record state untouched; nothing is
    /// applied optimistically.
    pub async fn submit(
        &self,
        name: &str,
        record_type: RecordType,
        label: &str,
        value: &str,
    ) -> Result<CommitId> {
        if value.is_empty() {
            return Err(ClientError::InvalidValue(
                "empty value; use clear() to remove a record".into(),
            ));
        }

        let data = self
            .codecs
            .encode(record_type, value)
            .map_err(|e| ClientError::InvalidValue(e.to_string()))?;

        self.append_record(name, record_type, label, data).await
    }

    /// Explicitly clear a record: append a tombstone (empty data) event.
    pub async fn clear(
        &self,
        name: &str,
        record_type: RecordType,
        label: &str,
    ) -> Result<CommitId> {
        self.append_record(name, record_type, label, Bytes::new())
            .await
    }

    /// Watch a name for changes.
    ///
    /// `on_change` fires at least once per observed append; it carries no
    /// payload, and the watcher must re-[`resolve`](NameClient::resolve)
    /// rather than trust pushed data, since delivery may coalesce or
    /// reorder relative to a concurrent read.
    pub async fn watch<F>(&self, name: &str, on_change: F) -> Result<WatchHandle>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let filter = EventFilter::for_name(name);
        let signal = self.ledger.subscribe(&filter).await?;
        tracing::debug!(name, "watch started");
        Ok(WatchHandle::spawn(signal, on_change))
    }

    async fn append_record(
        &self,
        name: &str,
        record_type: RecordType,
        label: &str,
        data: Bytes,
    ) -> Result<CommitId> {
        self.check_chain().await?;

        let event = ChangeEvent::new(
            FixedKey::encode(&normalize_name(name)),
            FixedKey::encode(label),
            record_type,
            data,
        );

        let author = self.signer.public_key();
        let timestamp = now_millis();
        let message = namelog_core::signed_message_bytes(&event, &author, timestamp);
        let signature = self.signer.sign(&message).await?;
        let envelope = EventEnvelope::from_parts(event, author, timestamp, signature);

        let commit = self.ledger.append(envelope).await?;
        tracing::info!(name, %record_type, commit = %commit, "record update committed");
        Ok(commit)
    }

    async fn check_chain(&self) -> Result<()> {
        if let Some(expected) = self.config.expected_chain_id {
            let actual = self.ledger.chain_id().await?;
            if actual != expected {
                return Err(ClientError::WrongChain { expected, actual });
            }
        }
        Ok(())
    }
}

impl<L: Ledger> std::fmt::Debug for NameClient<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameClient")
            .field("author", &self.signer.public_key())
            .field("config", &self.config)
            .finish()
    }
}

/// Current time in Unix milliseconds.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
