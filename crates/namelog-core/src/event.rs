//! Change events: the append-only unit of the naming log.
//!
//! A change event is immutable and ledger-ordered. It is never edited or
//! removed; the current value of a record is whatever the latest event
//! for its (type, label) key says. An event with empty data clears the
//! key (a tombstone that still displays as "no value").

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_envelope_bytes, signed_message_bytes};
use crate::crypto::{Blake3Hash, Keypair, PublicKey, Signature};
use crate::error::CoreError;
use crate::key::FixedKey;
use crate::record::{RecordKey, RecordType};
use crate::types::CommitId;

/// One entry of a name's append-only change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Encoded name this event is scoped to.
    pub name: FixedKey,
    /// Encoded label; [`FixedKey::EMPTY`] for the type's default record.
    pub label: FixedKey,
    /// Record type tag.
    pub record_type: RecordType,
    /// Opaque encoded value; empty means the key is cleared.
    pub data: Bytes,
}

impl ChangeEvent {
    /// Create a new change event.
    pub fn new(name: FixedKey, label: FixedKey, record_type: RecordType, data: Bytes) -> Self {
        Self {
            name,
            label,
            record_type,
            data,
        }
    }

    /// Whether this event clears its key.
    pub fn is_tombstone(&self) -> bool {
        self.data.is_empty()
    }

    /// The record key this event targets.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.record_type, self.label)
    }
}

/// A signed, appendable change event.
///
/// The signature covers the canonical bytes of (event, author, timestamp);
/// the commit id is Blake3 over the canonical envelope including the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    /// The change event being appended.
    pub event: ChangeEvent,
    /// The writer's public key.
    pub author: PublicKey,
    /// Author-claimed timestamp (Unix milliseconds). Untrusted; ledger
    /// order, not timestamps, decides last-writer-wins.
    pub timestamp: i64,
    /// Ed25519 signature over the signed message.
    pub signature: Signature,
}

impl EventEnvelope {
    /// Assemble an envelope from a signature produced elsewhere (e.g. by
    /// a wallet signer over [`signed_message_bytes`]).
    pub fn from_parts(
        event: ChangeEvent,
        author: PublicKey,
        timestamp: i64,
        signature: Signature,
    ) -> Self {
        Self {
            event,
            author,
            timestamp,
            signature,
        }
    }

    /// Sign an event with a local keypair.
    pub fn sign(event: ChangeEvent, timestamp: i64, keypair: &Keypair) -> Self {
        let author = keypair.public_key();
        let message = signed_message_bytes(&event, &author, timestamp);
        let signature = keypair.sign(&message);
        Self {
            event,
            author,
            timestamp,
            signature,
        }
    }

    /// Compute the commit id: Blake3 of the canonical envelope bytes.
    pub fn commit_id(&self) -> CommitId {
        let bytes = canonical_envelope_bytes(self);
        CommitId(Blake3Hash::hash(&bytes).0)
    }

    /// Check the signature against the claimed author.
    pub fn verify(&self) -> Result<(), CoreError> {
        let message = signed_message_bytes(&self.event, &self.author, self.timestamp);
        self.author.verify(&message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ChangeEvent {
        ChangeEvent::new(
            FixedKey::encode("alice"),
            FixedKey::EMPTY,
            RecordType::Txt,
            Bytes::from_static(b"hello"),
        )
    }

    #[test]
    fn test_tombstone_detection() {
        let mut event = sample_event();
        assert!(!event.is_tombstone());
        event.data = Bytes::new();
        assert!(event.is_tombstone());
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let envelope = EventEnvelope::sign(sample_event(), 1_736_870_400_000, &keypair);
        envelope.verify().expect("own signature should verify");
    }

    #[test]
    fn test_tampered_envelope_fails_verification() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let mut envelope = EventEnvelope::sign(sample_event(), 1_736_870_400_000, &keypair);
        envelope.event.data = Bytes::from_static(b"forged");
        assert!(envelope.verify().is_err());
    }

    #[test]
    fn test_commit_id_is_content_addressed() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let a = EventEnvelope::sign(sample_event(), 1_736_870_400_000, &keypair);
        let b = EventEnvelope::sign(sample_event(), 1_736_870_400_000, &keypair);
        assert_eq!(a.commit_id(), b.commit_id());

        let c = EventEnvelope::sign(sample_event(), 1_736_870_400_001, &keypair);
        assert_ne!(a.commit_id(), c.commit_id());
    }
}
