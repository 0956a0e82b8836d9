//! Record types, keys, and derived per-name state.
//!
//! Record type tags are u16 values partitioned into bands; each band
//! implies a default value codec. Tags we do not recognize are carried
//! through as [`RecordType::Unknown`] so events from other writers on the
//! shared log survive reduction.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::key::FixedKey;

/// A record type tag.
///
/// The numeric space is banded:
///
/// - `0x0000..=0x00FF` DNS-standard types
/// - `0xFF00..=0xFF3F` addresses
/// - `0xFF40..=0xFF7F` identity material
/// - `0xFF80..=0xFFBF` content references
///
/// Identity is the wire tag: `Unknown(0x0001)` and `A` are the same
/// record type, so a key built from either finds the same entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum RecordType {
    /// DNS A record.
    A,
    /// DNS TXT record.
    Txt,
    /// Ethereum address.
    EthAddress,
    /// Bitcoin address.
    BtcAddress,
    /// Solana address.
    SolAddress,
    /// Raw public key.
    Pubkey,
    /// Decentralized identifier.
    Did,
    /// Generic content hash.
    ContentHash,
    /// IPFS CID.
    IpfsCid,
    /// Swarm hash.
    SwarmHash,
    /// Arweave transaction ID.
    ArweaveId,
    /// A tag this client does not recognize. Decoded as text.
    Unknown(u16),
}

/// The band a record type belongs to, implying its default codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// DNS-standard types; text codec.
    Dns,
    /// Address types; fixed-width address codec.
    Address,
    /// Identity types; text codec.
    Identity,
    /// Content reference types; text codec.
    Content,
    /// Outside every defined band; text codec (forward compatibility).
    Unknown,
}

impl RecordType {
    /// Convert to the wire tag.
    pub fn to_u16(self) -> u16 {
        match self {
            Self::A => 0x0001,
            Self::Txt => 0x0010,
            Self::EthAddress => 0xFF00,
            Self::BtcAddress => 0xFF01,
            Self::SolAddress => 0xFF02,
            Self::Pubkey => 0xFF40,
            Self::Did => 0xFF41,
            Self::ContentHash => 0xFF80,
            Self::IpfsCid => 0xFF81,
            Self::SwarmHash => 0xFF82,
            Self::ArweaveId => 0xFF83,
            Self::Unknown(tag) => tag,
        }
    }

    /// Parse from a wire tag. Total: unrecognized tags map to `Unknown`.
    pub fn from_u16(tag: u16) -> Self {
        match tag {
            0x0001 => Self::A,
            0x0010 => Self::Txt,
            0xFF00 => Self::EthAddress,
            0xFF01 => Self::BtcAddress,
            0xFF02 => Self::SolAddress,
            0xFF40 => Self::Pubkey,
            0xFF41 => Self::Did,
            0xFF80 => Self::ContentHash,
            0xFF81 => Self::IpfsCid,
            0xFF82 => Self::SwarmHash,
            0xFF83 => Self::ArweaveId,
            other => Self::Unknown(other),
        }
    }

    /// The band this tag falls into. Unrecognized tags inside a defined
    /// band still get that band's codec.
    pub fn band(self) -> Band {
        match self.to_u16() {
            0xFF00..=0xFF3F => Band::Address,
            0xFF40..=0xFF7F => Band::Identity,
            0xFF80..=0xFFBF => Band::Content,
            tag if tag <= 0x00FF => Band::Dns,
            _ => Band::Unknown,
        }
    }

    /// Whether this is a tag the client recognizes by name. Judged by
    /// wire tag, like equality, so a wrapped recognized tag counts.
    pub fn is_known(self) -> bool {
        !matches!(Self::from_u16(self.to_u16()), Self::Unknown(_))
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.to_u16() == other.to_u16()
    }
}

impl Eq for RecordType {}

impl std::hash::Hash for RecordType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_u16().hash(state);
    }
}

impl PartialOrd for RecordType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_u16().cmp(&other.to_u16())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Txt => write!(f, "TXT"),
            Self::EthAddress => write!(f, "eth-address"),
            Self::BtcAddress => write!(f, "btc-address"),
            Self::SolAddress => write!(f, "sol-address"),
            Self::Pubkey => write!(f, "pubkey"),
            Self::Did => write!(f, "did"),
            Self::ContentHash => write!(f, "content-hash"),
            Self::IpfsCid => write!(f, "ipfs-cid"),
            Self::SwarmHash => write!(f, "swarm-hash"),
            Self::ArweaveId => write!(f, "arweave-id"),
            Self::Unknown(tag) => write!(f, "unknown(0x{tag:04x})"),
        }
    }
}

/// The unique key of a record within one name's record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// The record type tag.
    pub record_type: RecordType,
    /// The label; [`FixedKey::EMPTY`] for the default record of a type.
    pub label: FixedKey,
}

impl RecordKey {
    /// Create a new record key.
    pub fn new(record_type: RecordType, label: FixedKey) -> Self {
        Self { record_type, label }
    }

    /// The default (unlabeled) key for a type.
    pub fn default_for(record_type: RecordType) -> Self {
        Self::new(record_type, FixedKey::EMPTY)
    }
}

/// A record's current value: the raw on-ledger bytes plus the decoded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordValue {
    /// Raw encoded bytes as they sit on the ledger.
    pub raw: Bytes,
    /// Decoded presentation form.
    pub text: String,
}

impl RecordValue {
    /// Whether this value was explicitly cleared (tombstone).
    pub fn is_cleared(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Derived, in-memory record state for a single name.
///
/// Always reconstructible by replaying the name's full event sequence;
/// never persisted, so it cannot drift from the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    records: BTreeMap<RecordKey, RecordValue>,
}

impl RecordState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record by key.
    pub fn get(&self, key: &RecordKey) -> Option<&RecordValue> {
        self.records.get(key)
    }

    /// Convenience lookup by type and label text.
    pub fn value_of(&self, record_type: RecordType, label: &str) -> Option<&str> {
        let key = RecordKey::new(record_type, FixedKey::encode(label));
        self.records.get(&key).map(|v| v.text.as_str())
    }

    /// Insert or overwrite a record (last writer wins).
    pub fn upsert(&mut self, key: RecordKey, value: RecordValue) {
        self.records.insert(key, value);
    }

    /// Iterate records in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &RecordValue)> {
        self.records.iter()
    }

    /// Number of keys present, including cleared ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no key has ever been written.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip_known() {
        for rt in [
            RecordType::A,
            RecordType::Txt,
            RecordType::EthAddress,
            RecordType::BtcAddress,
            RecordType::SolAddress,
            RecordType::Pubkey,
            RecordType::Did,
            RecordType::ContentHash,
            RecordType::IpfsCid,
            RecordType::SwarmHash,
            RecordType::ArweaveId,
        ] {
            assert_eq!(RecordType::from_u16(rt.to_u16()), rt);
            assert!(rt.is_known());
        }
    }

    #[test]
    fn test_unknown_tag_is_total() {
        let rt = RecordType::from_u16(0xBEEF);
        assert_eq!(rt, RecordType::Unknown(0xBEEF));
        assert_eq!(rt.to_u16(), 0xBEEF);
        assert!(!rt.is_known());
    }

    #[test]
    fn test_identity_is_the_wire_tag() {
        // A manually wrapped recognized tag is the same record type.
        assert_eq!(RecordType::Unknown(0x0001), RecordType::A);
        assert_eq!(RecordType::Unknown(0xFF00), RecordType::EthAddress);
        assert_ne!(RecordType::Unknown(0x0002), RecordType::A);
        assert!(RecordType::Unknown(0x0001).is_known());

        // Ordering follows too, so map keys built from either form agree.
        let mut state = RecordState::new();
        state.upsert(
            RecordKey::default_for(RecordType::A),
            RecordValue {
                raw: Bytes::from_static(b"1.2.3.4"),
                text: "1.2.3.4".into(),
            },
        );
        let via_unknown = RecordKey::default_for(RecordType::Unknown(0x0001));
        assert_eq!(state.get(&via_unknown).unwrap().text, "1.2.3.4");
    }

    #[test]
    fn test_bands() {
        assert_eq!(RecordType::A.band(), Band::Dns);
        assert_eq!(RecordType::Txt.band(), Band::Dns);
        assert_eq!(RecordType::EthAddress.band(), Band::Address);
        assert_eq!(RecordType::Pubkey.band(), Band::Identity);
        assert_eq!(RecordType::IpfsCid.band(), Band::Content);
        // Unregistered tag inside the address band keeps the band codec.
        assert_eq!(RecordType::Unknown(0xFF05).band(), Band::Address);
        // Tag outside every band.
        assert_eq!(RecordType::Unknown(0x4000).band(), Band::Unknown);
    }

    #[test]
    fn test_state_upsert_overwrites() {
        let mut state = RecordState::new();
        let key = RecordKey::default_for(RecordType::Txt);
        state.upsert(
            key,
            RecordValue {
                raw: Bytes::from_static(b"a"),
                text: "a".into(),
            },
        );
        state.upsert(
            key,
            RecordValue {
                raw: Bytes::from_static(b"b"),
                text: "b".into(),
            },
        );
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&key).unwrap().text, "b");
    }

    #[test]
    fn test_value_of_by_label() {
        let mut state = RecordState::new();
        let key = RecordKey::new(RecordType::IpfsCid, FixedKey::encode("blog"));
        state.upsert(
            key,
            RecordValue {
                raw: Bytes::from_static(b"QmX"),
                text: "QmX".into(),
            },
        );
        assert_eq!(state.value_of(RecordType::IpfsCid, "blog"), Some("QmX"));
        assert_eq!(state.value_of(RecordType::IpfsCid, "other"), None);
    }
}
