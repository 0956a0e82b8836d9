//! # Namelog Core
//!
//! Pure primitives for the namelog naming client: fixed-width keys, record
//! bands, value codecs, change events, and the record-state reducer.
//!
//! This crate contains no I/O, no networking, and no ledger access. It is
//! pure computation over the byte shapes the ledger deals in.
//!
//! ## Key Types
//!
//! - [`FixedKey`] - 32-byte encoded name or label
//! - [`RecordType`] - Banded u16 tag selecting a value codec
//! - [`ChangeEvent`] - One entry of the append-only ledger log
//! - [`EventEnvelope`] - A signed, appendable change event
//! - [`RecordState`] - Derived (type, label) → value mapping for one name
//!
//! ## Reduction
//!
//! [`reduce`] folds an ordered event sequence into a [`RecordState`]. The
//! fold is deterministic and last-writer-wins; see the [`reduce`] module.

pub mod canonical;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod event;
pub mod key;
pub mod record;
pub mod reduce;
pub mod types;

pub use canonical::{canonical_envelope_bytes, decode_envelope, signed_message_bytes};
pub use codec::{AddressCodec, CodecRegistry, TextCodec, ValueCodec};
pub use crypto::{Blake3Hash, Keypair, PublicKey, Signature};
pub use error::CoreError;
pub use event::{ChangeEvent, EventEnvelope};
pub use key::{normalize_name, FixedKey, KEY_LEN};
pub use record::{Band, RecordKey, RecordState, RecordType, RecordValue};
pub use reduce::reduce;
pub use types::CommitId;
