//! Per-record-type value codecs and the injected registry.
//!
//! Different bands use incompatible on-wire shapes: addresses travel as a
//! fixed-width ABI word, everything else as raw UTF-8 text. The registry
//! is an explicit, injectable mapping so tests can swap codecs without
//! standing up anything else.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CoreError;
use crate::record::{Band, RecordType};

/// Length of a raw address value, in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Length of an ABI-encoded address word, in bytes.
pub const ADDRESS_WORD_LEN: usize = 32;

/// A pure encode/decode pair for one record value shape.
pub trait ValueCodec: Send + Sync {
    /// Encode a presentation value to ledger bytes.
    fn encode(&self, value: &str) -> Result<Bytes, CoreError>;

    /// Decode ledger bytes to a presentation value.
    fn decode(&self, data: &[u8]) -> Result<String, CoreError>;
}

/// Raw UTF-8 text, no further structure.
///
/// This is also the forward-compatibility codec: record types outside the
/// address band, including tags this client has never heard of, are safe
/// to decode as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ValueCodec for TextCodec {
    fn encode(&self, value: &str) -> Result<Bytes, CoreError> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn decode(&self, data: &[u8]) -> Result<String, CoreError> {
        std::str::from_utf8(data)
            .map(String::from)
            .map_err(|_| CoreError::Decode("value bytes are not valid UTF-8".into()))
    }
}

/// Fixed-width address codec: 20-byte value carried as a left-padded
/// 32-byte ABI word, presented as lowercase `0x`-hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCodec;

impl ValueCodec for AddressCodec {
    fn encode(&self, value: &str) -> Result<Bytes, CoreError> {
        let digits = value.strip_prefix("0x").unwrap_or(value);
        let raw = hex::decode(digits)
            .map_err(|e| CoreError::InvalidValue(format!("address is not hex: {e}")))?;
        if raw.len() != ADDRESS_LEN {
            return Err(CoreError::InvalidValue(format!(
                "address must be {ADDRESS_LEN} bytes, got {}",
                raw.len()
            )));
        }
        let mut word = [0u8; ADDRESS_WORD_LEN];
        word[ADDRESS_WORD_LEN - ADDRESS_LEN..].copy_from_slice(&raw);
        Ok(Bytes::copy_from_slice(&word))
    }

    fn decode(&self, data: &[u8]) -> Result<String, CoreError> {
        let addr = match data.len() {
            ADDRESS_WORD_LEN => {
                let (pad, addr) = data.split_at(ADDRESS_WORD_LEN - ADDRESS_LEN);
                if pad.iter().any(|&b| b != 0) {
                    return Err(CoreError::Decode("address word has nonzero padding".into()));
                }
                addr
            }
            ADDRESS_LEN => data,
            n => {
                return Err(CoreError::Decode(format!(
                    "address value has unexpected length {n}"
                )))
            }
        };
        Ok(format!("0x{}", hex::encode(addr)))
    }
}

/// The injected registry mapping record types to codecs.
///
/// Band defaults apply unless a per-type override is installed. The
/// registry-level [`CodecRegistry::decode`] never fails: a codec error
/// degrades to the raw bytes in `0x`-hex so the caller can still display
/// something.
#[derive(Clone)]
pub struct CodecRegistry {
    text: Arc<dyn ValueCodec>,
    address: Arc<dyn ValueCodec>,
    overrides: HashMap<RecordType, Arc<dyn ValueCodec>>,
}

impl CodecRegistry {
    /// Create a registry with the band-default codecs.
    pub fn new() -> Self {
        Self {
            text: Arc::new(TextCodec),
            address: Arc::new(AddressCodec),
            overrides: HashMap::new(),
        }
    }

    /// Install a per-type override, replacing the band default.
    pub fn with_override(mut self, record_type: RecordType, codec: Arc<dyn ValueCodec>) -> Self {
        self.overrides.insert(record_type, codec);
        self
    }

    /// The codec responsible for a record type.
    pub fn codec_for(&self, record_type: RecordType) -> &dyn ValueCodec {
        if let Some(codec) = self.overrides.get(&record_type) {
            return codec.as_ref();
        }
        match record_type.band() {
            Band::Address => self.address.as_ref(),
            _ => self.text.as_ref(),
        }
    }

    /// Encode a value for a record type. Fails on caller-side shape
    /// errors (e.g. a malformed address).
    pub fn encode(&self, record_type: RecordType, value: &str) -> Result<Bytes, CoreError> {
        self.codec_for(record_type).encode(value)
    }

    /// Decode ledger bytes for a record type, falling back to `0x`-hex of
    /// the raw bytes if the codec rejects them.
    pub fn decode(&self, record_type: RecordType, data: &[u8]) -> String {
        match self.codec_for(record_type).decode(data) {
            Ok(text) => text,
            Err(_) => format!("0x{}", hex::encode(data)),
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}
