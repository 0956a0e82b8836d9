//! Fixed-width key encoding for names and labels.
//!
//! The ledger addresses records by opaque 32-byte keys. Human-readable
//! names and labels are UTF-8 encoded, left-aligned, and zero-padded into
//! that width. The all-zero key is the sentinel for "no label".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Width of an encoded name or label, in bytes.
pub const KEY_LEN: usize = 32;

/// A 32-byte encoded name or label.
///
/// Encoding is lossy for inputs whose UTF-8 form exceeds [`KEY_LEN`]:
/// the tail is silently truncated. This is a contract of the ledger's key
/// width, not a defect to paper over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixedKey(pub [u8; KEY_LEN]);

impl FixedKey {
    /// The all-zero key: sentinel for "no label".
    pub const EMPTY: Self = Self([0u8; KEY_LEN]);

    /// Encode text into a fixed key: UTF-8, left-aligned, zero-padded.
    ///
    /// Inputs longer than [`KEY_LEN`] bytes are truncated on a character
    /// boundary so the stored key always decodes.
    pub fn encode(text: &str) -> Self {
        let mut buf = [0u8; KEY_LEN];
        let bytes = text.as_bytes();
        if bytes.len() <= KEY_LEN {
            buf[..bytes.len()].copy_from_slice(bytes);
        } else {
            let mut end = KEY_LEN;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            buf[..end].copy_from_slice(&bytes[..end]);
        }
        Self(buf)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Decode back to text: strip trailing zero padding, UTF-8 decode.
    ///
    /// Fails only if the stripped bytes are not valid UTF-8. Keys written
    /// by other parties on the shared log may be arbitrary bytes, so
    /// callers that render keys should prefer [`FixedKey::decode_lossy`].
    pub fn decode(&self) -> Result<String, CoreError> {
        let trimmed = self.trimmed();
        std::str::from_utf8(trimmed)
            .map(String::from)
            .map_err(|_| CoreError::MalformedKey("key bytes are not valid UTF-8".into()))
    }

    /// Decode to text, degrading to a hex placeholder for malformed keys.
    pub fn decode_lossy(&self) -> String {
        match self.decode() {
            Ok(text) => text,
            Err(_) => format!("0x{}", hex::encode(self.trimmed())),
        }
    }

    /// True iff every byte is zero (the "no label" sentinel).
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; KEY_LEN]
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |pos| pos + 1);
        &self.0[..end]
    }
}

impl fmt::Debug for FixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedKey({:?})", self.decode_lossy())
    }
}

impl fmt::Display for FixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decode_lossy())
    }
}

impl AsRef<[u8]> for FixedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for FixedKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Normalize a name before encoding: names are case-insensitive and
/// stored lowercase. Labels are encoded verbatim.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_short() {
        let key = FixedKey::encode("alice");
        assert_eq!(key.decode().unwrap(), "alice");
    }

    #[test]
    fn test_roundtrip_exact_width() {
        let s = "a".repeat(KEY_LEN);
        let key = FixedKey::encode(&s);
        assert_eq!(key.decode().unwrap(), s);
    }

    #[test]
    fn test_truncates_over_width() {
        let s = "b".repeat(KEY_LEN + 10);
        let key = FixedKey::encode(&s);
        assert_eq!(key.decode().unwrap(), "b".repeat(KEY_LEN));
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // "€" is 3 bytes; 11 of them is 33 bytes, so byte 32 falls
        // mid-character and must not split it.
        let s = "€".repeat(11);
        let key = FixedKey::encode(&s);
        let decoded = key.decode().unwrap();
        assert!(decoded.len() <= KEY_LEN);
        assert!(s.starts_with(&decoded));
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(FixedKey::EMPTY.is_empty());
        assert!(FixedKey::encode("").is_empty());
        assert!(!FixedKey::encode("x").is_empty());
        assert_eq!(FixedKey::EMPTY.decode().unwrap(), "");
    }

    #[test]
    fn test_malformed_key_degrades() {
        let mut bytes = [0u8; KEY_LEN];
        bytes[0] = 0xff;
        bytes[1] = 0xfe;
        let key = FixedKey::from_bytes(bytes);
        assert!(key.decode().is_err());
        assert_eq!(key.decode_lossy(), "0xfffe");
    }

    #[test]
    fn test_interior_zero_survives() {
        let mut bytes = [0u8; KEY_LEN];
        bytes[0] = b'a';
        bytes[2] = b'b';
        let key = FixedKey::from_bytes(bytes);
        assert_eq!(key.decode().unwrap(), "a\0b");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Alice"), "alice");
        assert_eq!(normalize_name("ALICE"), "alice");
        assert_eq!(normalize_name("alice"), "alice");
    }
}
