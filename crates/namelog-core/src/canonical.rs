//! Canonical CBOR encoding for event envelopes.
//!
//! RFC 8949 Core Deterministic Encoding, restricted to what an envelope
//! needs: integer map keys, smallest-int encoding, definite lengths, no
//! floats. Canonical bytes back both the signature and the commit id, so
//! the same envelope must produce identical bytes everywhere.
//!
//! Encoding is emitted directly (the key order 0..=5 is already sorted);
//! decoding goes through `ciborium` and re-validates shape.

use ciborium::value::Value;

use crate::crypto::{PublicKey, Signature};
use crate::error::CoreError;
use crate::event::{ChangeEvent, EventEnvelope};
use crate::key::{FixedKey, KEY_LEN};
use crate::record::RecordType;

/// Envelope field keys. Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const NAME: u64 = 0;
    pub const LABEL: u64 = 1;
    pub const RECORD_TYPE: u64 = 2;
    pub const DATA: u64 = 3;
    pub const AUTHOR: u64 = 4;
    pub const TIMESTAMP: u64 = 5;
}

/// The message an author signs: canonical map of (event, author, timestamp).
pub fn signed_message_bytes(event: &ChangeEvent, author: &PublicKey, timestamp: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + event.data.len());
    // Map header: 6 entries, keys emitted in sorted order 0..=5.
    encode_uint(&mut buf, 5, 6);
    encode_uint(&mut buf, 0, keys::NAME);
    encode_bytes(&mut buf, event.name.as_bytes());
    encode_uint(&mut buf, 0, keys::LABEL);
    encode_bytes(&mut buf, event.label.as_bytes());
    encode_uint(&mut buf, 0, keys::RECORD_TYPE);
    encode_uint(&mut buf, 0, u64::from(event.record_type.to_u16()));
    encode_uint(&mut buf, 0, keys::DATA);
    encode_bytes(&mut buf, &event.data);
    encode_uint(&mut buf, 0, keys::AUTHOR);
    encode_bytes(&mut buf, author.as_bytes());
    encode_uint(&mut buf, 0, keys::TIMESTAMP);
    encode_int(&mut buf, i128::from(timestamp));
    buf
}

/// Canonical bytes of a full envelope: signed message || signature.
pub fn canonical_envelope_bytes(envelope: &EventEnvelope) -> Vec<u8> {
    let mut buf = signed_message_bytes(&envelope.event, &envelope.author, envelope.timestamp);
    buf.extend_from_slice(envelope.signature.as_bytes());
    buf
}

/// Decode an envelope from canonical bytes.
pub fn decode_envelope(bytes: &[u8]) -> Result<EventEnvelope, CoreError> {
    if bytes.len() < 64 {
        return Err(CoreError::MalformedEnvelope("too short".into()));
    }

    let cursor = std::io::Cursor::new(bytes);
    let value: Value = ciborium::from_reader(cursor)
        .map_err(|e| CoreError::MalformedEnvelope(e.to_string()))?;
    let (event, author, timestamp) = parse_message(&value)?;

    // Header length via re-encoding; the rest must be the signature.
    let header_len = signed_message_bytes(&event, &author, timestamp).len();
    let rest = &bytes[header_len..];
    let sig: [u8; 64] = rest
        .try_into()
        .map_err(|_| CoreError::MalformedEnvelope("bad signature length".into()))?;

    Ok(EventEnvelope::from_parts(
        event,
        author,
        timestamp,
        Signature::from_bytes(sig),
    ))
}

fn parse_message(value: &Value) -> Result<(ChangeEvent, PublicKey, i64), CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedEnvelope("expected map".into())),
    };

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
    };

    let name = parse_key(get(keys::NAME), "name")?;
    let label = parse_key(get(keys::LABEL), "label")?;

    let record_type = match get(keys::RECORD_TYPE) {
        Some(Value::Integer(i)) => {
            let n = i128::from(*i);
            let tag = u16::try_from(n)
                .map_err(|_| CoreError::MalformedEnvelope(format!("record type out of range: {n}")))?;
            RecordType::from_u16(tag)
        }
        _ => return Err(CoreError::MalformedEnvelope("missing record type".into())),
    };

    let data = match get(keys::DATA) {
        Some(Value::Bytes(b)) => bytes::Bytes::copy_from_slice(b),
        _ => return Err(CoreError::MalformedEnvelope("missing data".into())),
    };

    let author = match get(keys::AUTHOR) {
        Some(Value::Bytes(b)) if b.len() == 32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(b);
            PublicKey::from_bytes(arr)
        }
        _ => return Err(CoreError::MalformedEnvelope("invalid author".into())),
    };

    let timestamp = match get(keys::TIMESTAMP) {
        Some(Value::Integer(i)) => {
            let n = i128::from(*i);
            i64::try_from(n)
                .map_err(|_| CoreError::MalformedEnvelope(format!("timestamp out of range: {n}")))?
        }
        _ => return Err(CoreError::MalformedEnvelope("missing timestamp".into())),
    };

    Ok((
        ChangeEvent::new(name, label, record_type, data),
        author,
        timestamp,
    ))
}

fn parse_key(value: Option<&Value>, field: &str) -> Result<FixedKey, CoreError> {
    match value {
        Some(Value::Bytes(b)) if b.len() == KEY_LEN => {
            let mut arr = [0u8; KEY_LEN];
            arr.copy_from_slice(b);
            Ok(FixedKey::from_bytes(arr))
        }
        _ => Err(CoreError::MalformedEnvelope(format!("invalid {field}"))),
    }
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i128) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type, smallest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}
