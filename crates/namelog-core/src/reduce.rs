//! Record state reconstruction: fold a name's event log into its current
//! record set.
//!
//! The fold is pure and deterministic: the same ordered input always
//! yields the same [`RecordState`]. Ledger order is load-bearing; it is
//! what makes last-writer-wins well defined.

use crate::codec::CodecRegistry;
use crate::event::ChangeEvent;
use crate::record::{RecordState, RecordValue};

/// Fold an ordered event sequence into current record state.
///
/// For each event in order: decode its data via the registry and upsert
/// `(record_type, label) -> value`. Empty data upserts an empty value, so
/// a cleared key stays visible as "no value" rather than vanishing, and a
/// later non-empty event still overrides it.
///
/// Decode failures never abort the fold; the registry degrades them to a
/// hex rendering of the raw bytes.
pub fn reduce(events: &[ChangeEvent], codecs: &CodecRegistry) -> RecordState {
    let mut state = RecordState::new();
    for event in events {
        let text = if event.data.is_empty() {
            String::new()
        } else {
            codecs.decode(event.record_type, &event.data)
        };
        state.upsert(
            event.key(),
            RecordValue {
                raw: event.data.clone(),
                text,
            },
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::FixedKey;
    use crate::record::{RecordKey, RecordType};
    use bytes::Bytes;

    fn event(label: &str, record_type: RecordType, data: &'static [u8]) -> ChangeEvent {
        ChangeEvent::new(
            FixedKey::encode("alice"),
            FixedKey::encode(label),
            record_type,
            Bytes::from_static(data),
        )
    }

    #[test]
    fn test_last_writer_wins() {
        let events = vec![
            event("", RecordType::Txt, b"a"),
            event("", RecordType::Txt, b"b"),
        ];
        let state = reduce(&events, &CodecRegistry::new());
        assert_eq!(state.value_of(RecordType::Txt, ""), Some("b"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_tombstone_stays_in_map() {
        let events = vec![
            event("", RecordType::Txt, b"a"),
            event("", RecordType::Txt, b""),
        ];
        let state = reduce(&events, &CodecRegistry::new());
        let key = RecordKey::default_for(RecordType::Txt);
        let value = state.get(&key).expect("cleared key must stay present");
        assert!(value.is_cleared());
        assert_eq!(value.text, "");
    }

    #[test]
    fn test_write_after_tombstone_overrides() {
        let events = vec![
            event("", RecordType::Txt, b"a"),
            event("", RecordType::Txt, b""),
            event("", RecordType::Txt, b"c"),
        ];
        let state = reduce(&events, &CodecRegistry::new());
        assert_eq!(state.value_of(RecordType::Txt, ""), Some("c"));
    }

    #[test]
    fn test_unrelated_keys_independent() {
        let events = vec![
            event("one", RecordType::Txt, b"x"),
            event("two", RecordType::Txt, b"y"),
            event("one", RecordType::IpfsCid, b"z"),
        ];
        let state = reduce(&events, &CodecRegistry::new());
        assert_eq!(state.value_of(RecordType::Txt, "one"), Some("x"));
        assert_eq!(state.value_of(RecordType::Txt, "two"), Some("y"));
        assert_eq!(state.value_of(RecordType::IpfsCid, "one"), Some("z"));
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let events = vec![
            event("", RecordType::Txt, b"a"),
            event("blog", RecordType::IpfsCid, b"QmTestCID123"),
            event("", RecordType::Txt, b""),
        ];
        let codecs = CodecRegistry::new();
        assert_eq!(reduce(&events, &codecs), reduce(&events, &codecs));
    }

    #[test]
    fn test_empty_input_is_empty_state() {
        let state = reduce(&[], &CodecRegistry::new());
        assert!(state.is_empty());
    }

    #[test]
    fn test_bad_event_does_not_abort_fold() {
        // Invalid UTF-8 for a text record from some other writer; it must
        // degrade to hex, and the following event must still apply.
        let events = vec![
            event("", RecordType::Txt, &[0xff, 0xfe]),
            event("blog", RecordType::Txt, b"fine"),
        ];
        let state = reduce(&events, &CodecRegistry::new());
        assert_eq!(state.value_of(RecordType::Txt, ""), Some("0xfffe"));
        assert_eq!(state.value_of(RecordType::Txt, "blog"), Some("fine"));
    }

    #[test]
    fn test_raw_bytes_preserved() {
        let events = vec![event("", RecordType::Txt, b"keep-raw")];
        let state = reduce(&events, &CodecRegistry::new());
        let key = RecordKey::default_for(RecordType::Txt);
        assert_eq!(&state.get(&key).unwrap().raw[..], b"keep-raw");
    }
}
