//! Proptest strategies for namelog values.

use proptest::prelude::*;

use namelog_core::{RecordType, KEY_LEN};

/// Arbitrary text whose UTF-8 encoding fits a fixed key (≤ 32 bytes).
///
/// Covers multi-byte characters, not just ASCII.
pub fn key_text() -> impl Strategy<Value = String> {
    // NUL is the padding byte, so keys cannot contain it.
    any::<String>().prop_map(|s| {
        let s = s.replace('\0', "");
        let mut end = s.len().min(KEY_LEN);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    })
}

/// A plausible lowercase label (or the empty default label).
pub fn label_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z0-9][a-z0-9-]{0,14}".prop_map(String::from),
    ]
}

/// Any record type, weighted toward known tags but covering unknown
/// ones across all bands.
pub fn record_type() -> impl Strategy<Value = RecordType> {
    prop_oneof![
        4 => prop::sample::select(vec![
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
        ]),
        1 => any::<u16>().prop_map(RecordType::from_u16),
    ]
}

/// A valid lowercase `0x`-prefixed 20-byte address value.
pub fn address_value() -> impl Strategy<Value = String> {
    prop::array::uniform20(any::<u8>()).prop_map(|bytes| format!("0x{}", hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use namelog_core::{CodecRegistry, FixedKey};

    proptest! {
        #[test]
        fn generated_key_text_fits(text in key_text()) {
            prop_assert!(text.len() <= KEY_LEN);
            prop_assert_eq!(FixedKey::encode(&text).decode().unwrap(), text);
        }

        #[test]
        fn generated_addresses_encode(addr in address_value()) {
            let registry = CodecRegistry::new();
            let bytes = registry.encode(RecordType::EthAddress, &addr).unwrap();
            prop_assert_eq!(registry.decode(RecordType::EthAddress, &bytes), addr);
        }

        #[test]
        fn generated_record_types_roundtrip(rt in record_type()) {
            prop_assert_eq!(RecordType::from_u16(rt.to_u16()), rt);
        }
    }
}
