//! Query filters: the scope of a fetch or subscription.
//!
//! The ledger is shared by every name; queries are scoped by exact match
//! on the encoded name. The same filter shape serves both event fetches
//! and live subscriptions.

use namelog_core::{normalize_name, ChangeEvent, FixedKey};

/// An exact-match scope over the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventFilter {
    /// The encoded (normalized) name to match.
    pub name: FixedKey,
}

impl EventFilter {
    /// Build a filter for a human-readable name.
    pub fn for_name(name: &str) -> Self {
        Self {
            name: FixedKey::encode(&normalize_name(name)),
        }
    }

    /// Build a filter from an already-encoded key.
    pub fn for_key(name: FixedKey) -> Self {
        Self { name }
    }

    /// Whether an event falls inside this scope.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.name == self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use namelog_core::RecordType;

    #[test]
    fn test_filter_normalizes_name() {
        assert_eq!(EventFilter::for_name("Alice"), EventFilter::for_name("alice"));
    }

    #[test]
    fn test_filter_matches_exact_name_only() {
        let filter = EventFilter::for_name("alice");
        let hit = ChangeEvent::new(
            FixedKey::encode("alice"),
            FixedKey::EMPTY,
            RecordType::Txt,
            Bytes::from_static(b"v"),
        );
        let miss = ChangeEvent::new(
            FixedKey::encode("alicia"),
            FixedKey::EMPTY,
            RecordType::Txt,
            Bytes::from_static(b"v"),
        );
        assert!(filter.matches(&hit));
        assert!(!filter.matches(&miss));
    }
}
