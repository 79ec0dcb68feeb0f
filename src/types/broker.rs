//! Broker identity types.
//!
//! A `Broker` is one row of the roster spreadsheet. Brokers are compared by
//! `BrokerId` (the phone number, or the email when the phone cell is blank),
//! never by their position in the roster.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single broker taking part in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Broker {
    pub name: String,
    pub contact_email: String,
    pub phone_number: String,
}

impl Broker {
    /// Creates a broker, trimming surrounding whitespace from every field.
    ///
    /// Spreadsheet cells routinely carry stray spaces; trimming here keeps
    /// identity comparisons and the roster fingerprint stable.
    pub fn new(
        name: impl AsRef<str>,
        contact_email: impl AsRef<str>,
        phone_number: impl AsRef<str>,
    ) -> Self {
        Broker {
            name: name.as_ref().trim().to_string(),
            contact_email: contact_email.as_ref().trim().to_string(),
            phone_number: phone_number.as_ref().trim().to_string(),
        }
    }

    /// Returns the stable identity of this broker.
    pub fn id(&self) -> BrokerId {
        if self.phone_number.is_empty() {
            BrokerId(self.contact_email.to_lowercase())
        } else {
            BrokerId(self.phone_number.clone())
        }
    }

    /// Returns true if every field is blank.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.contact_email.is_empty() && self.phone_number.is_empty()
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Stable broker identity, independent of roster order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrokerId(pub String);

impl BrokerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The raw queue position as persisted in the spreadsheet.
///
/// The backing cell is free-form, so the value may be negative or past the
/// end of the roster. It is only meaningful after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredPosition(pub i64);

impl StoredPosition {
    pub const START: Self = StoredPosition(0);

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StoredPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StoredPosition {
    fn from(n: i64) -> Self {
        StoredPosition(n)
    }
}

impl From<usize> for StoredPosition {
    fn from(index: usize) -> Self {
        // Roster indices are tiny; saturate rather than wrap on absurd input.
        StoredPosition(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_trims_fields() {
        let broker = Broker::new("  Ana ", " ana@example.com", "5511999990000 ");
        assert_eq!(broker.name, "Ana");
        assert_eq!(broker.contact_email, "ana@example.com");
        assert_eq!(broker.phone_number, "5511999990000");
    }

    #[test]
    fn id_prefers_phone_number() {
        let broker = Broker::new("Ana", "ana@example.com", "5511999990000");
        assert_eq!(broker.id(), BrokerId("5511999990000".to_string()));
    }

    #[test]
    fn id_falls_back_to_lowercased_email() {
        let broker = Broker::new("Ana", "Ana@Example.com", "");
        assert_eq!(broker.id(), BrokerId("ana@example.com".to_string()));
    }

    #[test]
    fn blank_row_detection() {
        assert!(Broker::new(" ", "", "  ").is_blank());
        assert!(!Broker::new("Ana", "", "").is_blank());
    }

    #[test]
    fn stored_position_from_index() {
        assert_eq!(StoredPosition::from(3usize), StoredPosition(3));
        assert_eq!(StoredPosition::default(), StoredPosition::START);
    }

    proptest! {
        #[test]
        fn identity_ignores_name_changes(
            a in "[A-Za-z ]{1,20}",
            b in "[A-Za-z ]{1,20}",
            phone in "55[0-9]{11}",
        ) {
            let first = Broker::new(&a, "x@example.com", &phone);
            let renamed = Broker::new(&b, "y@example.com", &phone);
            prop_assert_eq!(first.id(), renamed.id());
        }

        #[test]
        fn stored_position_serializes_as_plain_integer(n: i64) {
            let json = serde_json::to_string(&StoredPosition(n)).unwrap();
            prop_assert_eq!(json, n.to_string());
        }
    }
}
