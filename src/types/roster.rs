//! The ordered broker roster.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::broker::{Broker, BrokerId};

/// An ordered snapshot of the brokers eligible for rotation.
///
/// Order is rotation order. A roster is rebuilt from the spreadsheet on every
/// request and never cached between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    brokers: Vec<Broker>,
}

impl Roster {
    /// Builds a roster, dropping rows with no content at all.
    pub fn new(brokers: impl IntoIterator<Item = Broker>) -> Self {
        Roster {
            brokers: brokers.into_iter().filter(|b| !b.is_blank()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.brokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Broker> {
        self.brokers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Broker> {
        self.brokers.iter()
    }

    pub fn as_slice(&self) -> &[Broker] {
        &self.brokers
    }

    /// Returns the index of the first broker with the given identity.
    pub fn position_of(&self, id: &BrokerId) -> Option<usize> {
        self.brokers.iter().position(|b| &b.id() == id)
    }

    /// Order-insensitive SHA-256 digest of the roster contents.
    ///
    /// Changes exactly when a broker is added, removed, or has its contact
    /// data edited. Reordering alone leaves it unchanged.
    pub fn fingerprint(&self) -> String {
        let mut lines: Vec<String> = self
            .brokers
            .iter()
            .map(|b| format!("{}|{}|{}", b.name, b.contact_email, b.phone_number))
            .collect();
        lines.sort();

        let mut hasher = Sha256::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Broker;
    type IntoIter = std::slice::Iter<'a, Broker>;

    fn into_iter(self) -> Self::IntoIter {
        self.brokers.iter()
    }
}

impl FromIterator<Broker> for Roster {
    fn from_iter<T: IntoIterator<Item = Broker>>(iter: T) -> Self {
        Roster::new(iter)
    }
}
