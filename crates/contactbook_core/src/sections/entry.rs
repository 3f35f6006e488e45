//! Display entries of a sectioned contact list.

use crate::model::contact::{Contact, ContactId};
use serde::{Deserialize, Serialize};

/// Display-slot identity of an entry: header label or contact id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKey<'a> {
    Header(&'a str),
    Item(ContactId),
}

/// One row of a flat, headered contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionEntry {
    /// Section marker; `label` is one uppercase letter or `#`.
    Header { label: String },
    Item { contact: Contact },
}

impl SectionEntry {
    pub fn header(label: impl Into<String>) -> Self {
        Self::Header {
            label: label.into(),
        }
    }

    pub fn item(contact: Contact) -> Self {
        Self::Item { contact }
    }

    /// Returns the header label, or `None` for items.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Header { label } => Some(label),
            Self::Item { .. } => None,
        }
    }

    /// Returns the wrapped contact, or `None` for headers.
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Self::Header { .. } => None,
            Self::Item { contact } => Some(contact),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header { .. })
    }

    /// Whether both entries occupy the same display slot.
    ///
    /// Headers match on label, items on contact id.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.slot_key() == other.slot_key()
    }

    pub fn slot_key(&self) -> SlotKey<'_> {
        match self {
            Self::Header { label } => SlotKey::Header(label),
            Self::Item { contact } => SlotKey::Item(contact.id),
        }
    }

    /// Whether a same-identity pair renders identically.
    ///
    /// A header's label is its whole content, so matching headers never change.
    pub fn same_content(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Header { .. }, Self::Header { .. }) => self.same_identity(other),
            (Self::Item { contact: left }, Self::Item { contact: right }) => left == right,
            _ => false,
        }
    }
}
