//! Section index builder.
//!
//! # Responsibility
//! - Interleave section headers with contacts in a single linear pass.
//! - Answer "where does section X start" for jump-to-letter navigation.
//!
//! # Invariants
//! - Each run of equal keys in the input gets exactly one leading header.
//! - Headers appear in the order their first member appears in the input.
//! - Input order is trusted: a key that reappears after another key gets a
//!   second header.

use super::entry::SectionEntry;
use super::key::{section_key, Romanizer};
use crate::model::contact::Contact;

/// Builds the header-interleaved display sequence for a sorted snapshot.
pub fn build_sections<R: Romanizer + ?Sized>(
    contacts: &[Contact],
    romanizer: &R,
) -> Vec<SectionEntry> {
    let mut entries = Vec::with_capacity(contacts.len() + contacts.len().min(27));
    let mut last_key: Option<String> = None;

    for contact in contacts {
        let key = section_key(&contact.name, romanizer);
        if last_key.as_deref() != Some(key.as_str()) {
            entries.push(SectionEntry::header(key.clone()));
            last_key = Some(key);
        }
        entries.push(SectionEntry::item(contact.clone()));
    }

    entries
}

/// Returns the index of the first header whose label starts with `label`.
///
/// ASCII letters match case-insensitively, so `'l'` finds `"L"`.
pub fn find_section_start(entries: &[SectionEntry], label: char) -> Option<usize> {
    entries.iter().position(|entry| {
        entry
            .label()
            .and_then(|value| value.chars().next())
            .is_some_and(|first| first.eq_ignore_ascii_case(&label))
    })
}

/// Distinct header labels in display order, for a side index bar.
pub fn section_labels(entries: &[SectionEntry]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in entries.iter().filter_map(SectionEntry::label) {
        if !labels.iter().any(|known| known == label) {
            labels.push(label.to_string());
        }
    }
    labels
}
