//! Displayed-list state for one sectioned contact view.

use super::builder::{build_sections, find_section_start, section_labels};
use super::diff::{diff, Patch};
use super::entry::SectionEntry;
use super::key::{PinyinRomanizer, Romanizer};
use crate::model::contact::Contact;
use log::debug;

/// Keeps the entries currently on screen and turns each new snapshot into a
/// patch against them.
///
/// Owned by the display update context; one snapshot is applied at a time.
#[derive(Debug, Clone, Default)]
pub struct SectionedList<R = PinyinRomanizer> {
    romanizer: R,
    entries: Vec<SectionEntry>,
}

impl SectionedList<PinyinRomanizer> {
    pub fn new() -> Self {
        Self::with_romanizer(PinyinRomanizer)
    }
}

impl<R: Romanizer> SectionedList<R> {
    pub fn with_romanizer(romanizer: R) -> Self {
        Self {
            romanizer,
            entries: Vec::new(),
        }
    }

    /// Rebuilds sections for `contacts` and returns the patch from the
    /// previously displayed entries.
    ///
    /// `contacts` must already be in display order.
    pub fn apply_snapshot(&mut self, contacts: &[Contact]) -> Vec<Patch> {
        let next = build_sections(contacts, &self.romanizer);
        let patches = diff(&self.entries, &next);
        debug!(
            "event=list_rebuild module=sections status=ok contacts={} entries={} patches={}",
            contacts.len(),
            next.len(),
            patches.len()
        );
        self.entries = next;
        patches
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the header for `label`, for jump-to-letter navigation.
    pub fn position_for_section(&self, label: char) -> Option<usize> {
        find_section_start(&self.entries, label)
    }

    /// Labels for the side index bar.
    pub fn labels(&self) -> Vec<String> {
        section_labels(&self.entries)
    }
}
