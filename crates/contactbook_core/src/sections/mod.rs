//! Sectioned contact list: alphabetic index building and incremental diffing.
//!
//! # Responsibility
//! - Turn a sorted contact snapshot into a header-interleaved display sequence.
//! - Compute the patch that moves a displayed sequence to a new one.
//! - Keep the currently displayed sequence for one list view.
//!
//! # Invariants
//! - Everything here is pure and synchronous; no I/O, no shared state.
//! - Builders never sort; ordering is the snapshot producer's job.

pub mod builder;
pub mod diff;
pub mod entry;
pub mod key;
pub mod list;

pub use builder::{build_sections, find_section_start, section_labels};
pub use diff::{apply_patch, diff, Patch, PatchError};
pub use entry::SectionEntry;
pub use key::{section_key, sort_for_sections, PinyinRomanizer, Romanizer, FALLBACK_SECTION};
pub use list::SectionedList;
