//! Incremental list differencer.
//!
//! # Responsibility
//! - Compute insert/remove/update patches between two displayed sequences.
//! - Provide the reference interpreter for those patches.
//!
//! # Invariants
//! - Patches are applied in order; every index refers to the list state left
//!   by the patches before it.
//! - Identity-matched entries with unchanged content produce no patch.
//! - Reordering is reported as remove + insert; there is no move operation.
//! - Within one changed run, removals come before insertions.

use super::entry::SectionEntry;
use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One display mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    Insert { index: usize, entry: SectionEntry },
    Remove { index: usize },
    /// Same slot, new content.
    Update { index: usize, entry: SectionEntry },
}

impl Patch {
    pub fn index(&self) -> usize {
        match self {
            Self::Insert { index, .. } | Self::Remove { index } | Self::Update { index, .. } => {
                *index
            }
        }
    }
}

/// Computes the patch list that turns `old` into `new`.
///
/// Entries are aligned by identity with Myers' algorithm, so the cost grows
/// with the list length times the number of changed slots.
pub fn diff(old: &[SectionEntry], new: &[SectionEntry]) -> Vec<Patch> {
    let old_keys = old.iter().map(SectionEntry::slot_key).collect::<Vec<_>>();
    let new_keys = new.iter().map(SectionEntry::slot_key).collect::<Vec<_>>();

    let mut patches = Vec::new();
    let mut cursor = 0;
    for op in capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                push_updates(
                    &mut patches,
                    cursor,
                    &old[old_index..old_index + len],
                    &new[new_index..new_index + len],
                );
                cursor += len;
            }
            DiffOp::Delete { old_len, .. } => push_removes(&mut patches, cursor, old_len),
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                cursor = push_inserts(&mut patches, cursor, &new[new_index..new_index + new_len]);
            }
            DiffOp::Replace {
                old_len,
                new_index,
                new_len,
                ..
            } => {
                push_removes(&mut patches, cursor, old_len);
                cursor = push_inserts(&mut patches, cursor, &new[new_index..new_index + new_len]);
            }
        }
    }
    patches
}

fn push_updates(
    patches: &mut Vec<Patch>,
    start: usize,
    old: &[SectionEntry],
    new: &[SectionEntry],
) {
    for (offset, (before, after)) in old.iter().zip(new).enumerate() {
        if !before.same_content(after) {
            patches.push(Patch::Update {
                index: start + offset,
                entry: after.clone(),
            });
        }
    }
}

fn push_removes(patches: &mut Vec<Patch>, at: usize, count: usize) {
    patches.extend((0..count).map(|_| Patch::Remove { index: at }));
}

/// Returns the cursor just past the inserted run.
fn push_inserts(patches: &mut Vec<Patch>, start: usize, entries: &[SectionEntry]) -> usize {
    for (offset, entry) in entries.iter().enumerate() {
        patches.push(Patch::Insert {
            index: start + offset,
            entry: entry.clone(),
        });
    }
    start + entries.len()
}

/// Patch that does not fit the list it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchError {
    pub patch_index: usize,
    pub index: usize,
    pub len: usize,
}

impl Display for PatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "patch #{} targets index {} of a list with {} entries",
            self.patch_index, self.index, self.len
        )
    }
}

impl Error for PatchError {}

/// Applies patches in order, the way a display layer is expected to.
///
/// Stops at the first out-of-range patch; earlier patches stay applied.
pub fn apply_patch(entries: &mut Vec<SectionEntry>, patches: &[Patch]) -> Result<(), PatchError> {
    for (patch_index, patch) in patches.iter().enumerate() {
        let len = entries.len();
        let out_of_range = PatchError {
            patch_index,
            index: patch.index(),
            len,
        };
        match patch {
            Patch::Insert { index, entry } => {
                if *index > len {
                    return Err(out_of_range);
                }
                entries.insert(*index, entry.clone());
            }
            Patch::Remove { index } => {
                if *index >= len {
                    return Err(out_of_range);
                }
                entries.remove(*index);
            }
            Patch::Update { index, entry } => {
                let Some(slot) = entries.get_mut(*index) else {
                    return Err(out_of_range);
                };
                *slot = entry.clone();
            }
        }
    }
    Ok(())
}
