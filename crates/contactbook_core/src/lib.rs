//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact/group invariants and
//! for the sectioned, incrementally updated contact list.

pub mod db;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repo;
pub mod sections;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::contact::{Contact, ContactDraft, ContactId, ContactValidationError, UNGROUPED_ID};
pub use model::group::{Group, GroupId, GroupValidationError};
pub use observe::{SnapshotHub, SubscriptionId};
pub use repo::contact_repo::{
    ContactListQuery, ContactRepository, GroupFilter, SqliteContactRepository,
};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::{RepoError, RepoResult};
pub use sections::{
    apply_patch, build_sections, diff, find_section_start, section_key, section_labels,
    sort_for_sections, Patch, PatchError, PinyinRomanizer, Romanizer, SectionEntry,
    SectionedList, FALLBACK_SECTION,
};
pub use service::contact_service::{
    ContactService, DeleteConfirmation, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
