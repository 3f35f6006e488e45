//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record and the edit-flow draft that produces it.
//! - Validate group linkage and user-entered fields before persistence.
//!
//! # Invariants
//! - `group_id` and `group_name` are both `Some` or both `None`.
//! - `group_name` caches the referenced group's name at assignment time and is
//!   refreshed by the store when that group is renamed.

use crate::model::group::GroupId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Stable store-assigned contact identifier.
pub type ContactId = i64;

/// Legacy "ungrouped" sentinel accepted at input boundaries.
///
/// Inside the core, ungrouped is always `group_id = None`.
pub const UNGROUPED_ID: GroupId = -1;

/// Canonical contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Display name. May be empty; such contacts land in the `#` section.
    pub name: String,
    pub phone: String,
    pub email: String,
    pub group_id: Option<GroupId>,
    /// Denormalized copy of the group's name.
    pub group_name: Option<String>,
    /// Opaque URI/path of the contact photo.
    pub photo_ref: Option<String>,
}

/// Validation failures for contact records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Only one of `group_id`/`group_name` is set.
    InconsistentGroup,
    BlankGroupName,
    BlankPhotoRef,
    InvalidEmail(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InconsistentGroup => {
                write!(f, "group id and group name must be set together")
            }
            Self::BlankGroupName => write!(f, "group name cannot be blank"),
            Self::BlankPhotoRef => write!(f, "photo reference cannot be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for ContactValidationError {}

impl Contact {
    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `InconsistentGroup` when group id and name disagree on presence.
    /// - `BlankGroupName` / `BlankPhotoRef` for whitespace-only optional fields.
    /// - `InvalidEmail` when a non-empty email is not `local@domain`.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        match (&self.group_id, &self.group_name) {
            (Some(_), Some(name)) if name.trim().is_empty() => {
                return Err(ContactValidationError::BlankGroupName);
            }
            (Some(_), Some(_)) | (None, None) => {}
            _ => return Err(ContactValidationError::InconsistentGroup),
        }

        if matches!(self.photo_ref.as_deref(), Some(value) if value.trim().is_empty()) {
            return Err(ContactValidationError::BlankPhotoRef);
        }

        if !self.email.is_empty() && !EMAIL_RE.is_match(&self.email) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }

    /// Returns whether this contact belongs to no group.
    pub fn is_ungrouped(&self) -> bool {
        self.group_id.is_none()
    }
}

/// Edit-flow input for creating or replacing a contact.
///
/// The group display name is not part of the draft: services resolve it from
/// the group record so the cached name cannot drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub group_id: Option<GroupId>,
    pub photo_ref: Option<String>,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Assigns a group. `UNGROUPED_ID` clears the assignment.
    pub fn group(mut self, group_id: GroupId) -> Self {
        self.group_id = normalize_group_id(Some(group_id));
        self
    }

    pub fn photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Builds a contact record from this draft.
    ///
    /// Text fields are trimmed; a blank photo reference becomes `None`.
    pub fn into_contact(self, id: ContactId, group_name: Option<String>) -> Contact {
        Contact {
            id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            group_id: normalize_group_id(self.group_id),
            group_name,
            photo_ref: self
                .photo_ref
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }
}

/// Maps the legacy `-1` sentinel (and any negative id) to "ungrouped".
pub fn normalize_group_id(group_id: Option<GroupId>) -> Option<GroupId> {
    group_id.filter(|id| *id >= 0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_group_id, Contact, ContactDraft, ContactValidationError, UNGROUPED_ID};

    fn contact() -> Contact {
        ContactDraft::new("Ada")
            .phone("555-0100")
            .email("ada@example.com")
            .into_contact(1, None)
    }

    #[test]
    fn valid_contact_passes() {
        assert_eq!(contact().validate(), Ok(()));
    }

    #[test]
    fn group_fields_must_be_set_together() {
        let mut value = contact();
        value.group_id = Some(3);
        assert_eq!(
            value.validate(),
            Err(ContactValidationError::InconsistentGroup)
        );

        value.group_name = Some("  ".to_string());
        assert_eq!(value.validate(), Err(ContactValidationError::BlankGroupName));
    }

    #[test]
    fn empty_email_is_allowed_but_malformed_is_not() {
        let mut value = contact();
        value.email.clear();
        assert_eq!(value.validate(), Ok(()));

        value.email = "not-an-email".to_string();
        assert!(matches!(
            value.validate(),
            Err(ContactValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn draft_trims_fields_and_drops_blank_photo() {
        let built = ContactDraft::new("  Bob ")
            .phone(" 1 ")
            .photo("   ")
            .into_contact(7, None);
        assert_eq!(built.name, "Bob");
        assert_eq!(built.phone, "1");
        assert_eq!(built.photo_ref, None);
    }

    #[test]
    fn ungrouped_sentinel_maps_to_none() {
        assert_eq!(normalize_group_id(Some(UNGROUPED_ID)), None);
        assert_eq!(ContactDraft::new("x").group(UNGROUPED_ID).group_id, None);
        assert_eq!(normalize_group_id(Some(0)), Some(0));
    }
}
