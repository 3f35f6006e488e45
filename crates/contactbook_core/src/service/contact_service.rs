//! Contact and group use-case service.
//!
//! # Responsibility
//! - Provide the create/edit/detail/delete flows for contacts and groups.
//! - Resolve the cached group name from the group record on every write.
//! - Push a fresh, section-ordered snapshot to subscribers after each
//!   successful mutation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Deletions require an explicit [`DeleteConfirmation::Confirmed`].
//! - Snapshots delivered to subscribers are ordered by `sort_for_sections`.
//! - A committed write is reported as success even when the follow-up
//!   snapshot cannot be read; subscribers then miss that one update.

use crate::model::contact::{normalize_group_id, Contact, ContactDraft, ContactId};
use crate::model::group::{Group, GroupId};
use crate::observe::{SnapshotHub, SubscriptionId};
use crate::repo::contact_repo::{ContactListQuery, ContactRepository};
use crate::repo::group_repo::GroupRepository;
use crate::repo::{RepoError, RepoResult};
use crate::sections::key::{sort_for_sections, PinyinRomanizer, Romanizer};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for contact/group use-cases.
#[derive(Debug)]
pub enum ServiceError {
    ContactNotFound(ContactId),
    GroupNotFound(GroupId),
    /// A delete was requested without user confirmation.
    DeleteNotConfirmed,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::DeleteNotConfirmed => write!(f, "delete requires confirmation"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent contact state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ContactNotFound(id) => Self::ContactNotFound(id),
            RepoError::GroupNotFound(id) => Self::GroupNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// User answer to a "delete this?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Confirmed,
    Declined,
}

impl From<bool> for DeleteConfirmation {
    fn from(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Use-case facade over contact and group repositories.
pub struct ContactService<C, G, K = PinyinRomanizer> {
    contacts: C,
    groups: G,
    romanizer: K,
    hub: SnapshotHub,
}

impl<C: ContactRepository, G: GroupRepository> ContactService<C, G> {
    /// Creates a service with pinyin-based section ordering.
    pub fn new(contacts: C, groups: G) -> Self {
        Self::with_romanizer(contacts, groups, PinyinRomanizer)
    }
}

impl<C: ContactRepository, G: GroupRepository, K: Romanizer> ContactService<C, G, K> {
    pub fn with_romanizer(contacts: C, groups: G, romanizer: K) -> Self {
        Self {
            contacts,
            groups,
            romanizer,
            hub: SnapshotHub::new(),
        }
    }

    /// Creates a contact from edit-flow input and returns the stored record.
    pub fn create_contact(&self, draft: ContactDraft) -> ServiceResult<Contact> {
        let group_name = self.resolve_group_name(draft.group_id)?;
        let contact = draft.into_contact(0, group_name);
        let id = self.contacts.create_contact(&contact)?;
        let created = self
            .contacts
            .get_contact(id)?
            .ok_or(ServiceError::InconsistentState(
                "created contact not found in read-back",
            ))?;

        info!(
            "event=contact_create module=service status=ok contact_id={} grouped={}",
            id,
            created.group_id.is_some()
        );
        self.publish();
        Ok(created)
    }

    /// Replaces every editable field of an existing contact.
    pub fn update_contact(&self, id: ContactId, draft: ContactDraft) -> ServiceResult<Contact> {
        let group_name = self.resolve_group_name(draft.group_id)?;
        let contact = draft.into_contact(id, group_name);
        self.contacts.update_contact(&contact)?;
        let updated = self
            .contacts
            .get_contact(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated contact not found in read-back",
            ))?;

        info!(
            "event=contact_update module=service status=ok contact_id={}",
            id
        );
        self.publish();
        Ok(updated)
    }

    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.contacts.get_contact(id)
    }

    /// Lists contacts in store order (name, case-insensitive).
    pub fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        self.contacts.list_contacts(query)
    }

    /// Deletes one contact after user confirmation.
    pub fn delete_contact(
        &self,
        id: ContactId,
        confirmation: DeleteConfirmation,
    ) -> ServiceResult<()> {
        if confirmation != DeleteConfirmation::Confirmed {
            return Err(ServiceError::DeleteNotConfirmed);
        }

        self.contacts.delete_contact(id)?;
        info!(
            "event=contact_delete module=service status=ok contact_id={}",
            id
        );
        self.publish();
        Ok(())
    }

    pub fn create_group(&self, name: &str) -> ServiceResult<Group> {
        let group = self.groups.create_group(name)?;
        info!(
            "event=group_create module=service status=ok group_id={}",
            group.id
        );
        Ok(group)
    }

    /// Renames a group; member contacts pick up the new name.
    pub fn rename_group(&self, id: GroupId, name: &str) -> ServiceResult<Group> {
        let group = self.groups.rename_group(id, name)?;
        self.publish();
        Ok(group)
    }

    /// Deletes a group and, with it, every member contact.
    ///
    /// Returns how many contacts were removed.
    pub fn delete_group(
        &self,
        id: GroupId,
        confirmation: DeleteConfirmation,
    ) -> ServiceResult<usize> {
        if confirmation != DeleteConfirmation::Confirmed {
            return Err(ServiceError::DeleteNotConfirmed);
        }

        let removed = self.groups.delete_group(id)?;
        self.publish();
        Ok(removed)
    }

    pub fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        self.groups.get_group(id)
    }

    pub fn list_groups(&self) -> RepoResult<Vec<Group>> {
        self.groups.list_groups()
    }

    /// Returns all contacts ordered for sectioned display.
    pub fn snapshot(&self) -> RepoResult<Vec<Contact>> {
        let mut contacts = self.contacts.list_contacts(&ContactListQuery::default())?;
        sort_for_sections(&mut contacts, &self.romanizer);
        Ok(contacts)
    }

    /// Registers a snapshot handler and immediately hands it the current
    /// snapshot.
    pub fn subscribe<F>(&self, mut handler: F) -> ServiceResult<SubscriptionId>
    where
        F: FnMut(&[Contact]) + 'static,
    {
        let current = self.snapshot()?;
        handler(&current);
        Ok(self.hub.on_snapshot_changed(handler))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }

    /// Pushes a fresh snapshot after a committed write.
    ///
    /// A failed snapshot read is logged and dropped; the write already
    /// succeeded and its result is still returned to the caller.
    fn publish(&self) {
        if self.hub.subscriber_count() == 0 {
            return;
        }
        match self.snapshot() {
            Ok(snapshot) => {
                self.hub.publish(&snapshot);
            }
            // Row data can surface in read errors; log the failure only.
            Err(_) => warn!("event=snapshot_publish module=service status=error reason=read"),
        }
    }

    fn resolve_group_name(&self, group_id: Option<GroupId>) -> ServiceResult<Option<String>> {
        let Some(group_id) = normalize_group_id(group_id) else {
            return Ok(None);
        };
        let group = self
            .groups
            .get_group(group_id)?
            .ok_or(ServiceError::GroupNotFound(group_id))?;
        Ok(Some(group.name))
    }
}
