//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `contacts` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` and check group linkage before
//!   SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is `name COLLATE NOCASE ASC, id ASC`.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::contact::{Contact, ContactId};
use crate::model::group::GroupId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone,
    email,
    group_id,
    group_name,
    photo_ref
FROM contacts";

/// Group filter applied by [`ContactRepository::list_contacts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Ungrouped,
    Group(GroupId),
}

/// Query options for listing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactListQuery {
    pub group: GroupFilter,
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Inserts a contact and returns the store-assigned id.
    ///
    /// `contact.id` is ignored.
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["groups", "contacts"])?;
        Ok(Self { conn })
    }

    fn check_group_link(&self, contact: &Contact) -> RepoResult<()> {
        let (Some(group_id), Some(group_name)) = (contact.group_id, contact.group_name.as_deref())
        else {
            return Ok(());
        };

        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM groups WHERE id = ?1;",
                [group_id],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            None => Err(RepoError::GroupNotFound(group_id)),
            Some(name) if name != group_name => Err(RepoError::GroupNameMismatch(group_id)),
            Some(_) => Ok(()),
        }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;
        self.check_group_link(contact)?;

        self.conn.execute(
            "INSERT INTO contacts (
                name,
                phone,
                email,
                group_id,
                group_name,
                photo_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                contact.name.as_str(),
                contact.phone.as_str(),
                contact.email.as_str(),
                contact.group_id,
                contact.group_name.as_deref(),
                contact.photo_ref.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;
        self.check_group_link(contact)?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                name = ?1,
                phone = ?2,
                email = ?3,
                group_id = ?4,
                group_name = ?5,
                photo_ref = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                contact.name.as_str(),
                contact.phone.as_str(),
                contact.email.as_str(),
                contact.group_id,
                contact.group_name.as_deref(),
                contact.photo_ref.as_deref(),
                contact.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ContactNotFound(contact.id));
        }

        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.group {
            GroupFilter::All => {}
            GroupFilter::Ungrouped => sql.push_str(" AND group_id IS NULL"),
            GroupFilter::Group(group_id) => {
                sql.push_str(" AND group_id = ?");
                bind_values.push(Value::Integer(group_id));
            }
        }

        sql.push_str(" ORDER BY name COLLATE NOCASE ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::ContactNotFound(id));
        }

        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let contact = Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        group_id: row.get("group_id")?,
        group_name: row.get("group_name")?,
        photo_ref: row.get("photo_ref")?,
    };
    contact.validate().map_err(|err| {
        RepoError::InvalidData(format!("contact {} failed validation: {err}", contact.id))
    })?;
    Ok(contact)
}
