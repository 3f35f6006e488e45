//! Group repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `groups`.
//! - Keep the denormalized `contacts.group_name` cache in step with renames.
//!
//! # Invariants
//! - Group names are trimmed and non-blank; uniqueness is case-insensitive.
//! - Rename updates the group row and every member contact in one transaction.
//! - Delete cascades to member contacts through the `ON DELETE CASCADE` key.

use super::{ensure_connection_ready, is_unique_violation, RepoError, RepoResult};
use crate::model::group::{normalize_group_name, Group, GroupId};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for group operations.
pub trait GroupRepository {
    /// Creates one group and returns the stored record.
    fn create_group(&self, name: &str) -> RepoResult<Group>;
    /// Renames one group and refreshes cached names on member contacts.
    fn rename_group(&self, id: GroupId, name: &str) -> RepoResult<Group>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Lists all groups sorted by name (case-insensitive), then id.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;
    /// Deletes one group; returns how many member contacts were removed.
    fn delete_group(&self, id: GroupId) -> RepoResult<usize>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["groups", "contacts"])?;
        Ok(Self { conn })
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, name: &str) -> RepoResult<Group> {
        let name = normalize_group_name(name)?;
        self.conn
            .execute("INSERT INTO groups (name) VALUES (?1);", [name.as_str()])
            .map_err(|err| map_write_error(err, &name))?;

        Ok(Group {
            id: self.conn.last_insert_rowid(),
            name,
        })
    }

    fn rename_group(&self, id: GroupId, name: &str) -> RepoResult<Group> {
        let name = normalize_group_name(name)?;
        // Repositories are driven from one thread, so this is still exclusive.
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx
            .execute(
                "UPDATE groups
                 SET
                    name = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![id, name.as_str()],
            )
            .map_err(|err| map_write_error(err, &name))?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(id));
        }

        let refreshed = tx.execute(
            "UPDATE contacts
             SET
                group_name = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE group_id = ?1;",
            params![id, name.as_str()],
        )?;
        tx.commit()?;

        info!(
            "event=group_rename module=repo status=ok group_id={} contacts_refreshed={}",
            id, refreshed
        );
        Ok(Group { id, name })
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let group = self
            .conn
            .query_row(
                "SELECT id, name FROM groups WHERE id = ?1;",
                [id],
                parse_group_row,
            )
            .optional()?;
        Ok(group)
    }

    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM groups ORDER BY name COLLATE NOCASE ASC, id ASC;")?;
        let groups = stmt
            .query_map([], parse_group_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn delete_group(&self, id: GroupId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let members: i64 = tx.query_row(
            "SELECT COUNT(*) FROM contacts WHERE group_id = ?1;",
            [id],
            |row| row.get(0),
        )?;

        let changed = tx.execute("DELETE FROM groups WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(id));
        }
        tx.commit()?;

        let removed = usize::try_from(members).map_err(|_| {
            RepoError::InvalidData(format!("negative member count `{members}` for group {id}"))
        })?;
        info!(
            "event=group_delete module=repo status=ok group_id={} contacts_removed={}",
            id, removed
        );
        Ok(removed)
    }
}

fn parse_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn map_write_error(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::DuplicateGroupName(name.to_string());
    }
    err.into()
}
