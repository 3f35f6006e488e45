//! Contact store schema migrations.
//!
//! # Responsibility
//! - Keep the ordered registry of embedded schema steps.
//! - Bring a connection up to the latest schema in one transaction and keep a
//!   per-step history in `schema_migrations`.
//!
//! # Invariants
//! - Registry versions form the chain `1, 2, .., latest`; a gap or reorder is
//!   rejected before any SQL runs.
//! - `PRAGMA user_version` equals the highest recorded history version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{params, Connection, Transaction};

/// One embedded schema step.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "init_groups_contacts",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "contact_indexes",
        sql: include_str!("0002_contact_indexes.sql"),
    },
];

const HISTORY_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// A schema step recorded as applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
}

/// Highest schema version this build knows.
pub fn latest_version() -> u32 {
    u32::try_from(SCHEMA_STEPS.len()).unwrap_or(u32::MAX)
}

/// Upgrades `conn` to [`latest_version`].
///
/// # Errors
/// - `BrokenMigrationChain` when the registry is not `1..=latest`.
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `MigrationHistoryMismatch` when recorded steps disagree with
///   `user_version`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    check_chain(SCHEMA_STEPS)?;

    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(HISTORY_TABLE_SQL)?;
    check_history(from_version, &recorded_versions(&tx)?)?;

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version);
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    if from_version < latest {
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            from_version, latest
        );
    }
    Ok(())
}

/// Steps recorded in `schema_migrations`, oldest first.
pub fn migration_history(conn: &Connection) -> DbResult<Vec<AppliedMigration>> {
    let mut stmt =
        conn.prepare("SELECT version, name FROM schema_migrations ORDER BY version ASC;")?;
    let history = stmt
        .query_map([], |row| {
            Ok(AppliedMigration {
                version: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(history)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2);",
        params![step.version, step.name],
    )?;
    tx.pragma_update(None, "user_version", step.version)?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

fn recorded_versions(conn: &Connection) -> DbResult<Vec<u32>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version ASC;")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, u32>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(versions)
}

fn check_chain(steps: &[SchemaStep]) -> DbResult<()> {
    for (expected, step) in (1_u32..).zip(steps) {
        if step.version != expected {
            return Err(DbError::BrokenMigrationChain {
                expected,
                found: step.version,
            });
        }
    }
    Ok(())
}

fn check_history(user_version: u32, recorded: &[u32]) -> DbResult<()> {
    let contiguous = (1_u32..).zip(recorded).all(|(expected, &found)| expected == found);
    let top = recorded.last().copied().unwrap_or(0);
    if !contiguous || top != user_version {
        return Err(DbError::MigrationHistoryMismatch {
            user_version,
            recorded: recorded.to_vec(),
        });
    }
    Ok(())
}
