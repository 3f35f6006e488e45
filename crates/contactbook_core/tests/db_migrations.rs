use contactbook_core::db::migrations::{latest_version, migration_history};
use contactbook_core::db::{db_path_in, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "groups");
    assert_table_exists(&conn, "contacts");
}

#[test]
fn open_db_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path_in(dir.path());

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    conn_first
        .execute("INSERT INTO groups (name) VALUES ('Family');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let groups: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM groups;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(groups, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_applied_step_is_recorded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path_in(dir.path());
    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    let history = migration_history(&conn).unwrap();
    let versions = history.iter().map(|step| step.version).collect::<Vec<_>>();
    assert_eq!(versions, (1..=latest_version()).collect::<Vec<_>>());
    assert_eq!(history[0].name, "init_groups_contacts");
}

#[test]
fn reopening_with_incomplete_history_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path_in(dir.path());
    let conn = open_db(&path).unwrap();
    conn.execute("DELETE FROM schema_migrations WHERE version = 1;", [])
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::MigrationHistoryMismatch {
            user_version,
            recorded,
        } => {
            assert_eq!(user_version, latest_version());
            assert_eq!(recorded, (2..=latest_version()).collect::<Vec<_>>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_half_linked_group_fields() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO groups (name) VALUES ('Work');", [])
        .unwrap();

    let result = conn.execute(
        "INSERT INTO contacts (name, group_id, group_name) VALUES ('Amy', 1, NULL);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
