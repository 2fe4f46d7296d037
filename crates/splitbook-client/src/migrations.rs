use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");

pub const REQUIRED_INDEX_NAMES: [&str; 3] = [
    "idx_records_submitted_at",
    "idx_records_status",
    "idx_records_submission",
];

pub const REQUIRED_META_KEYS: [(&str, &str); 1] = [("schema_version", "v1")];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    let migrations = Migrations::new(vec![M::up(BOOTSTRAP_SQL)]);
    migrations.to_latest(conn)
}
