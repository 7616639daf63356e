//! On-disk schema and its versioned upgrade path
//!
//! The schema version lives in SQLite's `user_version` pragma. Upgrades
//! are an explicit ordered list of [`Migration`] steps; opening a store
//! replays every step newer than the on-disk version, so an old store is
//! migrated forward without discarding its rows.
//!
//! Version 1 is the one destructive step: the legacy two-table layout
//! (`tileinfo` metadata plus `tiledata` payloads) is dropped by name and
//! never recreated. The current `tiles` table is preserved by every
//! later step.

use rusqlite::Connection;
use tracing::debug;

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 2;

/// Legacy table names dropped unconditionally during upgrade.
pub const LEGACY_TABLES: [&str; 2] = ["tileinfo", "tiledata"];

/// One versioned upgrade step.
pub struct Migration {
    /// Version the store is at after this step runs.
    pub version: i64,
    /// Short human-readable summary, logged when the step runs.
    pub summary: &'static str,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

/// Ordered upgrade steps, ascending by version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        summary: "drop legacy tileinfo/tiledata tables, create tiles table",
        apply: migrate_v1,
    },
    Migration {
        version: 2,
        summary: "add zoom-scoped index",
        apply: migrate_v2,
    },
];

fn migrate_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS tileinfo;
         DROP TABLE IF EXISTS tiledata;
         CREATE TABLE IF NOT EXISTS tiles (
             key          TEXT PRIMARY KEY,
             url          TEXT NOT NULL,
             url_template TEXT NOT NULL,
             x            INTEGER NOT NULL,
             y            INTEGER NOT NULL,
             z            INTEGER NOT NULL,
             inverted_y   INTEGER NOT NULL,
             created_at   INTEGER NOT NULL,
             blob         BLOB NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_tiles_url_template ON tiles (url_template);",
    )
}

fn migrate_v2(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_tiles_z ON tiles (z);")
}

/// Errors from opening or migrating the schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The on-disk version is newer than this library understands.
    #[error("store schema version {on_disk} is newer than supported version {supported}")]
    FutureVersion { on_disk: i64, supported: i64 },

    /// A migration step failed.
    #[error("schema migration to version {version} failed: {source}")]
    Migration {
        version: i64,
        source: rusqlite::Error,
    },

    /// Reading or writing the version pragma failed.
    #[error("schema version check failed: {0}")]
    Version(rusqlite::Error),
}

/// Reads the on-disk version and replays every newer migration step.
pub fn migrate(conn: &Connection) -> Result<(), SchemaError> {
    let on_disk: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(SchemaError::Version)?;

    if on_disk > SCHEMA_VERSION {
        return Err(SchemaError::FutureVersion {
            on_disk,
            supported: SCHEMA_VERSION,
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > on_disk) {
        debug!(
            version = migration.version,
            summary = migration.summary,
            "applying schema migration"
        );
        (migration.apply)(conn).map_err(|source| SchemaError::Migration {
            version: migration.version,
            source,
        })?;
        conn.pragma_update(None, "user_version", migration.version)
            .map_err(SchemaError::Version)?;
    }

    Ok(())
}
