//! Persistent tile store
//!
//! SQLite-backed store indexing cached tile blobs by their stable cache
//! key, with secondary indexes on the source URL template ("all tiles
//! belonging to this layer") and on zoom. The public API is async; the
//! blocking SQLite work runs on `tokio::task::spawn_blocking` so store
//! calls never stall the async runtime.
//!
//! # Consistency
//!
//! SQLite gives per-key atomicity: a `save`/`get`/`remove` on one key is
//! atomic and serializable with respect to operations on the same key.
//! There is no cross-key transaction; `list_by_template` and `count`
//! observe some consistent prior state and may race concurrent writes.
//!
//! # Shared handle
//!
//! [`TileStore::shared`] opens one process-wide store lazily and caches
//! the handle for the process lifetime. Initialization is single-flight:
//! concurrent callers before the first open all resolve to the same
//! handle rather than racing separate opens.

mod schema;

pub use schema::{Migration, SchemaError, LEGACY_TABLES, MIGRATIONS, SCHEMA_VERSION};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::coord::TileCoord;
use crate::grid::TileDescriptor;

/// Busy timeout for the SQLite connection.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Process-wide store handle, opened once.
static SHARED: OnceCell<TileStore> = OnceCell::const_new();

/// Errors from tile store operations.
///
/// `FetchFailed` from the upstream byte-fetch service is deliberately
/// absent: the store never fetches. It only consumes fetched bytes via
/// [`TileStore::save`]; see [`crate::fetch::FetchError`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// `get` was asked for a key that is not in the store.
    #[error("tile not found: {0}")]
    NotFound(String),

    /// The store could not be opened or migrated. Fatal: every operation
    /// on the handle fails until the cause is resolved.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// An individual operation failed. Propagated unmodified; the store
    /// performs no automatic retry.
    #[error("storage I/O error: {0}")]
    Io(String),
}

/// Metadata row for one stored tile, as returned by the bulk query path.
///
/// The blob payload is omitted here for efficiency; fetch it by key via
/// [`TileStore::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTile {
    pub key: String,
    pub url: String,
    pub url_template: String,
    pub x: i64,
    pub y: i64,
    pub z: u8,
    pub inverted_y: i64,
    /// Milliseconds since the Unix epoch, stamped by `save`.
    pub created_at: i64,
}

impl StoredTile {
    /// The tile's grid coordinate in rendering convention.
    #[inline]
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y, self.z)
    }
}

/// SQLite-backed tile store. Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct TileStore {
    conn: Arc<Mutex<Connection>>,
}

impl TileStore {
    /// Opens (creating if needed) the store at `path` and migrates its
    /// schema forward.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the database cannot be
    /// opened or migrated.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || Self::open_blocking(&path))
            .await
            .map_err(|e| StoreError::Unavailable(format!("open task failed: {e}")))?
    }

    /// Opens an in-memory store. Used by tests and throwaway sessions;
    /// contents vanish when the handle is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        tokio::task::spawn_blocking(|| {
            let conn = Connection::open_in_memory()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Self::finish_open(conn, "<memory>")
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("open task failed: {e}")))?
    }

    /// Returns the process-wide shared store, opening it at `path` on
    /// first use. Single-flight: concurrent first callers resolve to one
    /// handle. Later calls ignore `path` and return the cached handle.
    pub async fn shared(path: impl AsRef<Path>) -> Result<&'static TileStore, StoreError> {
        let path = path.as_ref().to_path_buf();
        SHARED.get_or_try_init(|| TileStore::open(path)).await
    }

    fn open_blocking(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            }
        }
        let conn =
            Connection::open(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::finish_open(conn, &path.display().to_string())
    }

    fn finish_open(conn: Connection, label: &str) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        schema::migrate(&conn).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        info!(store = label, version = SCHEMA_VERSION, "tile store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Io(format!("storage task failed: {e}")))?
    }

    /// Total number of stored tile records, across all templates.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let n: i64 = conn
                .query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))
                .map_err(io_err)?;
            Ok(n as u64)
        })
        .await
    }

    /// All records whose `url_template` equals `template`, blobs omitted.
    /// No ordering guarantee beyond completeness.
    pub async fn list_by_template(&self, template: &str) -> Result<Vec<StoredTile>, StoreError> {
        let template = template.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT key, url, url_template, x, y, z, inverted_y, created_at
                     FROM tiles WHERE url_template = ?1",
                )
                .map_err(io_err)?;
            let rows = stmt
                .query_map([&template], |row| {
                    Ok(StoredTile {
                        key: row.get(0)?,
                        url: row.get(1)?,
                        url_template: row.get(2)?,
                        x: row.get(3)?,
                        y: row.get(4)?,
                        z: row.get(5)?,
                        inverted_y: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })
                .map_err(io_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(io_err)
        })
        .await
    }

    /// Upserts a record keyed by `descriptor.key`, fully replacing any
    /// existing record with that key, and stamps its creation time.
    pub async fn save(
        &self,
        descriptor: &TileDescriptor,
        blob: Vec<u8>,
    ) -> Result<(), StoreError> {
        let d = descriptor.clone();
        let created_at = Utc::now().timestamp_millis();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tiles
                     (key, url, url_template, x, y, z, inverted_y, created_at, blob)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    d.key,
                    d.url,
                    d.url_template,
                    d.x,
                    d.y,
                    d.z,
                    d.inverted_y,
                    created_at,
                    blob,
                ],
            )
            .map_err(io_err)?;
            debug!(key = %d.key, "tile saved");
            Ok(())
        })
        .await
    }

    /// The blob for `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the key is absent.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row("SELECT blob FROM tiles WHERE key = ?1", [&key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()
            .map_err(io_err)?
            .ok_or(StoreError::NotFound(key))
        })
        .await
    }

    /// Deletes the record for `key` if present. Idempotent: absence is
    /// success, not `NotFound`.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM tiles WHERE key = ?1", [&key])
                .map_err(io_err)?;
            Ok(())
        })
        .await
    }

    /// Deletes every record from the store.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM tiles", []).map_err(io_err)?;
            info!(removed, "tile store cleared");
            Ok(())
        })
        .await
    }
}

fn io_err(e: rusqlite::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(key: &str, template: &str, x: i64, y: i64, z: u8) -> TileDescriptor {
        TileDescriptor {
            key: key.to_string(),
            url: key.to_string(),
            url_template: template.to_string(),
            x,
            y,
            z,
            inverted_y: (1i64 << z) - 1 - y,
        }
    }

    #[tokio::test]
    async fn test_save_get_round_trip() {
        let store = TileStore::open_in_memory().await.unwrap();
        let d = descriptor("https://a.example.org/1/0/0.png", "t", 0, 0, 1);
        let blob = vec![0x89, 0x50, 0x4E, 0x47, 0x00, 0xFF];

        store.save(&d, blob.clone()).await.unwrap();
        let loaded = store.get(&d.key).await.unwrap();
        assert_eq!(loaded, blob);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = TileStore::open_in_memory().await.unwrap();
        let err = store.get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(key) if key == "nope"));
    }

    #[tokio::test]
    async fn test_save_replaces_existing_record() {
        let store = TileStore::open_in_memory().await.unwrap();
        let d = descriptor("k", "t", 0, 0, 1);

        store.save(&d, vec![1, 2, 3]).await.unwrap();
        store.save(&d, vec![9]).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), vec![9]);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = TileStore::open_in_memory().await.unwrap();
        let d = descriptor("k", "t", 0, 0, 1);
        store.save(&d, vec![1]).await.unwrap();

        store.remove("k").await.unwrap();
        assert!(matches!(
            store.get("k").await,
            Err(StoreError::NotFound(_))
        ));

        // Absent key: still success.
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_count_tracks_saves_and_removes() {
        let store = TileStore::open_in_memory().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        for i in 0..5 {
            let d = descriptor(&format!("k{i}"), "t", i, 0, 3);
            store.save(&d, vec![i as u8]).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 5);

        store.remove("k2").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_clear_empties_every_template() {
        let store = TileStore::open_in_memory().await.unwrap();
        store
            .save(&descriptor("a", "t1", 0, 0, 1), vec![1])
            .await
            .unwrap();
        store
            .save(&descriptor("b", "t2", 0, 0, 1), vec![2])
            .await
            .unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list_by_template("t1").await.unwrap().is_empty());
        assert!(store.list_by_template("t2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_template() {
        let store = TileStore::open_in_memory().await.unwrap();
        store
            .save(&descriptor("a1", "t1", 0, 0, 1), vec![1])
            .await
            .unwrap();
        store
            .save(&descriptor("a2", "t1", 1, 0, 1), vec![2])
            .await
            .unwrap();
        store
            .save(&descriptor("b1", "t2", 0, 0, 1), vec![3])
            .await
            .unwrap();

        let t1 = store.list_by_template("t1").await.unwrap();
        let mut keys: Vec<&str> = t1.iter().map(|t| t.key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a1", "a2"]);

        let t2 = store.list_by_template("t2").await.unwrap();
        assert_eq!(t2.len(), 1);
        assert_eq!(t2[0].key, "b1");

        assert!(store.list_by_template("t3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_carries_descriptor_fields_and_timestamp() {
        let store = TileStore::open_in_memory().await.unwrap();
        let before = Utc::now().timestamp_millis();
        store
            .save(&descriptor("k", "t", 3, 5, 4), vec![1])
            .await
            .unwrap();

        let rows = store.list_by_template("t").await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!((row.x, row.y, row.z), (3, 5, 4));
        assert_eq!(row.inverted_y, 15 - 5);
        assert_eq!(row.coord(), TileCoord::new(3, 5, 4));
        assert!(row.created_at >= before);
    }

    #[tokio::test]
    async fn test_concurrent_saves_on_distinct_keys() {
        let store = TileStore::open_in_memory().await.unwrap();

        let saves = (0..32).map(|i| {
            let store = store.clone();
            async move {
                let d = descriptor(&format!("k{i}"), "t", i, 0, 6);
                store.save(&d, vec![i as u8; 16]).await
            }
        });
        for result in futures::future::join_all(saves).await {
            result.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 32);
    }

    #[tokio::test]
    async fn test_blob_bytes_survive_exactly() {
        let store = TileStore::open_in_memory().await.unwrap();
        let d = descriptor("k", "t", 0, 0, 1);
        // Every byte value, twice over, in an odd-length payload.
        let blob: Vec<u8> = (0..=255u8).chain(0..=255).chain(0..=2).collect();

        store.save(&d, blob.clone()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), blob);
    }
}
