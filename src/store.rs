//! The durable merged store and the engine that folds snapshots into
//! it. The store is append-only: rows are inserted once, keyed by the
//! browser's own ids, and never updated or deleted afterwards.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::{debug, warn};

use crate::error::{HistoryError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY,
    title TEXT,
    url TEXT
);
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY,
    url INTEGER,
    visit_time INTEGER
);
";

#[derive(Debug, Default, Clone, Copy)]
pub struct MergeStats {
    pub urls_added: usize,
    pub visits_added: usize,
}

pub struct MergedStore {
    conn: Connection,
}

impl MergedStore {
    /// Open the merged store, creating it with an empty two-table
    /// schema on first use. Safe to call on every invocation.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| HistoryError::StoreInit {
                path: path.to_path_buf(),
                source: Box::new(err),
            })?;
        }
        let conn = Connection::open(path).map_err(|err| HistoryError::StoreInit {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        conn.execute_batch(SCHEMA).map_err(|err| HistoryError::StoreInit {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Fold a snapshot into the merged store. Only rows whose id is not
    /// already present are inserted, so re-merging the same snapshot is
    /// a no-op. Urls go first so every inserted visit can resolve its
    /// url id within the same merge.
    pub fn merge_snapshot(&mut self, snapshot: &Path) -> Result<MergeStats> {
        self.conn.execute(
            "ATTACH DATABASE ?1 AS source",
            params![snapshot.to_string_lossy()],
        )?;
        let result = self.merge_attached();
        if let Err(err) = self.conn.execute("DETACH DATABASE source", []) {
            warn!("could not detach snapshot: {err}");
        }
        if let Ok(stats) = &result {
            debug!(
                "merged snapshot {}: {} urls, {} visits added",
                snapshot.display(),
                stats.urls_added,
                stats.visits_added
            );
        }
        result
    }

    fn merge_attached(&self) -> Result<MergeStats> {
        let tx = self.conn.unchecked_transaction()?;
        let urls_added = tx
            .execute(
                "INSERT INTO urls (id, title, url)
                 SELECT id, title, url FROM source.urls
                 WHERE id NOT IN (SELECT id FROM urls)",
                [],
            )
            .map_err(|err| map_merge_err("urls", err))?;
        let visits_added = tx
            .execute(
                "INSERT INTO visits (id, url, visit_time)
                 SELECT id, url, visit_time FROM source.visits
                 WHERE id NOT IN (SELECT id FROM visits)",
                [],
            )
            .map_err(|err| map_merge_err("visits", err))?;
        tx.commit()?;
        Ok(MergeStats {
            urls_added,
            visits_added,
        })
    }

    pub fn url_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn visit_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// A primary-key violation here means two sources reuse the same id for
/// different content; everything else is an ordinary store failure.
fn map_merge_err(table: &'static str, err: rusqlite::Error) -> HistoryError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            HistoryError::IdSpaceCollision { table, source: err }
        }
        _ => HistoryError::QueryExecution(err),
    }
}
