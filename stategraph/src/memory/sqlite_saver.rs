//! SQLite-backed checkpointer (SqliteSaver). Persistent across process restarts.
//!
//! One row per thread id; `INSERT OR REPLACE` keeps the latest checkpoint only. The whole
//! checkpoint (state, step, next node) lives in the serialized `payload`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;

use super::{Checkpoint, CheckpointError, Checkpointer, JsonSerializer, Serializer};

fn storage(e: impl std::fmt::Display) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

/// SQLite-backed checkpointer. Payload is the serialized [`Checkpoint`].
///
/// Uses spawn_blocking for async; each operation is a single statement, so writes to
/// one thread id are atomic.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer>` when graph is compiled with a checkpointer.
pub struct SqliteSaver {
    db_path: PathBuf,
    serializer: Arc<dyn Serializer>,
}

impl SqliteSaver {
    /// Opens (or creates) the database and ensures the table exists. Uses [`JsonSerializer`].
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::with_serializer(path, Arc::new(JsonSerializer))
    }

    pub fn with_serializer(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer>,
    ) -> Result<Self, CheckpointError> {
        let db_path = path.as_ref().to_path_buf();
        let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id TEXT PRIMARY KEY,
                payload BLOB NOT NULL
            )
            "#,
            [],
        )
        .map_err(storage)?;
        Ok(Self {
            db_path,
            serializer,
        })
    }
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        if thread_id.is_empty() {
            return Err(CheckpointError::ThreadIdRequired);
        }
        let payload = self.serializer.serialize(checkpoint)?;
        let thread_id = thread_id.to_string();
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            conn.execute(
                "INSERT OR REPLACE INTO checkpoints (thread_id, payload) VALUES (?1, ?2)",
                params![thread_id, payload],
            )
            .map_err(storage)?;
            Ok::<(), CheckpointError>(())
        })
        .await
        .map_err(storage)?
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        if thread_id.is_empty() {
            return Err(CheckpointError::ThreadIdRequired);
        }
        let thread_id = thread_id.to_string();
        let db_path = self.db_path.clone();

        let payload = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            let mut stmt = conn
                .prepare("SELECT payload FROM checkpoints WHERE thread_id = ?1")
                .map_err(storage)?;
            let mut rows = stmt.query(params![thread_id]).map_err(storage)?;
            let row = match rows.next().map_err(storage)? {
                Some(r) => r,
                None => return Ok::<_, CheckpointError>(None),
            };
            let bytes: Vec<u8> = row.get(0).map_err(storage)?;
            Ok(Some(bytes))
        })
        .await
        .map_err(storage)??;

        match payload {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}
