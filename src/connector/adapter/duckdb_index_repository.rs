use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::IndexRepository;
use crate::domain::{Chunk, ChunkHit, DomainError, IndexedFile};

/// Index store backed by DuckDB.
///
/// A replacement deletes the old file row and its chunks and inserts the new
/// ones inside one transaction. Identity uniqueness is kept by that
/// delete-then-insert rather than a key constraint.
pub struct DuckdbIndexRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbIndexRepository {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path).map_err(|e| {
            DomainError::persistence(format!("Failed to open DuckDB database: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::persistence(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Returns a clone of the shared connection so other adapters can use the
    /// same database file (DuckDB allows one write connection per file).
    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS indexed_files (
                identity TEXT NOT NULL,
                display_name TEXT NOT NULL,
                indexed_at BIGINT NOT NULL,
                content_hash TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                file_identity TEXT NOT NULL,
                seq BIGINT NOT NULL,
                text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_file ON chunks(file_identity);
            "#,
        )
        .map_err(|e| DomainError::persistence(format!("Failed to initialize index schema: {}", e)))?;

        debug!("DuckDB index schema initialized");
        Ok(())
    }

    fn placeholders(n: usize) -> String {
        vec!["?"; n].join(", ")
    }

    fn row_to_hit(row: &duckdb::Row<'_>) -> Result<ChunkHit, duckdb::Error> {
        Ok(ChunkHit::new(
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)? as u32,
        ))
    }
}

#[async_trait]
impl IndexRepository for DuckdbIndexRepository {
    async fn reindex(&self, file: &IndexedFile, chunks: &[String]) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "DELETE FROM chunks WHERE file_identity = ?",
            params![file.identity()],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to delete old chunks: {}", e)))?;
        tx.execute(
            "DELETE FROM indexed_files WHERE identity = ?",
            params![file.identity()],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to delete old file: {}", e)))?;

        if !chunks.is_empty() {
            tx.execute(
                "INSERT INTO indexed_files (identity, display_name, indexed_at, content_hash) VALUES (?, ?, ?, ?)",
                params![
                    file.identity(),
                    file.display_name(),
                    file.indexed_at(),
                    file.content_hash()
                ],
            )
            .map_err(|e| DomainError::persistence(format!("Failed to insert file: {}", e)))?;

            let mut stmt = tx
                .prepare("INSERT INTO chunks (file_identity, seq, text) VALUES (?, ?, ?)")
                .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;
            for (i, text) in chunks.iter().enumerate() {
                stmt.execute(params![file.identity(), i as i64, text])
                    .map_err(|e| DomainError::persistence(format!("Failed to insert chunk: {}", e)))?;
            }
        }

        tx.commit()
            .map_err(|e| DomainError::persistence(format!("Failed to commit: {}", e)))?;

        debug!("Replaced {} with {} chunks", file.identity(), chunks.len());
        Ok(())
    }

    async fn find_by_identity(&self, identity: &str) -> Result<Option<IndexedFile>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT identity, display_name, indexed_at, content_hash FROM indexed_files WHERE identity = ?",
            )
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![identity], |row| {
            Ok(IndexedFile::reconstitute(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ))
        }) {
            Ok(file) => Ok(Some(file)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::persistence(format!("Failed to find file: {}", e))),
        }
    }

    async fn remove(&self, identity: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        tx.execute("DELETE FROM chunks WHERE file_identity = ?", params![identity])
            .map_err(|e| DomainError::persistence(format!("Failed to delete chunks: {}", e)))?;
        let removed = tx
            .execute("DELETE FROM indexed_files WHERE identity = ?", params![identity])
            .map_err(|e| DomainError::persistence(format!("Failed to delete file: {}", e)))?;

        tx.commit()
            .map_err(|e| DomainError::persistence(format!("Failed to commit: {}", e)))?;

        Ok(removed > 0)
    }

    async fn list(&self) -> Result<Vec<IndexedFile>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT identity, display_name, indexed_at, content_hash FROM indexed_files ORDER BY identity",
            )
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(IndexedFile::reconstitute(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to list files: {}", e)))?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?);
        }
        Ok(files)
    }

    async fn chunks_for(&self, identity: &str) -> Result<Vec<Chunk>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT file_identity, seq, text FROM chunks WHERE file_identity = ? ORDER BY seq")
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![identity], |row| {
                Ok(Chunk::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)? as u32,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to query chunks: {}", e)))?;

        let mut chunks = Vec::new();
        for row in rows {
            chunks.push(row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?);
        }
        Ok(chunks)
    }

    async fn search_substring(
        &self,
        query: &str,
        scope: &[String],
    ) -> Result<Vec<ChunkHit>, DomainError> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT c.text, f.display_name, c.seq \
             FROM chunks c JOIN indexed_files f ON f.identity = c.file_identity \
             WHERE c.file_identity IN ({}) AND contains(lower(c.text), lower(?)) \
             ORDER BY c.file_identity, c.seq",
            Self::placeholders(scope.len())
        );

        // Both sides are lowered by DuckDB so they share one case mapping.
        let conn = self.conn.lock().await;
        let mut params_vec: Vec<&dyn duckdb::ToSql> =
            scope.iter().map(|s| s as &dyn duckdb::ToSql).collect();
        params_vec.push(&query);

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;
        let rows = stmt
            .query_map(params_vec.as_slice(), Self::row_to_hit)
            .map_err(|e| DomainError::persistence(format!("Failed to search chunks: {}", e)))?;

        let mut hits = Vec::new();
        for row in rows {
            hits.push(row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?);
        }
        Ok(hits)
    }

    async fn preview(&self, scope: &[String], limit: usize) -> Result<Vec<ChunkHit>, DomainError> {
        if scope.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT c.text, f.display_name, c.seq \
             FROM chunks c JOIN indexed_files f ON f.identity = c.file_identity \
             WHERE c.file_identity IN ({}) \
             ORDER BY c.seq, c.file_identity \
             LIMIT ?",
            Self::placeholders(scope.len())
        );
        let limit = limit as i64;

        let conn = self.conn.lock().await;
        let mut params_vec: Vec<&dyn duckdb::ToSql> =
            scope.iter().map(|s| s as &dyn duckdb::ToSql).collect();
        params_vec.push(&limit);

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;
        let rows = stmt
            .query_map(params_vec.as_slice(), Self::row_to_hit)
            .map_err(|e| DomainError::persistence(format!("Failed to preview chunks: {}", e)))?;

        let mut hits = Vec::new();
        for row in rows {
            hits.push(row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?);
        }
        Ok(hits)
    }

    async fn count_chunks(&self) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
            .map_err(|e| DomainError::persistence(format!("Failed to count chunks: {}", e)))?;
        Ok(count as u64)
    }
}
