use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::LibraryRefRepository;
use crate::domain::{BookmarkToken, DomainError, LibraryFileRef};

/// Global library references. Tokens are stored base64-encoded and double as
/// the primary key.
pub struct DuckdbLibraryRefRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbLibraryRefRepository {
    pub async fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, DomainError> {
        let conn_guard = conn.lock().await;
        Self::initialize_schema(&conn_guard)?;
        drop(conn_guard);

        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS library_refs (
                token TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                added_at BIGINT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::persistence(format!("Failed to initialize library_refs schema: {}", e)))?;

        debug!("DuckDB library_refs table initialized");
        Ok(())
    }
}

#[async_trait]
impl LibraryRefRepository for DuckdbLibraryRefRepository {
    async fn save(&self, file_ref: &LibraryFileRef) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO library_refs (token, display_name, added_at) VALUES (?, ?, ?) \
             ON CONFLICT (token) DO UPDATE SET display_name = excluded.display_name",
            params![
                STANDARD.encode(file_ref.token().as_bytes()),
                file_ref.display_name(),
                file_ref.added_at()
            ],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to save library reference: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, token: &BookmarkToken) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute(
                "DELETE FROM library_refs WHERE token = ?",
                params![STANDARD.encode(token.as_bytes())],
            )
            .map_err(|e| DomainError::persistence(format!("Failed to delete library reference: {}", e)))?;
        Ok(removed > 0)
    }

    async fn list(&self) -> Result<Vec<LibraryFileRef>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT token, display_name, added_at FROM library_refs ORDER BY added_at, display_name")
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to list library references: {}", e)))?;

        let mut refs = Vec::new();
        for row in rows {
            let (token, display_name, added_at) =
                row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?;
            let bytes = STANDARD.decode(token.as_bytes()).map_err(|e| {
                DomainError::persistence(format!("Corrupt bookmark token for {}: {}", display_name, e))
            })?;
            refs.push(LibraryFileRef::reconstitute(
                BookmarkToken::new(bytes),
                display_name,
                added_at,
            ));
        }
        Ok(refs)
    }
}
