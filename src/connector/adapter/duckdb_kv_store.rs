use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::KeyValueStore;
use crate::domain::DomainError;

pub struct DuckdbKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbKeyValueStore {
    /// Create a new adapter using an existing shared connection.
    pub async fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, DomainError> {
        let conn_guard = conn.lock().await;
        Self::initialize_schema(&conn_guard)?;
        drop(conn_guard);

        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::persistence(format!("Failed to initialize kv_store schema: {}", e)))?;

        debug!("DuckDB kv_store table initialized");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for DuckdbKeyValueStore {
    async fn fetch(&self, key: &str) -> Result<Option<String>, DomainError> {
        let conn = self.conn.lock().await;
        match conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::persistence(format!("Failed to read {}: {}", key, e))),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?, ?) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to save {}: {}", key, e)))?;
        Ok(())
    }
}
