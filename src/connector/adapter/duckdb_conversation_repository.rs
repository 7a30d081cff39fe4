use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ConversationRepository;
use crate::domain::{Conversation, DomainError, Message, Role};

/// Conversations and their messages. Message `sources` and `attachments`
/// are JSON text columns decoded on read; undecodable values are reported,
/// never read back as empty lists.
pub struct DuckdbConversationRepository {
    conn: Arc<Mutex<Connection>>,
}

type MessageRow = (String, String, String, i64, String, String);

impl DuckdbConversationRepository {
    pub async fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, DomainError> {
        let conn_guard = conn.lock().await;
        Self::initialize_schema(&conn_guard)?;
        drop(conn_guard);

        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                created_at BIGINT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS messages (
                id TEXT NOT NULL,
                conversation_id TEXT NOT NULL,
                position BIGINT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                sources TEXT NOT NULL,
                attachments TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id);
            "#,
        )
        .map_err(|e| DomainError::persistence(format!("Failed to initialize conversation schema: {}", e)))?;

        debug!("DuckDB conversation tables initialized");
        Ok(())
    }

    fn encode_list(values: &[String]) -> Result<String, DomainError> {
        serde_json::to_string(values)
            .map_err(|e| DomainError::persistence(format!("Failed to encode list: {}", e)))
    }

    fn decode_list(column: &str, message_id: &str, raw: &str) -> Result<Vec<String>, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            DomainError::persistence(format!(
                "Corrupt {} for message {}: {}",
                column, message_id, e
            ))
        })
    }

    fn insert_message(
        conn: &Connection,
        conversation_id: &str,
        position: i64,
        message: &Message,
    ) -> Result<(), DomainError> {
        conn.execute(
            "INSERT INTO messages (id, conversation_id, position, role, content, created_at, sources, attachments) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                message.id(),
                conversation_id,
                position,
                message.role().as_str(),
                message.content(),
                message.created_at(),
                Self::encode_list(message.sources())?,
                Self::encode_list(message.attachments())?,
            ],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to insert message: {}", e)))?;
        Ok(())
    }

    fn load_messages(conn: &Connection, conversation_id: &str) -> Result<Vec<Message>, DomainError> {
        let mut stmt = conn
            .prepare(
                "SELECT id, role, content, created_at, sources, attachments \
                 FROM messages WHERE conversation_id = ? ORDER BY position",
            )
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![conversation_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to query messages: {}", e)))?;

        let mut messages = Vec::new();
        for row in rows {
            let row: MessageRow =
                row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?;
            messages.push(Self::row_to_message(row)?);
        }
        Ok(messages)
    }

    fn row_to_message(row: MessageRow) -> Result<Message, DomainError> {
        let (id, role, content, created_at, sources, attachments) = row;
        let role = Role::parse(&role).ok_or_else(|| {
            DomainError::persistence(format!("Unknown role '{}' for message {}", role, id))
        })?;
        let sources = Self::decode_list("sources", &id, &sources)?;
        let attachments = Self::decode_list("attachments", &id, &attachments)?;
        Ok(Message::reconstitute(
            id,
            role,
            content,
            created_at,
            sources,
            attachments,
        ))
    }
}

#[async_trait]
impl ConversationRepository for DuckdbConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "DELETE FROM messages WHERE conversation_id = ?",
            params![conversation.id()],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to delete messages: {}", e)))?;
        tx.execute(
            "INSERT INTO conversations (id, title, created_at) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET title = excluded.title",
            params![conversation.id(), conversation.title(), conversation.created_at()],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to save conversation: {}", e)))?;

        for (position, message) in conversation.messages().iter().enumerate() {
            Self::insert_message(&tx, conversation.id(), position as i64, message)?;
        }

        tx.commit()
            .map_err(|e| DomainError::persistence(format!("Failed to commit: {}", e)))?;

        debug!(
            "Saved conversation {} with {} messages",
            conversation.id(),
            conversation.messages().len()
        );
        Ok(())
    }

    async fn append_message(&self, conversation_id: &str, message: &Message) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let next: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM messages WHERE conversation_id = ?",
                params![conversation_id],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::persistence(format!("Failed to read message count: {}", e)))?;
        Self::insert_message(&conn, conversation_id, next, message)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Conversation>, DomainError> {
        let conn = self.conn.lock().await;
        let header = conn.query_row(
            "SELECT id, title, created_at FROM conversations WHERE id = ?",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        );

        let (id, title, created_at) = match header {
            Ok(header) => header,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => {
                return Err(DomainError::persistence(format!(
                    "Failed to find conversation: {}",
                    e
                )))
            }
        };

        let messages = Self::load_messages(&conn, &id)?;
        Ok(Some(Conversation::reconstitute(id, title, created_at, messages)))
    }

    async fn list(&self) -> Result<Vec<Conversation>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, title, created_at FROM conversations ORDER BY created_at DESC, id")
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to list conversations: {}", e)))?;

        let mut headers = Vec::new();
        for row in rows {
            headers.push(row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?);
        }

        let mut conversations = Vec::with_capacity(headers.len());
        for (id, title, created_at) in headers {
            let messages = Self::load_messages(&conn, &id)?;
            conversations.push(Conversation::reconstitute(id, title, created_at, messages));
        }
        Ok(conversations)
    }
}
