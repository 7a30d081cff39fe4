use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::QuizRepository;
use crate::domain::{DomainError, Quiz, QuizQuestion};

pub struct DuckdbQuizRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbQuizRepository {
    pub async fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, DomainError> {
        let conn_guard = conn.lock().await;
        Self::initialize_schema(&conn_guard)?;
        drop(conn_guard);

        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS quizzes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                questions TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::persistence(format!("Failed to initialize quizzes schema: {}", e)))?;

        debug!("DuckDB quizzes table initialized");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for DuckdbQuizRepository {
    async fn save(&self, quiz: &Quiz) -> Result<(), DomainError> {
        let questions = serde_json::to_string(quiz.questions())
            .map_err(|e| DomainError::persistence(format!("Failed to encode questions: {}", e)))?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO quizzes (id, name, created_at, questions) VALUES (?, ?, ?, ?)",
            params![quiz.id(), quiz.name(), quiz.created_at(), questions],
        )
        .map_err(|e| DomainError::persistence(format!("Failed to save quiz: {}", e)))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Quiz>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, name, created_at, questions FROM quizzes ORDER BY created_at DESC, id")
            .map_err(|e| DomainError::persistence(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| DomainError::persistence(format!("Failed to list quizzes: {}", e)))?;

        let mut quizzes = Vec::new();
        for row in rows {
            let (id, name, created_at, questions) =
                row.map_err(|e| DomainError::persistence(format!("Failed to read row: {}", e)))?;
            let questions: Vec<QuizQuestion> = serde_json::from_str(&questions).map_err(|e| {
                DomainError::persistence(format!("Corrupt questions for quiz {}: {}", id, e))
            })?;
            quizzes.push(Quiz::reconstitute(id, name, created_at, questions));
        }
        Ok(quizzes)
    }
}
