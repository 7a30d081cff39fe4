use async_trait::async_trait;

use crate::domain::{DomainError, Quiz};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn save(&self, quiz: &Quiz) -> Result<(), DomainError>;

    async fn list(&self) -> Result<Vec<Quiz>, DomainError>;
}
