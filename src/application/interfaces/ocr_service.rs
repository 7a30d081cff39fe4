use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// One recognized span of text with a confidence in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    pub confidence: f32,
}

impl Recognition {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Optical character recognition over an image file.
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<Vec<Recognition>, DomainError>;
}
