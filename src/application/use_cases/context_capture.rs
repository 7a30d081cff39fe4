use std::sync::Arc;

use tracing::debug;

use crate::application::CaptureStrategy;

/// Grabs on-screen text by trying each strategy in priority order
/// (accessibility text first, then screenshot OCR). The first strategy that
/// yields non-blank text wins.
pub struct ContextCaptureUseCase {
    strategies: Vec<Arc<dyn CaptureStrategy>>,
}

impl ContextCaptureUseCase {
    pub fn new(strategies: Vec<Arc<dyn CaptureStrategy>>) -> Self {
        Self { strategies }
    }

    pub async fn capture_context(&self) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.capture().await {
                Some(text) if !text.trim().is_empty() => {
                    debug!("Captured {} chars via {}", text.len(), strategy.name());
                    return Some(text);
                }
                _ => debug!("{} produced no text", strategy.name()),
            }
        }
        None
    }
}
