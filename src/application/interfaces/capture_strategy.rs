use async_trait::async_trait;

/// One way of grabbing text from whatever the user is looking at.
#[async_trait]
pub trait CaptureStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when this strategy found no usable text.
    async fn capture(&self) -> Option<String>;
}
