use anyhow::Result;

use crate::domain::{Mode, ProviderKind};

use super::super::Container;

pub struct ProviderController<'a> {
    container: &'a Container,
}

impl<'a> ProviderController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn models(&self) -> Result<String> {
        let models = self.container.router().list_local_models().await?;
        if models.is_empty() {
            return Ok("No local models installed.".to_string());
        }
        Ok(models.join("\n"))
    }

    pub fn mode(&self) -> Result<String> {
        let router = self.container.router();
        let config = router.config();
        let mode = router.mode();

        let mut output = format!("Provider: {}\nModel:    {}\nMode:     {}", config.provider(), config.model(), mode);
        match config.provider_kind() {
            Some(ProviderKind::Anthropic) if config.credential(ProviderKind::Anthropic).is_some() => {
                output.push_str("\nConversations and study tools use the anthropic backend");
            }
            Some(kind) if kind.is_cloud() && mode == Mode::Local => {
                output.push_str("\nNo usable cloud credential; falling back to the local backend");
            }
            None => output.push_str(&format!("\nUnknown provider {}; using the local backend", config.provider())),
            _ => {}
        }
        Ok(output)
    }
}
