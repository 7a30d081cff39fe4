use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::cli::LibraryCommand;
use crate::domain::BookmarkToken;

use super::super::Container;

pub struct LibraryController<'a> {
    container: &'a Container,
}

impl<'a> LibraryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn handle(&self, command: LibraryCommand) -> Result<String> {
        let global = self.container.global_library();

        match command {
            LibraryCommand::Add { path } => {
                let file_ref = global.add(&path).await?;
                Ok(format!(
                    "Added {} to the global library\n  token: {}",
                    file_ref.display_name(),
                    encode_token(file_ref.token())
                ))
            }
            LibraryCommand::Remove { token } => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(token.trim())
                    .context("Token is not valid base64")?;
                if global.remove(&BookmarkToken::new(bytes)).await? {
                    Ok("Removed from the global library".to_string())
                } else {
                    Ok("No library entry for that token".to_string())
                }
            }
            LibraryCommand::List => {
                let refs = global.list().await?;
                if refs.is_empty() {
                    return Ok("Global library is empty.".to_string());
                }
                Ok(refs
                    .iter()
                    .map(|r| format!("{}\n  token: {}", r.display_name(), encode_token(r.token())))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            LibraryCommand::Context => {
                let context = global.context().await?;
                if context.is_empty() {
                    Ok("No global library context.".to_string())
                } else {
                    Ok(context)
                }
            }
        }
    }
}

fn encode_token(token: &BookmarkToken) -> String {
    URL_SAFE_NO_PAD.encode(token.as_bytes())
}
