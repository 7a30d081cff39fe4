use std::path::PathBuf;

use anyhow::Result;

use crate::application::canonical_identity;
use crate::domain::{ChunkHit, SearchQuery};

use super::super::Container;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(&self, query: String, scope: Vec<PathBuf>) -> Result<String> {
        let scope = scope.iter().map(|p| canonical_identity(p)).collect();
        let search_query = SearchQuery::new(&query).with_scope(scope);

        let use_case = self.container.search_use_case();
        let hits = use_case.execute(&search_query).await?;

        Ok(self.format_hits(&hits))
    }

    fn format_hits(&self, hits: &[ChunkHit]) -> String {
        if hits.is_empty() {
            return "No results found.".to_string();
        }

        let mut output = format!("Found {} results:\n", hits.len());
        for hit in hits {
            output.push_str(&format!("\n{}  {}", hit.display_line(), hit.text()));
        }
        output
    }
}
