use serde::{Deserialize, Serialize};

/// Read-only projection of a chunk returned by retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkHit {
    text: String,
    file_name: String,
    chunk_index: u32,
}

impl ChunkHit {
    pub fn new(text: impl Into<String>, file_name: impl Into<String>, chunk_index: u32) -> Self {
        Self {
            text: text.into(),
            file_name: file_name.into(),
            chunk_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn chunk_index(&self) -> u32 {
        self.chunk_index
    }

    pub fn display_line(&self) -> String {
        format!("{}#{}", self.file_name, self.chunk_index)
    }
}

/// A retrieval request: the query text and the file identities it is restricted to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    query: String,
    scope: Vec<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            scope: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn has_scope(&self) -> bool {
        !self.scope.is_empty()
    }
}

/// Formats hits as a context block for the provider router.
pub fn format_hits_as_context(hits: &[ChunkHit]) -> String {
    hits.iter()
        .map(|hit| format!("[{}] {}", hit.display_line(), hit.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
