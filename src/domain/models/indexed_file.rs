use serde::{Deserialize, Serialize};

use super::current_timestamp;

/// A file that has been extracted, chunked and written to the index.
///
/// The identity is the canonical locator of the file; re-indexing the same
/// identity replaces the previous entry and all of its chunks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedFile {
    identity: String,
    display_name: String,
    indexed_at: i64,
    content_hash: String,
}

impl IndexedFile {
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>, content: &str) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            indexed_at: current_timestamp(),
            content_hash: compute_content_hash(content),
        }
    }

    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        identity: String,
        display_name: String,
        indexed_at: i64,
        content_hash: String,
    ) -> Self {
        Self {
            identity,
            display_name,
            indexed_at,
            content_hash,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn indexed_at(&self) -> i64 {
        self.indexed_at
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// A retrievable unit of text belonging to an [`IndexedFile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub file_identity: String,
    pub sequence_index: u32,
    pub text: String,
}

impl Chunk {
    pub fn new(file_identity: impl Into<String>, sequence_index: u32, text: impl Into<String>) -> Self {
        Self {
            file_identity: file_identity.into(),
            sequence_index,
            text: text.into(),
        }
    }

    /// Builds the ordered chunk list for a file, numbering them 0..N-1.
    pub fn sequence_for(file_identity: &str, texts: &[String]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(file_identity, i as u32, text.clone()))
            .collect()
    }
}

/// Computes SHA-256 hash of extracted text.
pub fn compute_content_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}
