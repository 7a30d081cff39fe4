use serde::{Deserialize, Serialize};

use super::current_timestamp;

/// Opaque bookmark bytes that can be resolved back to a readable locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookmarkToken(Vec<u8>);

impl BookmarkToken {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Outcome of resolving a [`BookmarkToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBookmark {
    pub locator: String,
    /// The token still resolves, but to a file that was renamed or moved.
    pub is_stale: bool,
}

/// A file in the always-on global library, re-read on demand through its token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryFileRef {
    token: BookmarkToken,
    display_name: String,
    added_at: i64,
}

impl LibraryFileRef {
    pub fn new(token: BookmarkToken, display_name: impl Into<String>) -> Self {
        Self {
            token,
            display_name: display_name.into(),
            added_at: current_timestamp(),
        }
    }

    pub fn reconstitute(token: BookmarkToken, display_name: String, added_at: i64) -> Self {
        Self {
            token,
            display_name,
            added_at,
        }
    }

    pub fn token(&self) -> &BookmarkToken {
        &self.token
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn added_at(&self) -> i64 {
        self.added_at
    }
}
