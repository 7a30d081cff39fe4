use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::BookmarkStore;
use crate::domain::{BookmarkToken, DomainError, ResolvedBookmark};

#[derive(Serialize, Deserialize)]
struct BookmarkPayload {
    path: PathBuf,
    dev: u64,
    ino: u64,
}

/// Filesystem bookmarks: the canonical path plus the file's device and inode.
///
/// When the path no longer holds the original inode, the parent directory is
/// searched for it, which follows a rename within the same folder. Such a
/// match resolves as stale.
#[derive(Default)]
pub struct FsBookmarkStore;

impl FsBookmarkStore {
    pub fn new() -> Self {
        Self
    }

    fn find_inode_in(dir: &Path, dev: u64, ino: u64) -> Option<PathBuf> {
        let entries = std::fs::read_dir(dir).ok()?;
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                std::fs::metadata(path)
                    .map(|m| m.is_file() && file_id(&m) == (dev, ino))
                    .unwrap_or(false)
            })
    }
}

#[cfg(unix)]
fn file_id(metadata: &std::fs::Metadata) -> (u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.ino())
}

#[cfg(not(unix))]
fn file_id(_metadata: &std::fs::Metadata) -> (u64, u64) {
    (0, 0)
}

impl BookmarkStore for FsBookmarkStore {
    fn create(&self, path: &Path) -> Result<BookmarkToken, DomainError> {
        let path = path
            .canonicalize()
            .map_err(|e| DomainError::not_found(format!("{}: {}", path.display(), e)))?;
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(DomainError::invalid_input(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        let (dev, ino) = file_id(&metadata);

        let bytes = serde_json::to_vec(&BookmarkPayload { path, dev, ino })
            .map_err(|e| DomainError::internal(format!("Failed to encode bookmark: {}", e)))?;
        Ok(BookmarkToken::new(bytes))
    }

    fn resolve(&self, token: &BookmarkToken) -> Result<ResolvedBookmark, DomainError> {
        let payload: BookmarkPayload = serde_json::from_slice(token.as_bytes())
            .map_err(|e| DomainError::invalid_input(format!("Corrupt bookmark token: {}", e)))?;
        let locator = |p: &Path| p.to_string_lossy().to_string();

        let current = std::fs::metadata(&payload.path).ok();
        if let Some(metadata) = &current {
            if file_id(metadata) == (payload.dev, payload.ino) {
                return Ok(ResolvedBookmark {
                    locator: locator(&payload.path),
                    is_stale: false,
                });
            }
        }

        let moved = payload
            .path
            .parent()
            .and_then(|dir| Self::find_inode_in(dir, payload.dev, payload.ino));
        match (moved, current) {
            (Some(moved), _) => {
                debug!("Bookmark {} followed to {}", payload.path.display(), moved.display());
                Ok(ResolvedBookmark {
                    locator: locator(&moved),
                    is_stale: true,
                })
            }
            // Rewritten in place under a new inode: same name, same file.
            (None, Some(_)) => Ok(ResolvedBookmark {
                locator: locator(&payload.path),
                is_stale: false,
            }),
            (None, None) => Err(DomainError::not_found(format!(
                "Bookmarked file is gone: {}",
                payload.path.display()
            ))),
        }
    }
}
