use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::application::ScopedAccess;
use crate::domain::DomainError;

/// Scoped access for an unsandboxed process.
///
/// Acquisition checks that the file is reachable and counts outstanding
/// grants per path, so unbalanced acquire/release pairs show up in logs and
/// tests.
#[derive(Default)]
pub struct PathScopedAccess {
    grants: Mutex<HashMap<PathBuf, usize>>,
}

impl PathScopedAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of grants currently held across all paths.
    pub fn outstanding(&self) -> usize {
        self.grants
            .lock()
            .map(|grants| grants.values().sum())
            .unwrap_or(0)
    }
}

impl ScopedAccess for PathScopedAccess {
    fn start(&self, path: &Path) -> Result<(), DomainError> {
        std::fs::metadata(path)
            .map_err(|e| DomainError::unreadable(format!("{}: {}", path.display(), e)))?;

        let mut grants = self
            .grants
            .lock()
            .map_err(|_| DomainError::internal("scoped access table poisoned"))?;
        *grants.entry(path.to_path_buf()).or_insert(0) += 1;
        debug!("Acquired access to {}", path.display());
        Ok(())
    }

    fn stop(&self, path: &Path) {
        let Ok(mut grants) = self.grants.lock() else {
            return;
        };
        if let Some(count) = grants.get_mut(path) {
            *count -= 1;
            if *count == 0 {
                grants.remove(path);
            }
        }
        debug!("Released access to {}", path.display());
    }
}
