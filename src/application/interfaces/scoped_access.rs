use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Grants temporary permission to read a file outside the app's own storage.
///
/// Callers should go through [`acquire_scoped`] rather than calling
/// `start`/`stop` directly so release happens on every exit path.
pub trait ScopedAccess: Send + Sync {
    fn start(&self, path: &Path) -> Result<(), DomainError>;

    fn stop(&self, path: &Path);
}

/// Holds an access grant; dropping it releases the grant.
pub struct ScopedAccessGuard<'a> {
    access: &'a dyn ScopedAccess,
    path: PathBuf,
}

impl Drop for ScopedAccessGuard<'_> {
    fn drop(&mut self) {
        self.access.stop(&self.path);
    }
}

/// Acquires access to `path` unless it lives under the temporary directory.
pub fn acquire_scoped<'a>(
    access: &'a dyn ScopedAccess,
    path: &Path,
) -> Result<Option<ScopedAccessGuard<'a>>, DomainError> {
    if is_temporary(path) {
        return Ok(None);
    }
    access.start(path)?;
    Ok(Some(ScopedAccessGuard {
        access,
        path: path.to_path_buf(),
    }))
}

/// Both sides are canonicalized so a symlinked temp dir (macOS `/tmp`) or a
/// link into it still compares equal. Unresolvable paths are compared as given.
fn is_temporary(path: &Path) -> bool {
    let tmp = std::env::temp_dir();
    let tmp = tmp.canonicalize().unwrap_or(tmp);
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    path.starts_with(&tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl ScopedAccess for Recording {
        fn start(&self, path: &Path) -> Result<(), DomainError> {
            self.events.lock().unwrap().push(format!("start {}", path.display()));
            Ok(())
        }

        fn stop(&self, path: &Path) {
            self.events.lock().unwrap().push(format!("stop {}", path.display()));
        }
    }

    fn read_then_fail(access: &dyn ScopedAccess, path: &Path) -> Result<(), DomainError> {
        let _guard = acquire_scoped(access, path)?;
        Err(DomainError::unreadable("boom"))
    }

    #[test]
    fn test_release_on_error_path() {
        let access = Recording::default();
        let path = Path::new("/nonexistent-root/docs/a.txt");

        assert!(read_then_fail(&access, path).is_err());

        let events = access.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start /nonexistent-root/docs/a.txt".to_string(),
                "stop /nonexistent-root/docs/a.txt".to_string()
            ]
        );
    }

    #[test]
    fn test_temp_dir_skips_acquisition() {
        let access = Recording::default();
        let tmp = std::env::temp_dir().canonicalize().unwrap();
        let guard = acquire_scoped(&access, &tmp.join("scratch.txt")).unwrap();

        assert!(guard.is_none());
        assert!(access.events.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_link_into_temp_dir_skips_acquisition() {
        let target_dir = tempfile::tempdir().unwrap();
        let target = target_dir.path().join("scratch.txt");
        std::fs::write(&target, "scratch").unwrap();

        // The link lives outside the temp dir and only resolves into it.
        let link_dir = tempfile::Builder::new().prefix(".scoped-link").tempdir_in(".").unwrap();
        let link = link_dir.path().join("scratch.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let access = Recording::default();
        let guard = acquire_scoped(&access, &link).unwrap();

        assert!(guard.is_none());
        assert!(access.events.lock().unwrap().is_empty());
    }
}
