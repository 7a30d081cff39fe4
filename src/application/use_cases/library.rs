use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::{canonical_identity, ContentExtractor, KeyValueStore};
use crate::domain::{activate_exclusive, DomainError, LibraryFile, Project};

/// Storage key holding the serialized project list.
pub const PROJECTS_KEY: &str = "saved_projects";

/// Project collections and the active-project context.
///
/// Every mutation is a load, modify, save cycle under one mutex, so two
/// activations can never interleave and leave two projects active.
pub struct LibraryUseCase {
    store: Arc<dyn KeyValueStore>,
    extractor: Arc<dyn ContentExtractor>,
    write_lock: Mutex<()>,
}

impl LibraryUseCase {
    pub fn new(store: Arc<dyn KeyValueStore>, extractor: Arc<dyn ContentExtractor>) -> Self {
        Self {
            store,
            extractor,
            write_lock: Mutex::new(()),
        }
    }

    /// All projects, bootstrapping the default one on first use.
    pub async fn list(&self) -> Result<Vec<Project>, DomainError> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    pub async fn create(&self, name: &str) -> Result<Project, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_input("Project name must not be empty"));
        }
        let project = Project::new(name);
        self.mutate(|projects| {
            projects.push(project.clone());
            Ok(())
        })
        .await?;
        info!("Created project '{}' ({})", project.name(), project.id());
        Ok(project)
    }

    pub async fn rename(&self, project: &str, name: &str) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_input("Project name must not be empty"));
        }
        self.mutate(|projects| {
            find_mut(projects, project)?.rename(name);
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, project: &str) -> Result<(), DomainError> {
        self.mutate(|projects| {
            let id = find_mut(projects, project)?.id().to_string();
            projects.retain(|p| p.id() != id);
            Ok(())
        })
        .await?;
        info!("Deleted project {}", project);
        Ok(())
    }

    /// Makes `project` the only active project.
    pub async fn activate(&self, project: &str) -> Result<(), DomainError> {
        self.mutate(|projects| {
            let id = find_mut(projects, project)?.id().to_string();
            activate_exclusive(projects, &id);
            Ok(())
        })
        .await?;
        info!("Activated project {}", project);
        Ok(())
    }

    pub async fn deactivate(&self, project: &str) -> Result<(), DomainError> {
        self.mutate(|projects| {
            find_mut(projects, project)?.set_active(false);
            Ok(())
        })
        .await
    }

    /// Reads `path` once and caches its full text in the project.
    pub async fn add_file(&self, project: &str, path: &Path) -> Result<LibraryFile, DomainError> {
        // Extraction happens outside the lock; only the cached result is written.
        let content = self.extractor.extract(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let file = LibraryFile::new(name, canonical_identity(path), content);

        self.mutate(|projects| {
            find_mut(projects, project)?.add_file(file.clone());
            Ok(())
        })
        .await?;
        info!("Added {} to project {}", file.name(), project);
        Ok(file)
    }

    pub async fn remove_file(&self, project: &str, file_id: &str) -> Result<(), DomainError> {
        self.mutate(|projects| {
            if find_mut(projects, project)?.remove_file(file_id) {
                Ok(())
            } else {
                Err(DomainError::not_found(format!("file {} in project {}", file_id, project)))
            }
        })
        .await
    }

    /// Context of the active project, or `""` when none is active.
    pub async fn active_context(&self) -> Result<String, DomainError> {
        let projects = self.list().await?;
        Ok(projects
            .iter()
            .find(|p| p.is_active())
            .map(Project::context)
            .unwrap_or_default())
    }

    /// Context of a specific project regardless of its active flag.
    pub async fn project_context(&self, project: &str) -> Result<String, DomainError> {
        let mut projects = self.list().await?;
        Ok(find_mut(&mut projects, project)?.context())
    }

    async fn mutate<F>(&self, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Vec<Project>) -> Result<(), DomainError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load().await?;
        change(&mut projects)?;
        self.save(&projects).await
    }

    /// Caller must hold `write_lock`.
    async fn load(&self) -> Result<Vec<Project>, DomainError> {
        match self.store.fetch(PROJECTS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                DomainError::persistence(format!("Corrupt {} value: {}", PROJECTS_KEY, e))
            }),
            None => {
                debug!("No saved projects, creating the default project");
                let projects = vec![Project::bootstrap()];
                self.save(&projects).await?;
                Ok(projects)
            }
        }
    }

    async fn save(&self, projects: &[Project]) -> Result<(), DomainError> {
        let raw = serde_json::to_string(projects)
            .map_err(|e| DomainError::persistence(format!("Failed to encode projects: {}", e)))?;
        self.store.save(PROJECTS_KEY, &raw).await
    }
}

/// Looks a project up by id, falling back to an exact name match.
fn find_mut<'a>(projects: &'a mut [Project], key: &str) -> Result<&'a mut Project, DomainError> {
    let index = projects
        .iter()
        .position(|p| p.id() == key)
        .or_else(|| projects.iter().position(|p| p.name() == key))
        .ok_or_else(|| DomainError::not_found(format!("project {}", key)))?;
    Ok(&mut projects[index])
}
