use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::current_timestamp;

pub const DEFAULT_PROJECT_NAME: &str = "My Library";

/// Separator placed between file blocks in the aggregated project context.
pub const CONTEXT_RULE: &str = "\n\n----------\n\n";

/// A reference file stored inside a [`Project`].
///
/// The content is read once when the file is added and cached here; it is
/// never re-read from `locator` afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryFile {
    id: String,
    name: String,
    locator: String,
    content: String,
    added_at: i64,
}

impl LibraryFile {
    pub fn new(name: impl Into<String>, locator: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            locator: locator.into(),
            content: content.into(),
            added_at: current_timestamp(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn added_at(&self) -> i64 {
        self.added_at
    }
}

/// A named collection of reference files whose content can be fed into context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    id: String,
    name: String,
    created_at: i64,
    is_active: bool,
    #[serde(default)]
    files: Vec<LibraryFile>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: current_timestamp(),
            is_active: false,
            files: Vec::new(),
        }
    }

    /// The project created on first run: active and empty.
    pub fn bootstrap() -> Self {
        let mut project = Self::new(DEFAULT_PROJECT_NAME);
        project.is_active = true;
        project
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn files(&self) -> &[LibraryFile] {
        &self.files
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn add_file(&mut self, file: LibraryFile) {
        self.files.push(file);
    }

    /// Removes a file by id, returning whether anything was removed.
    pub fn remove_file(&mut self, file_id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id() != file_id);
        self.files.len() != before
    }

    /// Concatenates cached file contents under a header naming each file.
    pub fn context(&self) -> String {
        self.files
            .iter()
            .map(|f| format!("--- {} ---\n{}", f.name(), f.content()))
            .collect::<Vec<_>>()
            .join(CONTEXT_RULE)
    }
}

/// Sets the active flag on exactly the project with `project_id` and clears it
/// on every other one. Returns false (and leaves the set untouched) when no
/// project has that id.
pub fn activate_exclusive(projects: &mut [Project], project_id: &str) -> bool {
    if !projects.iter().any(|p| p.id() == project_id) {
        return false;
    }
    for project in projects.iter_mut() {
        project.set_active(project.id() == project_id);
    }
    true
}
