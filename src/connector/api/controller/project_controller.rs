use anyhow::Result;

use crate::cli::ProjectCommand;
use crate::domain::Project;

use super::super::Container;

pub struct ProjectController<'a> {
    container: &'a Container,
}

impl<'a> ProjectController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn handle(&self, command: ProjectCommand) -> Result<String> {
        let library = self.container.library();

        match command {
            ProjectCommand::List => {
                let projects = library.list().await?;
                Ok(self.format_projects(&projects))
            }
            ProjectCommand::Create { name } => {
                let project = library.create(&name).await?;
                Ok(format!("Created project {} ({})", project.name(), project.id()))
            }
            ProjectCommand::Rename { project, name } => {
                library.rename(&project, &name).await?;
                Ok(format!("Renamed {} to {}", project, name))
            }
            ProjectCommand::Delete { project } => {
                library.delete(&project).await?;
                Ok(format!("Deleted project {}", project))
            }
            ProjectCommand::Activate { project } => {
                library.activate(&project).await?;
                Ok(format!("Activated {}", project))
            }
            ProjectCommand::Deactivate { project } => {
                library.deactivate(&project).await?;
                Ok(format!("Deactivated {}", project))
            }
            ProjectCommand::AddFile { project, path } => {
                let file = library.add_file(&project, &path).await?;
                Ok(format!("Added {} ({}) to {}", file.name(), file.id(), project))
            }
            ProjectCommand::RemoveFile { project, file_id } => {
                library.remove_file(&project, &file_id).await?;
                Ok(format!("Removed {} from {}", file_id, project))
            }
            ProjectCommand::Context { project } => {
                let context = match project {
                    Some(project) => library.project_context(&project).await?,
                    None => library.active_context().await?,
                };
                if context.is_empty() {
                    Ok("No project context.".to_string())
                } else {
                    Ok(context)
                }
            }
        }
    }

    fn format_projects(&self, projects: &[Project]) -> String {
        let mut output = String::new();
        for project in projects {
            let marker = if project.is_active() { "*" } else { " " };
            output.push_str(&format!(
                "{} {}  {} ({} files)\n",
                marker,
                project.id(),
                project.name(),
                project.files().len()
            ));
            for file in project.files() {
                output.push_str(&format!("      {}  {}\n", file.id(), file.name()));
            }
        }
        output.trim_end().to_string()
    }
}
