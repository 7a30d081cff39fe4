use std::path::PathBuf;

use anyhow::Result;

use crate::application::IndexReport;
use crate::domain::IndexedFile;

use super::super::Container;

pub struct IndexController<'a> {
    container: &'a Container,
}

impl<'a> IndexController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn index(&self, paths: Vec<PathBuf>) -> Result<String> {
        let use_case = self.container.index_use_case();
        let report = use_case.execute(&paths).await?;

        Ok(self.format_report(&report))
    }

    pub async fn remove(&self, path: PathBuf) -> Result<String> {
        let use_case = self.container.index_use_case();
        if use_case.remove(&path).await? {
            Ok(format!("Removed {} from the index", path.display()))
        } else {
            Ok(format!("{} is not indexed", path.display()))
        }
    }

    pub async fn files(&self) -> Result<String> {
        let repo = self.container.index_repository();
        let files = repo.list().await?;
        let total_chunks = repo.count_chunks().await?;

        Ok(self.format_files(&files, total_chunks))
    }

    fn format_report(&self, report: &IndexReport) -> String {
        let mut output = format!(
            "Indexed {} files ({} chunks)",
            report.indexed.len(),
            report.total_chunks()
        );

        for (identity, chunks) in &report.indexed {
            output.push_str(&format!("\n  {} ({} chunks)", identity, chunks));
        }
        if !report.empty.is_empty() {
            output.push_str(&format!("\nNo qualifying lines ({}):", report.empty.len()));
            for identity in &report.empty {
                output.push_str(&format!("\n  {}", identity));
            }
        }
        if !report.unreadable.is_empty() {
            output.push_str(&format!("\nUnreadable ({}):", report.unreadable.len()));
            for (identity, reason) in &report.unreadable {
                output.push_str(&format!("\n  {}: {}", identity, reason));
            }
        }
        if !report.failed.is_empty() {
            output.push_str(&format!("\nFailed ({}):", report.failed.len()));
            for (identity, reason) in &report.failed {
                output.push_str(&format!("\n  {}: {}", identity, reason));
            }
        }

        output
    }

    fn format_files(&self, files: &[IndexedFile], total_chunks: u64) -> String {
        if files.is_empty() {
            return "No files indexed.".to_string();
        }

        let mut output = format!("{} files, {} chunks\n", files.len(), total_chunks);
        output.push_str(&"-".repeat(60));
        for file in files {
            output.push_str(&format!("\n{}\n  {}", file.display_name(), file.identity()));
        }
        output
    }
}
