use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::application::{ContentExtractor, IndexWriter};
use crate::domain::{chunk_text, DomainError, FileKind, IndexedFile};

/// Outcome of one indexing batch. Failures of individual files never abort
/// the batch; they are collected here instead.
#[derive(Debug, Default)]
pub struct IndexReport {
    /// `(identity, chunk count)` for every file committed with content.
    pub indexed: Vec<(String, usize)>,
    /// Files that were read but had no line long enough to keep. Any prior
    /// entry for them has been removed.
    pub empty: Vec<String>,
    /// Files that could not be read, with the reason. Any prior entry for
    /// them has been removed.
    pub unreadable: Vec<(String, String)>,
    /// Files that were read but could not be written to the index.
    pub failed: Vec<(String, String)>,
}

impl IndexReport {
    pub fn total_chunks(&self) -> usize {
        self.indexed.iter().map(|(_, n)| n).sum()
    }
}

enum FileOutcome {
    Indexed(String, usize),
    Empty(String),
    Unreadable(String, String),
    Failed(String, String),
}

/// Canonical identity for a file locator. Falls back to the path as given
/// when it cannot be canonicalized (e.g. it no longer exists).
pub fn canonical_identity(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub struct IndexFilesUseCase {
    extractor: Arc<dyn ContentExtractor>,
    writer: IndexWriter,
    jobs: usize,
}

impl IndexFilesUseCase {
    pub fn new(extractor: Arc<dyn ContentExtractor>, writer: IndexWriter, jobs: usize) -> Self {
        Self {
            extractor,
            writer,
            jobs: jobs.max(1),
        }
    }

    /// Indexes every given file, walking directories for supported types.
    ///
    /// Extraction and chunking run up to `jobs` files at a time; commits go
    /// through the single [`IndexWriter`].
    pub async fn execute(&self, paths: &[PathBuf]) -> Result<IndexReport, DomainError> {
        let start_time = Instant::now();
        let files = collect_files(paths)?;
        let total_files = files.len() as u64;
        info!("Found {} files to index", total_files);

        let progress_bar = ProgressBar::new(total_files);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .map_err(|e| DomainError::internal(format!("Invalid progress bar template: {}", e)))?
                .progress_chars("#>-"),
        );

        let outcomes: Vec<FileOutcome> = stream::iter(files)
            .map(|path| {
                let progress_bar = progress_bar.clone();
                async move {
                    let outcome = self.index_one(&path).await;
                    progress_bar.set_message(display_name(&path));
                    progress_bar.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.jobs)
            .collect()
            .await;

        progress_bar.finish_with_message("done");

        let mut report = IndexReport::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Indexed(identity, n) => report.indexed.push((identity, n)),
                FileOutcome::Empty(identity) => report.empty.push(identity),
                FileOutcome::Unreadable(identity, reason) => report.unreadable.push((identity, reason)),
                FileOutcome::Failed(identity, reason) => report.failed.push((identity, reason)),
            }
        }
        report.indexed.sort();
        report.empty.sort();
        report.unreadable.sort();
        report.failed.sort();

        info!(
            "Indexed {} files ({} chunks) in {:.2}s, {} empty, {} unreadable, {} failed",
            report.indexed.len(),
            report.total_chunks(),
            start_time.elapsed().as_secs_f64(),
            report.empty.len(),
            report.unreadable.len(),
            report.failed.len()
        );

        Ok(report)
    }

    async fn index_one(&self, path: &Path) -> FileOutcome {
        let identity = canonical_identity(path);
        let name = display_name(path);
        debug!("Processing file: {}", identity);

        let (content, chunks) = match self.extractor.extract(path).await {
            Ok(content) => {
                let chunks = chunk_text(&content);
                (content, chunks)
            }
            Err(e) => {
                warn!("Skipping {}: {}", identity, e);
                // An empty replacement drops whatever was indexed before.
                let file = IndexedFile::new(identity.clone(), name, "");
                if let Err(commit_err) = self.writer.reindex(file, Vec::new()).await {
                    warn!("Failed to clear stale entry for {}: {}", identity, commit_err);
                }
                return FileOutcome::Unreadable(identity, e.to_string());
            }
        };

        let chunk_count = chunks.len();
        let file = IndexedFile::new(identity.clone(), name, &content);
        match self.writer.reindex(file, chunks).await {
            Ok(()) if chunk_count == 0 => {
                debug!("{} has no qualifying lines", identity);
                FileOutcome::Empty(identity)
            }
            Ok(()) => FileOutcome::Indexed(identity, chunk_count),
            Err(e) => {
                warn!("Failed to persist {}: {}", identity, e);
                FileOutcome::Failed(identity, e.to_string())
            }
        }
    }

    /// Drops a file and its chunks from the index.
    pub async fn remove(&self, path: &Path) -> Result<bool, DomainError> {
        let identity = canonical_identity(path);
        let removed = self.writer.remove(identity.clone()).await?;
        if removed {
            info!("Removed {} from the index", identity);
        } else {
            debug!("{} was not indexed", identity);
        }
        Ok(removed)
    }
}

fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DomainError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let walked = WalkBuilder::new(path)
                .hidden(true)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .build()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter(|entry| FileKind::from_path(entry.path()).is_supported())
                .map(|entry| entry.into_path());
            files.extend(walked);
        } else if path.is_file() {
            // Explicitly named files go through even when unsupported so the
            // report says why they were skipped.
            files.push(path.clone());
        } else {
            return Err(DomainError::invalid_input(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
