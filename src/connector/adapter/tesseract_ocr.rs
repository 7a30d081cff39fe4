use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{OcrService, Recognition};
use crate::domain::DomainError;

/// OCR through the `tesseract` command-line tool in TSV mode.
///
/// Words are grouped back into lines; a line's confidence is the mean of its
/// word confidences scaled to `0.0..=1.0`.
pub struct TesseractOcr {
    binary: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Uses `TESSERACT_BIN` when set, otherwise `tesseract` on `PATH`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("TESSERACT_BIN").unwrap_or_else(|_| "tesseract".to_string()))
    }
}

#[async_trait]
impl OcrService for TesseractOcr {
    async fn recognize(&self, image: &Path) -> Result<Vec<Recognition>, DomainError> {
        let output = tokio::process::Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("tsv")
            .output()
            .await
            .map_err(|e| DomainError::unreadable(format!("failed to spawn {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::unreadable(format!(
                "{} failed (exit {:?}): {}",
                self.binary,
                output.status.code(),
                stderr.trim()
            )));
        }

        let recognitions = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        debug!("OCR found {} lines in {}", recognitions.len(), image.display());
        Ok(recognitions)
    }
}

/// Parses tesseract TSV output into one recognition per text line.
pub fn parse_tsv(tsv: &str) -> Vec<Recognition> {
    let mut lines: Vec<((u32, u32, u32, u32), Vec<String>, Vec<f32>)> = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let Ok(conf) = cols[10].parse::<f32>() else {
            continue;
        };
        let word = cols[11].trim();
        if conf < 0.0 || word.is_empty() {
            continue;
        }
        let key = (
            cols[1].parse().unwrap_or(0),
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );

        match lines.last_mut() {
            Some((last_key, words, confs)) if *last_key == key => {
                words.push(word.to_string());
                confs.push(conf);
            }
            _ => lines.push((key, vec![word.to_string()], vec![conf])),
        }
    }

    lines
        .into_iter()
        .map(|(_, words, confs)| {
            let mean = confs.iter().sum::<f32>() / confs.len() as f32;
            Recognition::new(words.join(" "), (mean / 100.0).clamp(0.0, 1.0))
        })
        .collect()
}
