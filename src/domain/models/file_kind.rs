use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the content extractor reads a file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Text,
    Pdf,
    Image,
    Unsupported,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "md" | "markdown" | "rst" | "csv" | "tsv" | "json" | "yaml" | "yml"
            | "toml" | "xml" | "html" | "htm" | "css" | "js" | "ts" | "tsx" | "jsx" | "py"
            | "rs" | "go" | "java" | "kt" | "swift" | "c" | "h" | "cpp" | "hpp" | "cs" | "rb"
            | "php" | "sh" | "sql" | "log" | "tex" => FileKind::Text,
            "pdf" => FileKind::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" | "heic" | "webp" => {
                FileKind::Image
            }
            _ => FileKind::Unsupported,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileKind::Unsupported)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Text => "text",
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_extension("md"), FileKind::Text);
        assert_eq!(FileKind::from_extension("RS"), FileKind::Text);
        assert_eq!(FileKind::from_extension("pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_extension("JPEG"), FileKind::Image);
        assert_eq!(FileKind::from_extension("docx"), FileKind::Unsupported);
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path(Path::new("notes/a.txt")), FileKind::Text);
        assert_eq!(FileKind::from_path(Path::new("scan.png")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), FileKind::Unsupported);
        assert!(!FileKind::from_path(Path::new("Makefile")).is_supported());
    }
}
