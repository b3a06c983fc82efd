//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Text,
    Markdown,
    Pdf,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "pdf" => FileType::Pdf,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Only plain-text formats are read; binary documents must be converted first
    pub fn is_supported(&self) -> bool {
        matches!(self, FileType::Text | FileType::Markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(FileType::from_path(Path::new("resume.TXT")), FileType::Text);
        assert_eq!(FileType::from_path(Path::new("job.text")), FileType::Text);
        assert_eq!(FileType::from_path(Path::new("notes.md")), FileType::Markdown);
        assert_eq!(FileType::from_path(Path::new("cv.pdf")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);

        assert!(FileType::Markdown.is_supported());
        assert!(!FileType::Pdf.is_supported());
    }
}
