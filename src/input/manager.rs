//! Input manager for loading candidate and reference documents

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// A loaded document: display name plus normalized text
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub name: String,
    pub text: String,
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Reading markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Pdf | FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "{} (convert the document to .txt or .md first)",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load a document, naming it after its file name
    pub async fn load_document(&mut self, path: &Path) -> Result<InputDocument> {
        let text = self.extract_text(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(InputDocument { name, text })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_and_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidate.txt");
        std::fs::write(&path, "Python\nAWS").unwrap();

        let mut manager = InputManager::new();
        let doc = manager.load_document(&path).await.unwrap();
        assert_eq!(doc.name, "candidate.txt");
        assert_eq!(doc.text, "Python AWS");
        assert_eq!(manager.cache_size(), 1);

        // Cached text survives the file changing on disk
        std::fs::write(&path, "changed").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Python AWS");

        manager.clear_cache();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_missing() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert!(matches!(
            manager.extract_text(&pdf).await,
            Err(ScreenerError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&dir.path().join("missing.txt")).await,
            Err(ScreenerError::InvalidInput(_))
        ));
        assert_eq!(manager.cache_size(), 0);
    }
}
