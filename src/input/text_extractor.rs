//! Plain-text extraction with layout normalization

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Newlines, carriage returns and tabs each become one space
pub fn normalize_layout(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(normalize_layout(&content))
    }
}

/// Markdown source reduced to its text content
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(normalize_layout(&Self::markdown_to_text(&markdown_content)))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::with_capacity(markdown.len());

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item) => text.push('\n'),
                _ => {}
            }
        }

        text.trim_end().to_string()
    }
}
