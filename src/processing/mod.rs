//! Term extraction, matching and scoring

pub mod normalizer;
pub mod predicates;
pub mod extractor;
pub mod matcher;
pub mod lexical;
pub mod embeddings;
pub mod embedding_manager;
pub mod scoring;
pub mod analyzer;
