//! Resume screener library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use processing::analyzer::{CandidateScore, ScreeningEngine};
pub use processing::embeddings::{SemanticScorer, TextEmbedder};
pub use processing::extractor::extract_terms;
pub use processing::lexical::lexical_similarity;
pub use processing::matcher::{match_terms, MatchReport};
pub use processing::scoring::final_score;
