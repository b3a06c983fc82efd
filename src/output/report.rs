//! Report structures for a screening run

use crate::processing::analyzer::CandidateScore;
use crate::processing::scoring::ScoreWeights;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ranked result of screening candidates against one reference document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: DateTime<Utc>,

    /// Name of the reference (job description) document
    pub reference: String,

    /// Terms extracted from the reference, in term-set order
    pub reference_terms: Vec<String>,

    /// False when the embedding model could not be loaded
    pub semantic_available: bool,
    pub semantic_model: Option<String>,

    pub weights: ScoreWeights,

    /// Candidates ranked by final score, best first
    pub candidates: Vec<CandidateScore>,
}

impl ScreeningReport {
    pub fn new(
        reference: impl Into<String>,
        reference_terms: Vec<String>,
        semantic_model: Option<String>,
        weights: ScoreWeights,
        candidates: Vec<CandidateScore>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            reference: reference.into(),
            reference_terms,
            semantic_available: semantic_model.is_some(),
            semantic_model,
            weights,
            candidates,
        }
    }

    pub fn top_candidate(&self) -> Option<&CandidateScore> {
        self.candidates.first()
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.candidates.is_empty() {
            return None;
        }
        let total: f64 = self.candidates.iter().map(|c| c.final_score as f64).sum();
        Some((total / self.candidates.len() as f64) as f32)
    }
}

/// Qualitative band of a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    Excellent,
    Strong,
    Moderate,
    Weak,
    Poor,
}

impl MatchLevel {
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s >= 0.85 => MatchLevel::Excellent,
            s if s >= 0.70 => MatchLevel::Strong,
            s if s >= 0.50 => MatchLevel::Moderate,
            s if s >= 0.30 => MatchLevel::Weak,
            _ => MatchLevel::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Excellent => "EXCELLENT",
            MatchLevel::Strong => "STRONG",
            MatchLevel::Moderate => "MODERATE",
            MatchLevel::Weak => "WEAK",
            MatchLevel::Poor => "POOR",
        }
    }
}
