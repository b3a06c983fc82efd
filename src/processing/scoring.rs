//! Weighted score fusion and per-candidate report assembly

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::processing::matcher::MatchReport;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.5;
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.2;
pub const DEFAULT_COVERAGE_WEIGHT: f32 = 0.2;
pub const DEFAULT_EXPERIENCE_WEIGHT: f32 = 0.1;

/// Experience signal used while experience analysis is not implemented
pub const EXPERIENCE_PLACEHOLDER_SCORE: f32 = 1.0;

pub const EXPERIENCE_PLACEHOLDER_NOTE: &str =
    "Experience analysis is not implemented; a constant placeholder score is used.";

const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub semantic: f32,
    pub lexical: f32,
    pub coverage: f32,
    pub experience: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: DEFAULT_SEMANTIC_WEIGHT,
            lexical: DEFAULT_LEXICAL_WEIGHT,
            coverage: DEFAULT_COVERAGE_WEIGHT,
            experience: DEFAULT_EXPERIENCE_WEIGHT,
        }
    }
}

impl ScoreWeights {
    fn as_array(&self) -> [f32; 4] {
        [self.semantic, self.lexical, self.coverage, self.experience]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().map(|w| *w as f64).sum()
    }

    /// Weights must be finite, non-negative and sum to 1.0
    pub fn validate(&self) -> Result<()> {
        if self.as_array().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScreenerError::Configuration(format!(
                "Score weights must be finite and non-negative: {:?}",
                self
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScreenerError::Configuration(format!(
                "Score weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        Ok(())
    }

    /// Weighted sum of the four signals, unclamped
    pub fn combine(&self, semantic: f32, lexical: f32, coverage: f32, experience: f32) -> f32 {
        let total = self.semantic as f64 * semantic as f64
            + self.lexical as f64 * lexical as f64
            + self.coverage as f64 * coverage as f64
            + self.experience as f64 * experience as f64;
        total as f32
    }
}

/// Final score with the default weights
pub fn final_score(semantic: f32, lexical: f32, coverage: f32, experience: f32) -> f32 {
    ScoreWeights::default().combine(semantic, lexical, coverage, experience)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAnalysis {
    pub score: f32,
    pub note: String,
}

impl ExperienceAnalysis {
    pub fn placeholder(score: f32) -> Self {
        Self {
            score,
            note: EXPERIENCE_PLACEHOLDER_NOTE.to_string(),
        }
    }
}

/// Structured breakdown attached to every scored candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub skills: MatchReport,
    pub experience: ExperienceAnalysis,
}

/// Raw signals of one comparison, before weighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub semantic: f32,
    pub lexical: f32,
    pub coverage: f32,
    pub experience: f32,
}

pub struct ScoreAggregator {
    weights: ScoreWeights,
    clamp_negative_semantic: bool,
    experience_placeholder: f32,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            clamp_negative_semantic: false,
            experience_placeholder: EXPERIENCE_PLACEHOLDER_SCORE,
        }
    }
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            ..Self::default()
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.scoring.weights())?
            .with_negative_semantic_clamped(config.scoring.clamp_negative_semantic)
            .with_experience_placeholder(config.scoring.experience_placeholder))
    }

    pub fn with_negative_semantic_clamped(mut self, clamp: bool) -> Self {
        self.clamp_negative_semantic = clamp;
        self
    }

    pub fn with_experience_placeholder(mut self, score: f32) -> Self {
        self.experience_placeholder = score;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn experience_score(&self) -> f32 {
        self.experience_placeholder
    }

    /// Semantic signal as it enters the weighted sum
    pub fn effective_semantic(&self, semantic: f32) -> f32 {
        if self.clamp_negative_semantic {
            semantic.max(0.0)
        } else {
            semantic
        }
    }

    pub fn final_score(&self, scores: &ComponentScores) -> f32 {
        self.weights.combine(
            self.effective_semantic(scores.semantic),
            scores.lexical,
            scores.coverage,
            scores.experience,
        )
    }

    pub fn assemble_report(&self, skills: MatchReport) -> CandidateReport {
        CandidateReport {
            skills,
            experience: ExperienceAnalysis::placeholder(self.experience_placeholder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(final_score(1.0, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(final_score(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_weighting() {
        assert!((final_score(1.0, 0.0, 0.0, 0.0) - 0.5).abs() < 1e-6);
        assert!((final_score(0.0, 1.0, 0.0, 0.0) - 0.2).abs() < 1e-6);
        assert!((final_score(0.0, 0.0, 1.0, 0.0) - 0.2).abs() < 1e-6);
        assert!((final_score(0.0, 0.0, 0.0, EXPERIENCE_PLACEHOLDER_SCORE) - 0.1).abs() < 1e-6);
        assert!((final_score(0.8, 0.4, 0.5, 1.0) - 0.68).abs() < 1e-6);
    }

    #[test]
    fn test_negative_semantic_not_clamped_by_default() {
        let score = final_score(-0.2, 0.0, 0.0, 0.0);
        assert!((score + 0.1).abs() < 1e-6);

        let aggregator = ScoreAggregator::default();
        let scores = ComponentScores { semantic: -0.2, lexical: 0.0, coverage: 0.0, experience: 0.0 };
        assert!(aggregator.final_score(&scores) < 0.0);
    }

    #[test]
    fn test_negative_semantic_clamped_when_enabled() {
        let aggregator = ScoreAggregator::default().with_negative_semantic_clamped(true);
        let scores = ComponentScores { semantic: -0.4, lexical: 0.5, coverage: 0.0, experience: 0.0 };
        assert!((aggregator.final_score(&scores) - 0.1).abs() < 1e-6);
        assert_eq!(aggregator.effective_semantic(0.3), 0.3);
    }

    #[test]
    fn test_weight_validation() {
        assert!(ScoreWeights::default().validate().is_ok());

        let too_heavy = ScoreWeights { semantic: 0.9, ..ScoreWeights::default() };
        assert!(ScoreAggregator::new(too_heavy).is_err());

        let negative = ScoreWeights { semantic: 0.7, lexical: -0.2, ..ScoreWeights::default() };
        assert!(negative.validate().is_err());

        let nan = ScoreWeights { semantic: f32::NAN, ..ScoreWeights::default() };
        assert!(nan.validate().is_err());

        let lexical_only = ScoreWeights { semantic: 0.0, lexical: 1.0, coverage: 0.0, experience: 0.0 };
        let aggregator = ScoreAggregator::new(lexical_only).unwrap();
        let scores = ComponentScores { semantic: 1.0, lexical: 0.25, coverage: 1.0, experience: 1.0 };
        assert_eq!(aggregator.final_score(&scores), 0.25);
    }

    #[test]
    fn test_report_carries_placeholder_note() {
        let aggregator = ScoreAggregator::default().with_experience_placeholder(0.5);
        let report = aggregator.assemble_report(MatchReport::empty());

        assert_eq!(report.experience.score, 0.5);
        assert_eq!(report.experience.note, EXPERIENCE_PLACEHOLDER_NOTE);
        assert_eq!(aggregator.experience_score(), 0.5);
        assert_eq!(report.skills.total_count, 0);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.scoring.clamp_negative_semantic = true;
        let aggregator = ScoreAggregator::from_config(&config).unwrap();
        assert_eq!(aggregator.effective_semantic(-1.0), 0.0);

        config.scoring.coverage_weight = 0.5;
        assert!(ScoreAggregator::from_config(&config).is_err());
    }
}
