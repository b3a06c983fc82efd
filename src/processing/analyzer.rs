//! Screening engine: one reference document against many candidates

use crate::config::Config;
use crate::error::Result;
use crate::processing::embeddings::SemanticScorer;
use crate::processing::extractor::{TermExtractor, TermSet};
use crate::processing::lexical::LexicalScorer;
use crate::processing::matcher::TermMatcher;
use crate::processing::normalizer::NormalizationMap;
use crate::processing::scoring::{CandidateReport, ComponentScores, ScoreAggregator, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// A prepared reference document; its term set is extracted once
#[derive(Debug, Clone)]
pub struct Reference {
    text: String,
    terms: TermSet,
}

impl Reference {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn terms(&self) -> &TermSet {
        &self.terms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// 1-based position after ranking; 0 while unranked
    pub rank: usize,
    pub candidate: String,
    pub final_score: f32,
    pub semantic_score: f32,
    pub lexical_score: f32,
    pub coverage_ratio: f32,
    pub experience_score: f32,
    pub report: CandidateReport,
}

/// Coordinates extraction, matching and the three similarity signals
pub struct ScreeningEngine {
    extractor: TermExtractor,
    matcher: TermMatcher,
    lexical: LexicalScorer,
    semantic: Arc<SemanticScorer>,
    aggregator: ScoreAggregator,
}

impl ScreeningEngine {
    /// Build the engine from configuration around an already-loaded semantic scorer
    pub fn new(config: &Config, semantic: Arc<SemanticScorer>) -> Result<Self> {
        let normalization = Arc::new(NormalizationMap::with_additional(
            config.terms.extra_abbreviations.iter(),
        )?);

        let extractor = TermExtractor::with_options(
            normalization.clone(),
            &config.terms.extra_vocabulary,
            &config.terms.extra_stopwords,
        )?;

        Ok(Self {
            extractor,
            matcher: TermMatcher::new(normalization),
            lexical: LexicalScorer::new(),
            semantic,
            aggregator: ScoreAggregator::from_config(config)?,
        })
    }

    pub fn prepare(&self, reference_text: &str) -> Reference {
        let terms = self.extractor.extract(reference_text);
        log::info!("Reference document yields {} required terms", terms.len());
        Reference {
            text: reference_text.to_string(),
            terms,
        }
    }

    /// Score one candidate text against a prepared reference
    pub fn score_candidate(&self, reference: &Reference, name: &str, candidate_text: &str) -> CandidateScore {
        let start_time = Instant::now();

        let skills = self.matcher.match_term_set(&reference.terms, candidate_text);
        let scores = ComponentScores {
            semantic: self.semantic.similarity(&reference.text, candidate_text),
            lexical: self.lexical.similarity(&reference.text, candidate_text),
            coverage: skills.coverage_ratio,
            experience: self.aggregator.experience_score(),
        };
        let final_score = self.aggregator.final_score(&scores);

        log::debug!(
            "{}: final {:.4} (semantic {:.4}, lexical {:.4}, coverage {:.4}) in {:.2?}",
            name,
            final_score,
            scores.semantic,
            scores.lexical,
            scores.coverage,
            start_time.elapsed()
        );

        CandidateScore {
            rank: 0,
            candidate: name.to_string(),
            final_score,
            semantic_score: scores.semantic,
            lexical_score: scores.lexical,
            coverage_ratio: scores.coverage,
            experience_score: scores.experience,
            report: self.aggregator.assemble_report(skills),
        }
    }

    /// Score all candidates in input order and rank them
    pub fn screen<I, N, T>(&self, reference_text: &str, candidates: I) -> Vec<CandidateScore>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let reference = self.prepare(reference_text);
        self.screen_with_progress(&reference, candidates, |_| {})
    }

    /// Score all candidates against a prepared reference, calling `on_scored`
    /// after each one, then rank them
    pub fn screen_with_progress<I, N, T, F>(
        &self,
        reference: &Reference,
        candidates: I,
        mut on_scored: F,
    ) -> Vec<CandidateScore>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
        F: FnMut(&CandidateScore),
    {
        let scored = candidates
            .into_iter()
            .map(|(name, text)| {
                let score = self.score_candidate(reference, name.as_ref(), text.as_ref());
                on_scored(&score);
                score
            })
            .collect();

        rank_candidates(scored)
    }

    pub fn extractor(&self) -> &TermExtractor {
        &self.extractor
    }

    pub fn semantic(&self) -> &SemanticScorer {
        &self.semantic
    }

    pub fn weights(&self) -> &ScoreWeights {
        self.aggregator.weights()
    }
}

/// Sort by final score, highest first, keeping input order on ties, and
/// number the result from 1
pub fn rank_candidates(mut candidates: Vec<CandidateScore>) -> Vec<CandidateScore> {
    candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = i + 1;
    }
    candidates
}
