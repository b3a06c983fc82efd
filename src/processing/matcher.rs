//! Required-term matching with abbreviation equivalence

use crate::processing::extractor::TermSet;
use crate::processing::normalizer::NormalizationMap;
use crate::processing::predicates::contains_whole_word;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Coverage of required terms in a candidate document.
///
/// `matched` and `missing` hold one representative per equivalence class,
/// spelled as in the reference document, and never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub matched_count: usize,
    pub total_count: usize,
    pub coverage_ratio: f32,
}

impl MatchReport {
    pub fn empty() -> Self {
        Self {
            matched: Vec::new(),
            missing: Vec::new(),
            matched_count: 0,
            total_count: 0,
            coverage_ratio: 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.missing.is_empty()
    }
}

/// One equivalence class of required terms
struct RequirementClass {
    key: String,
    representative: String,
    found: bool,
}

pub struct TermMatcher {
    normalization: Arc<NormalizationMap>,
}

impl Default for TermMatcher {
    fn default() -> Self {
        Self::new(Arc::new(NormalizationMap::new()))
    }
}

impl TermMatcher {
    pub fn new(normalization: Arc<NormalizationMap>) -> Self {
        Self { normalization }
    }

    /// Whether a required term is present in the candidate text, either
    /// verbatim or through its abbreviation / expanded form
    pub fn is_present(&self, term: &str, candidate_text: &str) -> bool {
        if contains_whole_word(candidate_text, term) {
            return true;
        }

        if let Some(full) = self.normalization.expansion_of(term) {
            if contains_whole_word(candidate_text, full) {
                return true;
            }
        }

        if let Some(abbr) = self.normalization.abbreviation_of(term) {
            if contains_whole_word(candidate_text, abbr) {
                return true;
            }
        }

        false
    }

    /// Match required terms against the candidate text.
    ///
    /// Terms sharing an equivalence class count once; the first spelling in
    /// `required` represents the class. An empty requirement list yields a
    /// coverage ratio of 0.0.
    pub fn match_terms<I, S>(&self, required: I, candidate_text: &str) -> MatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<RequirementClass> = Vec::new();

        for term in required {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }

            let key = self.normalization.class_key(term);
            match classes.iter_mut().find(|c| c.key == key) {
                Some(class) => {
                    if !class.found && self.is_present(term, candidate_text) {
                        class.found = true;
                    }
                }
                None => classes.push(RequirementClass {
                    found: self.is_present(term, candidate_text),
                    key,
                    representative: term.to_string(),
                }),
            }
        }

        let total_count = classes.len();
        let (found, not_found): (Vec<_>, Vec<_>) = classes.into_iter().partition(|c| c.found);

        let matched = Self::sorted_representatives(found);
        let missing = Self::sorted_representatives(not_found);
        let matched_count = matched.len();

        let coverage_ratio = if total_count == 0 {
            0.0
        } else {
            matched_count as f32 / total_count as f32
        };

        log::debug!(
            "Matched {}/{} required terms (coverage {:.2})",
            matched_count,
            total_count,
            coverage_ratio
        );

        MatchReport {
            matched,
            missing,
            matched_count,
            total_count,
            coverage_ratio,
        }
    }

    /// Match an extracted term set against the candidate text
    pub fn match_term_set(&self, required: &TermSet, candidate_text: &str) -> MatchReport {
        self.match_terms(required.iter().map(|t| t.surface()), candidate_text)
    }

    fn sorted_representatives(classes: Vec<RequirementClass>) -> Vec<String> {
        let mut terms: Vec<String> = classes.into_iter().map(|c| c.representative).collect();
        terms.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        terms
    }
}

/// Match required terms against candidate text with the built-in abbreviations
pub fn match_terms<S: AsRef<str>>(required: &[S], candidate_text: &str) -> MatchReport {
    TermMatcher::default().match_terms(required, candidate_text)
}
