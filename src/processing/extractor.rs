//! Skill and technology term extraction from free text

use crate::error::{Result, ScreenerError};
use crate::processing::normalizer::{NormalizationMap, Term};
use crate::processing::predicates::is_whole_word_span;
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Heuristic matches shorter than this (in characters) are dropped
pub const MIN_HEURISTIC_TERM_LENGTH: usize = 3;

/// Acronym-shaped tokens: "AWS", "MLOps", "CI/CD"
const ACRONYM_PATTERN: &str = r"[A-Z]{2,}[a-z]+|[A-Z]{2,}(?:/[A-Z]{2,})?";

/// Curated vocabulary of languages, frameworks, platforms and methodologies
const DEFAULT_VOCABULARY: &[&str] = &[
    // Languages
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Rust", "Ruby",
    "Kotlin", "Scala", "PHP", "SQL",
    // Machine learning
    "TensorFlow", "PyTorch", "scikit-learn", "Keras", "Pandas", "NumPy",
    "BERT", "RoBERTa", "TF-IDF", "Hugging Face", "MLOps", "SageMaker",
    // Web and backend
    "React", "Angular", "Vue", "Node.js", "Django", "Flask", "FastAPI", "GraphQL",
    // Data stores and pipelines
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Kafka", "Spark", "Hadoop", "Airflow",
    // Cloud and infrastructure
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Linux", "Git",
    "Jenkins", "CI/CD",
    // Methodologies
    "Agile", "Scrum",
];

/// Generic words that look acronym-shaped in postings but are not skills
const DEFAULT_STOPLIST: &[&str] = &[
    "model", "deep", "data", "software", "engineer", "developer", "systems", "design",
    "testing",
    // all-caps section headings
    "about", "requirements", "required", "responsibilities", "qualifications", "skills",
    "experience", "education", "summary", "objective", "profile", "benefits", "role",
    "job", "team", "and", "the", "with", "for", "you", "our", "must", "plus", "preferred",
    "senior", "junior", "lead", "years", "remote", "contact", "references", "projects",
];

/// Deduplicated set of extracted terms, ordered by case-folded key
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    terms: Vec<Term>,
}

impl TermSet {
    /// Build a set from surface forms; the first spelling of each term wins
    pub fn from_surfaces<I, S>(surfaces: I, normalization: &NormalizationMap) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for surface in surfaces {
            let surface = surface.as_ref().trim();
            if surface.is_empty() {
                continue;
            }
            let term = Term::new(surface, normalization);
            if seen.insert(term.key().to_string()) {
                terms.push(term);
            }
        }

        terms.sort();
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn surface_forms(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.surface().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Extracts candidate skill terms with a fixed vocabulary plus an
/// acronym-shape heuristic filtered by a stoplist
pub struct TermExtractor {
    vocabulary_matcher: AhoCorasick,
    vocabulary: Vec<String>,
    acronym_regex: Regex,
    stoplist: HashSet<String>,
    normalization: Arc<NormalizationMap>,
}

impl TermExtractor {
    /// Create an extractor with the built-in vocabulary, stoplist and abbreviations
    pub fn new() -> Result<Self> {
        Self::with_options(Arc::new(NormalizationMap::new()), &[], &[])
    }

    /// Create an extractor with additional vocabulary entries and stopwords.
    ///
    /// Every abbreviation of the normalization map and its expanded form are
    /// added to the vocabulary.
    pub fn with_options(
        normalization: Arc<NormalizationMap>,
        extra_vocabulary: &[String],
        extra_stopwords: &[String],
    ) -> Result<Self> {
        let mut vocabulary: Vec<String> = DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect();
        for (abbr, full) in normalization.entries() {
            vocabulary.push(abbr.to_string());
            vocabulary.push(full.to_string());
        }
        vocabulary.extend(
            extra_vocabulary
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );

        let mut seen = HashSet::new();
        vocabulary.retain(|term| seen.insert(term.to_lowercase()));

        let vocabulary_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&vocabulary)
            .map_err(|e| ScreenerError::Processing(format!("Failed to build vocabulary matcher: {}", e)))?;

        let acronym_regex = Regex::new(ACRONYM_PATTERN)
            .map_err(|e| ScreenerError::Processing(format!("Invalid acronym pattern: {}", e)))?;

        let stoplist = DEFAULT_STOPLIST
            .iter()
            .map(|s| s.to_string())
            .chain(extra_stopwords.iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            vocabulary_matcher,
            vocabulary,
            acronym_regex,
            stoplist,
            normalization,
        })
    }

    /// Extract the term set of a document. Empty text yields an empty set.
    pub fn extract(&self, text: &str) -> TermSet {
        if text.trim().is_empty() {
            return TermSet::default();
        }

        let mut candidates: Vec<(usize, &str)> = Vec::new();

        for mat in self.vocabulary_matcher.find_overlapping_iter(text) {
            if is_whole_word_span(text, mat.start(), mat.end()) {
                candidates.push((mat.start(), &text[mat.start()..mat.end()]));
            }
        }

        for mat in self.acronym_regex.find_iter(text) {
            if self.is_skill_like(text, mat.start(), mat.end()) {
                candidates.push((mat.start(), mat.as_str()));
            }
        }

        // Earliest occurrence decides the retained spelling
        candidates.sort_by_key(|(start, _)| *start);

        let terms = TermSet::from_surfaces(candidates.into_iter().map(|(_, s)| s), &self.normalization);
        log::debug!("Extracted {} terms", terms.len());
        terms
    }

    /// Acronym-shape policy: a whole word, long enough, not a stopword
    fn is_skill_like(&self, text: &str, start: usize, end: usize) -> bool {
        let token = &text[start..end];
        is_whole_word_span(text, start, end)
            && token.chars().count() >= MIN_HEURISTIC_TERM_LENGTH
            && !self.stoplist.contains(&token.to_lowercase())
    }

    pub fn normalization(&self) -> &Arc<NormalizationMap> {
        &self.normalization
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stoplist.contains(&token.trim().to_lowercase())
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to create default term extractor")
    }
}

/// Extract the surface forms of all terms in `text` with the built-in tables
pub fn extract_terms(text: &str) -> Vec<String> {
    TermExtractor::default().extract(text).surface_forms()
}
