//! Abbreviation and expanded-form equivalence for technical terms

use crate::error::{Result, ScreenerError};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Built-in abbreviation table (abbreviation, expanded form)
const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("ML", "Machine Learning"),
    ("NLP", "Natural Language Processing"),
    ("DL", "Deep Learning"),
    ("CV", "Computer Vision"),
    ("DSA", "Data Structures and Algorithms"),
];

/// Immutable abbreviation -> expanded form table.
///
/// Each abbreviation maps to exactly one expanded form and each expanded form
/// belongs to exactly one abbreviation, so the reverse lookup is unambiguous.
/// Built once and shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone)]
pub struct NormalizationMap {
    entries: Vec<(String, String)>,
}

impl Default for NormalizationMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationMap {
    /// Create the map with the built-in abbreviations only
    pub fn new() -> Self {
        Self {
            entries: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(abbr, full)| (abbr.to_string(), full.to_string()))
                .collect(),
        }
    }

    /// Create the map with the built-in abbreviations plus user supplied pairs
    pub fn with_additional<I, A, F>(additional: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, F)>,
        A: AsRef<str>,
        F: AsRef<str>,
    {
        let mut map = Self::new();
        for (abbr, full) in additional {
            map.insert(abbr.as_ref(), full.as_ref())?;
        }
        Ok(map)
    }

    fn insert(&mut self, abbr: &str, full: &str) -> Result<()> {
        let abbr = abbr.trim();
        let full = full.trim();
        if abbr.is_empty() || full.is_empty() {
            return Err(ScreenerError::Configuration(
                "Abbreviation entries must not be empty".to_string(),
            ));
        }

        if let Some(existing) = self.expansion_of(abbr) {
            if existing.eq_ignore_ascii_case(full) {
                return Ok(());
            }
            return Err(ScreenerError::Configuration(format!(
                "Abbreviation '{}' already expands to '{}', cannot also expand to '{}'",
                abbr, existing, full
            )));
        }

        if let Some(owner) = self.abbreviation_of(abbr) {
            return Err(ScreenerError::Configuration(format!(
                "'{}' is already the expansion of '{}', cannot also be an abbreviation",
                abbr, owner
            )));
        }

        if let Some(owner) = self.abbreviation_of(full) {
            return Err(ScreenerError::Configuration(format!(
                "'{}' is already the expansion of '{}', cannot also belong to '{}'",
                full, owner, abbr
            )));
        }

        if let Some(expansion) = self.expansion_of(full) {
            return Err(ScreenerError::Configuration(format!(
                "'{}' is already an abbreviation of '{}', cannot also be an expansion",
                full, expansion
            )));
        }

        self.entries.push((abbr.to_string(), full.to_string()));
        Ok(())
    }

    /// Forward lookup: abbreviation -> expanded form (case-insensitive)
    pub fn expansion_of(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(abbr, _)| abbr.to_lowercase() == token.to_lowercase())
            .map(|(_, full)| full.as_str())
    }

    /// Reverse lookup: expanded form -> abbreviation, derived by scanning
    pub fn abbreviation_of(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(_, full)| full.to_lowercase() == token.to_lowercase())
            .map(|(abbr, _)| abbr.as_str())
    }

    /// Canonical abbreviation for a token that is either a known abbreviation
    /// or the expansion of one
    pub fn canonical_abbreviation(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(abbr, full)| {
                let lower = token.to_lowercase();
                abbr.to_lowercase() == lower || full.to_lowercase() == lower
            })
            .map(|(abbr, _)| abbr.as_str())
    }

    /// Equivalence class identifier of a token, case-folded.
    ///
    /// Abbreviations and their expansions share the abbreviation's class;
    /// anything else forms its own singleton class.
    pub fn class_key(&self, token: &str) -> String {
        match self.canonical_abbreviation(token) {
            Some(abbr) => abbr.to_lowercase(),
            None => token.trim().to_lowercase(),
        }
    }

    /// Whether two tokens belong to the same equivalence class
    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        self.class_key(a) == self.class_key(b)
    }

    /// All (abbreviation, expanded form) pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, f)| (a.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A skill or technology keyword as extracted from a document.
///
/// Equality, ordering and hashing use the case-folded key only, so "Python"
/// and "PYTHON" are the same term. Equivalence between an abbreviation and
/// its expansion is a separate, weaker relation exposed through
/// [`Term::class_key`].
#[derive(Debug, Clone)]
pub struct Term {
    surface: String,
    key: String,
    abbreviation: Option<String>,
}

impl Term {
    pub fn new(surface: &str, normalization: &NormalizationMap) -> Self {
        let surface = surface.trim().to_string();
        let key = surface.to_lowercase();
        let abbreviation = normalization
            .canonical_abbreviation(&surface)
            .map(|a| a.to_string());

        Self {
            surface,
            key,
            abbreviation,
        }
    }

    /// Form as it appeared in the source text
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Case-folded form used for equality
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical abbreviation when the term is an abbreviation or an expansion
    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    pub fn class_key(&self) -> String {
        match &self.abbreviation {
            Some(abbr) => abbr.to_lowercase(),
            None => self.key.clone(),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_forward_and_reverse_lookup() {
        let map = NormalizationMap::new();

        assert_eq!(map.expansion_of("ML"), Some("Machine Learning"));
        assert_eq!(map.expansion_of("nlp"), Some("Natural Language Processing"));
        assert_eq!(map.abbreviation_of("machine learning"), Some("ML"));
        assert_eq!(map.abbreviation_of("Python"), None);
    }

    #[test]
    fn test_class_keys() {
        let map = NormalizationMap::new();

        assert_eq!(map.class_key("ML"), "ml");
        assert_eq!(map.class_key("Machine Learning"), "ml");
        assert_eq!(map.class_key("MACHINE LEARNING"), "ml");
        assert_eq!(map.class_key("Kubernetes"), "kubernetes");

        assert!(map.are_equivalent("DL", "deep learning"));
        assert!(map.are_equivalent("Deep Learning", "dl"));
        assert!(!map.are_equivalent("DL", "Machine Learning"));
    }

    #[test]
    fn test_additional_entries() {
        let map = NormalizationMap::with_additional([("K8s", "Kubernetes")]).unwrap();
        assert_eq!(map.len(), DEFAULT_ABBREVIATIONS.len() + 1);
        assert!(map.are_equivalent("k8s", "Kubernetes"));

        // Repeating an existing pair is accepted
        let map = NormalizationMap::with_additional([("ml", "machine learning")]).unwrap();
        assert_eq!(map.len(), DEFAULT_ABBREVIATIONS.len());
    }

    #[test]
    fn test_conflicting_entries_rejected() {
        let conflict = NormalizationMap::with_additional([("ML", "Markup Language")]);
        assert!(matches!(conflict, Err(ScreenerError::Configuration(_))));

        let shared_expansion = NormalizationMap::with_additional([("MLearn", "Machine Learning")]);
        assert!(matches!(shared_expansion, Err(ScreenerError::Configuration(_))));

        let expansion_as_abbreviation = NormalizationMap::with_additional([("Machine Learning", "MLX")]);
        assert!(matches!(expansion_as_abbreviation, Err(ScreenerError::Configuration(_))));

        let abbreviation_as_expansion = NormalizationMap::with_additional([("MLE", "ml")]);
        assert!(matches!(abbreviation_as_expansion, Err(ScreenerError::Configuration(_))));

        let empty = NormalizationMap::with_additional([("", "Nothing")]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_term_equality_is_case_insensitive() {
        let map = NormalizationMap::new();
        let a = Term::new("Python", &map);
        let b = Term::new("PYTHON", &map);
        assert_eq!(a, b);

        let set: HashSet<Term> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_term_abbreviation() {
        let map = NormalizationMap::new();
        let full = Term::new("Natural Language Processing", &map);
        let short = Term::new("nlp", &map);

        assert_eq!(full.abbreviation(), Some("NLP"));
        assert_eq!(short.abbreviation(), Some("NLP"));
        assert_ne!(full, short);
        assert_eq!(full.class_key(), short.class_key());
        assert_eq!(Term::new("Rust", &map).abbreviation(), None);
    }
}
