//! Structural predicates shared by term extraction and matching

use regex::{Regex, RegexBuilder};

/// Letters, digits and underscore glue onto a word
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `haystack[start..end]` stands as a whole word: no word character
/// directly before or after it.
///
/// Unlike a regex `\b`, this also accepts terms that begin or end with
/// punctuation such as "C++" or "C#".
pub fn is_whole_word_span(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Case-insensitive whole-word search for a literal term
pub struct WholeWordPattern {
    regex: Regex,
}

impl WholeWordPattern {
    /// Returns `None` for blank terms
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                log::debug!("Could not build pattern for term '{}': {}", term, e);
                None
            }
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex
            .find_iter(haystack)
            .any(|m| is_whole_word_span(haystack, m.start(), m.end()))
    }
}

/// Whole-word, case-insensitive occurrence of `term` anywhere in `haystack`
pub fn contains_whole_word(haystack: &str, term: &str) -> bool {
    WholeWordPattern::new(term).is_some_and(|p| p.is_match(haystack))
}
