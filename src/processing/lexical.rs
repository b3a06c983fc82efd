//! Bag-of-words lexical similarity (TF-IDF + cosine)

use std::collections::{BTreeMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Common English stop words excluded from the TF-IDF vocabulary
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
    "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
    "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
    "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
    "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie",
    "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep",
    "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me",
    "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless",
    "next", "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per",
    "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming",
    "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere",
    "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that",
    "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// TF-IDF cosine similarity between two documents over their joint vocabulary
pub struct LexicalScorer {
    stop_words: HashSet<String>,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalScorer {
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Lowercased words of at least two characters, stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|w| w.to_lowercase())
            .filter(|w| w.chars().count() >= 2)
            .filter(|w| !self.stop_words.contains(w))
            .collect()
    }

    /// Cosine similarity of the smoothed TF-IDF vectors of `a` and `b`.
    ///
    /// Returns 0.0 when either text is blank or when the joint vocabulary is
    /// empty. Deterministic for fixed inputs.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }

        let tokens_a = self.tokenize(a);
        let tokens_b = self.tokenize(b);
        let counts_a = Self::term_counts(&tokens_a);
        let counts_b = Self::term_counts(&tokens_b);
        if counts_a.is_empty() || counts_b.is_empty() {
            return 0.0;
        }

        let (vec_a, vec_b) = Self::tfidf_vectors(&counts_a, &counts_b);

        let dot: f64 = vec_a.iter().zip(&vec_b).map(|(x, y)| x * y).sum();
        let norm_a = vec_a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = vec_b.iter().map(|x| x * x).sum::<f64>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        ((dot / (norm_a * norm_b)) as f32).clamp(0.0, 1.0)
    }

    fn term_counts(tokens: &[String]) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Weight vectors over the sorted joint vocabulary.
    /// idf = ln((1 + n) / (1 + df)) + 1 with n = 2 documents.
    fn tfidf_vectors(a: &BTreeMap<&str, usize>, b: &BTreeMap<&str, usize>) -> (Vec<f64>, Vec<f64>) {
        let vocabulary: std::collections::BTreeSet<&str> = a.keys().chain(b.keys()).copied().collect();
        let n_docs = 2.0_f64;

        let mut vec_a = Vec::with_capacity(vocabulary.len());
        let mut vec_b = Vec::with_capacity(vocabulary.len());

        for term in vocabulary {
            let tf_a = *a.get(term).unwrap_or(&0) as f64;
            let tf_b = *b.get(term).unwrap_or(&0) as f64;
            let df = (tf_a > 0.0) as u8 as f64 + (tf_b > 0.0) as u8 as f64;
            let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
            vec_a.push(tf_a * idf);
            vec_b.push(tf_b * idf);
        }

        (vec_a, vec_b)
    }
}

/// Lexical similarity with the default English stop words
pub fn lexical_similarity(text_a: &str, text_b: &str) -> f32 {
    LexicalScorer::new().similarity(text_a, text_b)
}
