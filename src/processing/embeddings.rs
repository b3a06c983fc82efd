//! Semantic similarity over Model2Vec sentence embeddings

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::processing::embedding_manager::resolve_model_source;
use anyhow::Context;
use model2vec_rs::model::StaticModel;
use std::sync::Mutex;
use std::time::Instant;

/// Frozen text-to-vector function used by the semantic scorer
pub trait TextEmbedder: Send {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

/// Static Model2Vec embeddings loaded from a local directory or the Hub
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn load(source: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", source);

        let model = StaticModel::from_pretrained(source, None, None, None)
            .with_context(|| format!("Failed to load model '{}'", source))?;

        log::info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: source.to_string(),
        })
    }
}

impl TextEmbedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(ScreenerError::Embedding("Model returned an empty embedding".to_string()));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

enum EmbedderState {
    Ready {
        embedder: Mutex<Box<dyn TextEmbedder>>,
        model_name: String,
    },
    Unavailable {
        reason: String,
    },
}

/// Cosine similarity of document embeddings.
///
/// The embedder is constructed once and shared; calls are serialized through
/// a mutex. When the embedder could not be loaded the scorer stays in an
/// unavailable state and every similarity is 0.0.
pub struct SemanticScorer {
    state: EmbedderState,
}

impl SemanticScorer {
    pub fn new(embedder: Box<dyn TextEmbedder>) -> Self {
        let model_name = embedder.model_name().to_string();
        Self {
            state: EmbedderState::Ready {
                embedder: Mutex::new(embedder),
                model_name,
            },
        }
    }

    /// A scorer without an embedder. Logs the reason once.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("Semantic scoring disabled: {}", reason);
        Self {
            state: EmbedderState::Unavailable { reason },
        }
    }

    /// Run a one-shot loader, falling back to the unavailable state on failure
    pub fn from_loader<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn TextEmbedder>>,
    {
        match loader() {
            Ok(embedder) => Self::new(embedder),
            Err(e) => Self::unavailable(e.to_string()),
        }
    }

    /// Load the configured Model2Vec model
    pub fn from_config(config: &Config) -> Self {
        let source = resolve_model_source(config);
        Self::from_loader(|| {
            let embedder = Model2VecEmbedder::load(&source)?;
            Ok(Box::new(embedder) as Box<dyn TextEmbedder>)
        })
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, EmbedderState::Ready { .. })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            EmbedderState::Unavailable { reason } => Some(reason),
            EmbedderState::Ready { .. } => None,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.state {
            EmbedderState::Ready { model_name, .. } => Some(model_name),
            EmbedderState::Unavailable { .. } => None,
        }
    }

    /// Cosine similarity of the embeddings of `a` and `b`, in [-1, 1].
    ///
    /// Returns 0.0 for blank input, an unavailable embedder, an embedding
    /// failure or a non-finite result.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }

        let embedder = match &self.state {
            EmbedderState::Ready { embedder, .. } => embedder,
            EmbedderState::Unavailable { .. } => return 0.0,
        };

        // Poisoning only means another caller panicked mid-inference
        let embedder = embedder.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let (vec_a, vec_b) = match (embedder.embed(a), embedder.embed(b)) {
            (Ok(vec_a), Ok(vec_b)) => (vec_a, vec_b),
            (Err(e), _) | (_, Err(e)) => {
                log::debug!("Embedding failed, semantic score set to 0.0: {}", e);
                return 0.0;
            }
        };
        drop(embedder);

        match cosine_similarity(&vec_a, &vec_b) {
            Ok(score) if score.is_finite() => score,
            Ok(score) => {
                log::debug!("Non-finite semantic score {}, using 0.0", score);
                0.0
            }
            Err(e) => {
                log::debug!("Semantic score unavailable: {}", e);
                0.0
            }
        }
    }
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Processing(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Bag of letters: a deterministic stand-in for a real model
    struct LetterEmbedder {
        calls: Arc<AtomicUsize>,
    }

    impl TextEmbedder for LetterEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut v = vec![0.0; 26];
            for c in text.to_ascii_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
                v[(c as u8 - b'a') as usize] += 1.0;
            }
            Ok(v)
        }

        fn model_name(&self) -> &str {
            "letters"
        }
    }

    struct FailingEmbedder;

    impl TextEmbedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(ScreenerError::Embedding("inference failed".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    /// Maps a text to a fixed direction by its first character
    struct SignEmbedder;

    impl TextEmbedder for SignEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(if text.starts_with('-') { vec![-1.0, 0.0] } else { vec![1.0, 0.0] })
        }

        fn model_name(&self) -> &str {
            "sign"
        }
    }

    fn letter_scorer() -> (SemanticScorer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let scorer = SemanticScorer::new(Box::new(LetterEmbedder { calls: calls.clone() }));
        (scorer, calls)
    }

    #[test]
    fn test_identical_texts() {
        let (scorer, _) = letter_scorer();
        let score = scorer.similarity("rust engineer", "rust engineer");
        assert!((score - 1.0).abs() < 1e-6);
        assert!(scorer.is_available());
        assert_eq!(scorer.model_name(), Some("letters"));
    }

    #[test]
    fn test_blank_input_skips_embedder() {
        let (scorer, calls) = letter_scorer();
        assert_eq!(scorer.similarity("", "python"), 0.0);
        assert_eq!(scorer.similarity("python", "  "), 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unavailable_returns_zero() {
        let scorer = SemanticScorer::unavailable("model directory missing");
        assert!(!scorer.is_available());
        assert_eq!(scorer.unavailable_reason(), Some("model directory missing"));
        assert_eq!(scorer.similarity("Python developer", "Python developer"), 0.0);
    }

    #[test]
    fn test_failed_loader_degrades() {
        let scorer = SemanticScorer::from_loader(|| Err(ScreenerError::ModelNotFound("potion".to_string())));
        assert!(!scorer.is_available());
        assert!(scorer.unavailable_reason().unwrap_or_default().contains("potion"));
        assert_eq!(scorer.similarity("a b c", "a b c"), 0.0);
    }

    #[test]
    fn test_embedding_failure_returns_zero() {
        let scorer = SemanticScorer::new(Box::new(FailingEmbedder));
        assert!(scorer.is_available());
        assert_eq!(scorer.similarity("Python", "Python"), 0.0);
    }

    #[test]
    fn test_negative_similarity_passes_through() {
        let scorer = SemanticScorer::new(Box::new(SignEmbedder));
        assert_eq!(scorer.similarity("-opposite", "same"), -1.0);
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_scorer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SemanticScorer>();

        let (scorer, calls) = letter_scorer();
        let scorer = Arc::new(scorer);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scorer = scorer.clone();
                std::thread::spawn(move || scorer.similarity("kafka streams", "kafka"))
            })
            .collect();

        let scores: Vec<f32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }
}
