//! Embedding model management for downloading and resolving Model2Vec models

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use hf_hub::api::tokio::Api;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files `StaticModel::from_pretrained` needs in a local model directory
const REQUIRED_MODEL_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];

const OPTIONAL_MODEL_FILES: [&str; 1] = ["README.md"];

/// Preference order when picking a model automatically
const PREFERRED_MODELS: [&str; 3] = ["potion-base-8M", "m2v-base", "m2v-large"];

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub model_type: EmbeddingModelType,
    pub dimensions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingModelType {
    Model2Vec,
    Potion,
}

/// Built-in catalogue, keyed by model id
fn catalogue() -> Vec<(&'static str, EmbeddingModelInfo)> {
    vec![
        (
            "potion-base-8M",
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "Compact Model2Vec embeddings with 8M parameters".to_string(),
                model_type: EmbeddingModelType::Potion,
                dimensions: 256,
            },
        ),
        (
            "m2v-base",
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                description: "Model2Vec base embeddings distilled from bge-base".to_string(),
                model_type: EmbeddingModelType::Model2Vec,
                dimensions: 256,
            },
        ),
        (
            "m2v-large",
            EmbeddingModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                description: "Higher-capacity Model2Vec embeddings".to_string(),
                model_type: EmbeddingModelType::Model2Vec,
                dimensions: 512,
            },
        ),
    ]
}

/// Look up a catalogue entry by id, repo id or display name (case-insensitive)
fn find_in_catalogue(input: &str) -> Option<(&'static str, EmbeddingModelInfo)> {
    let input = input.trim();
    let input_lower = input.to_lowercase();
    catalogue().into_iter().find(|(id, info)| {
        id.to_lowercase() == input_lower
            || info.repo_id.to_lowercase() == input_lower
            || info.name.to_lowercase() == input_lower
    })
}

/// Whether a directory holds every file a Model2Vec model needs
pub fn has_model_files(path: &Path) -> bool {
    path.is_dir() && REQUIRED_MODEL_FILES.iter().all(|f| path.join(f).is_file())
}

/// Turn the configured model into something `StaticModel::from_pretrained`
/// can load: an existing local directory, a downloaded catalogue model, or
/// else a Hub repo id.
pub fn resolve_model_source(config: &Config) -> String {
    let requested = config.models.default_embedding_model.trim();

    if has_model_files(Path::new(requested)) {
        return requested.to_string();
    }

    if let Some((id, info)) = find_in_catalogue(requested) {
        let local = config.models_dir().join(id);
        if has_model_files(&local) {
            return local.display().to_string();
        }
        return info.repo_id;
    }

    let local = config.models_dir().join(requested);
    if has_model_files(&local) {
        return local.display().to_string();
    }

    requested.to_string()
}

/// Manager for embedding models: catalogue, download, scan and selection
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: HashMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
    api: Option<Api>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ScreenerError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: catalogue()
                .into_iter()
                .map(|(id, info)| (id.to_string(), info))
                .collect(),
            downloaded_models: HashSet::new(),
            api: None,
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    /// Re-read the models directory
    pub async fn scan_downloaded_models(&mut self) -> Result<()> {
        self.downloaded_models.clear();

        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ScreenerError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            ScreenerError::ModelError(format!("Failed to read directory entry: {}", e))
        })? {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| ScreenerError::ModelError(format!("Failed to get file type: {}", e)))?
                .is_dir();

            if is_dir && Self::is_valid_model_directory(&entry.path()).await {
                let model_name = entry.file_name().to_string_lossy().to_string();
                log::debug!("Found downloaded model: {}", model_name);
                self.downloaded_models.insert(model_name);
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in &REQUIRED_MODEL_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    fn api(&mut self) -> Result<&Api> {
        if self.api.is_none() {
            let api = Api::new()
                .map_err(|e| ScreenerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
            self.api = Some(api);
        }
        self.api
            .as_ref()
            .ok_or_else(|| ScreenerError::ModelError("HF API not initialized".to_string()))
    }

    /// Download a catalogue model from the Hugging Face Hub
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_id = self
            .resolve_model_id(model_id)
            .ok_or_else(|| ScreenerError::ModelNotFound(format!("Unknown embedding model: {}", model_id)))?;
        let model_info = self
            .available_models
            .get(&model_id)
            .cloned()
            .ok_or_else(|| ScreenerError::ModelNotFound(model_id.clone()))?;

        let model_dir = self.models_dir.join(&model_id);

        if self.downloaded_models.contains(&model_id) && !force {
            log::info!("Model {} already downloaded", model_id);
            return Ok(model_dir);
        }

        log::info!(
            "Downloading embedding model: {} ({} MB) from {}",
            model_info.name,
            model_info.size_mb,
            model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            ScreenerError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let repo = self.api()?.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        for file in REQUIRED_MODEL_FILES.iter().chain(OPTIONAL_MODEL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await.map_err(|e| {
                        ScreenerError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    log::info!("  downloaded {}", file);
                }
                Err(e) if OPTIONAL_MODEL_FILES.contains(file) => {
                    log::debug!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(ScreenerError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id.clone());
        log::info!("Embedding model {} downloaded", model_info.name);

        Ok(model_dir)
    }

    /// Delete a downloaded model directory
    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        let model_id = self.resolve_model_id(model_id).unwrap_or_else(|| model_id.to_string());

        if !self.downloaded_models.remove(&model_id) {
            return Err(ScreenerError::ModelNotFound(format!("Model {} is not downloaded", model_id)));
        }

        fs::remove_dir_all(self.models_dir.join(&model_id)).await?;
        log::info!("Removed model {}", model_id);
        Ok(())
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Catalogue entries, smallest first
    pub fn list_available_models(&self) -> Vec<(&str, &EmbeddingModelInfo)> {
        let mut models: Vec<_> = self
            .available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect();
        models.sort_by_key(|(_, info)| info.size_mb);
        models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    /// First downloaded model in preference order, else the compact default
    pub fn auto_select_model(&self) -> String {
        PREFERRED_MODELS
            .iter()
            .find(|id| self.downloaded_models.contains(**id))
            .unwrap_or(&PREFERRED_MODELS[0])
            .to_string()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.resolve_model_id(model_id)
            .and_then(|id| self.available_models.get(&id))
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model id from an id, repo id or display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        find_in_catalogue(input).map(|(id, _)| id.to_string())
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}
