//! Sentence embeddings for stored prompts and answers.
//!
//! The default [`OllamaEmbedder`] asks the inference server for vectors. With
//! the `local-embed` feature, [`FastEmbedder`] runs a small model in process
//! instead.

use labelist_config::OllamaSettings;
use labelist_core::{Result, ShellError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inference::OllamaClient;

/// Turns text into a vector.
pub trait Embedder {
    /// Embeds one piece of text.
    ///
    /// # Errors
    ///
    /// [`ShellError::Network`] for remote failures; local models report
    /// their failures under the same category.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embeddings from the Ollama `/api/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response: EmbeddingResponse = self.client.post_json("/api/embeddings", &request)?;
        if response.embedding.is_empty() {
            return Err(ShellError::Network(format!(
                "model {} returned an empty embedding",
                self.model
            )));
        }
        debug!(model = %self.model, dims = response.embedding.len(), "embedded text");
        Ok(response.embedding)
    }
}

/// In-process embeddings through fastembed.
#[cfg(feature = "local-embed")]
pub struct FastEmbedder {
    model: fastembed::TextEmbedding,
}

#[cfg(feature = "local-embed")]
impl FastEmbedder {
    /// Loads `AllMiniLML6V2`, downloading it into the user cache directory on
    /// first use.
    ///
    /// # Errors
    ///
    /// [`ShellError::Network`] if the model cannot be fetched or loaded.
    pub fn new() -> Result<Self> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        let cache_dir = dirs::cache_dir()
            .map(|p| p.join("labelist").join("models"))
            .unwrap_or_else(|| std::path::PathBuf::from(".labelist_models"));
        let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| ShellError::Network(format!("failed to load embedding model: {e}")))?;
        Ok(Self { model })
    }
}

#[cfg(feature = "local-embed")]
impl Embedder for FastEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .model
            .embed(vec![text], None)
            .map_err(|e| ShellError::Network(format!("embedding failed: {e}")))?;
        vectors
            .pop()
            .ok_or_else(|| ShellError::Network("embedding returned no vectors".to_string()))
    }
}

/// The embedder the binary uses: the in-process model.
///
/// # Errors
///
/// See [`FastEmbedder::new`].
#[cfg(feature = "local-embed")]
pub fn embedder_from_settings(_settings: &OllamaSettings) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(FastEmbedder::new()?))
}

/// The embedder the binary uses: the Ollama endpoint with the configured
/// embedding model.
///
/// # Errors
///
/// See [`OllamaClient::new`].
#[cfg(not(feature = "local-embed"))]
pub fn embedder_from_settings(settings: &OllamaSettings) -> Result<Box<dyn Embedder>> {
    let client = OllamaClient::from_settings(settings)?;
    Ok(Box::new(OllamaEmbedder::new(
        client,
        settings.embedding_model.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_prompt_field() {
        let body = serde_json::to_value(EmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "hello",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "nomic-embed-text", "prompt": "hello"})
        );
    }

    #[test]
    fn test_response_decodes_vector() {
        let parsed: EmbeddingResponse =
            serde_json::from_str(r#"{"embedding":[0.25,-1.0,3]}"#).unwrap();
        assert_eq!(parsed.embedding, vec![0.25, -1.0, 3.0]);
    }

    #[cfg(not(feature = "local-embed"))]
    #[test]
    fn test_unreachable_server_is_network_error() {
        let settings = OllamaSettings {
            endpoint: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..OllamaSettings::default()
        };
        let mut embedder = embedder_from_settings(&settings).unwrap();
        let err = embedder.embed("hello").unwrap_err();
        assert_eq!(err.category(), "NetworkError");
    }
}
