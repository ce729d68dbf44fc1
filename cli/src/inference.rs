//! Text generation against an Ollama server.

use std::time::Duration;

use labelist_config::OllamaSettings;
use labelist_core::{Result, ShellError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampling options sent with a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f64,
    pub top_p: f64,
}

impl From<&OllamaSettings> for GenerateOptions {
    fn from(settings: &OllamaSettings) -> Self {
        Self {
            temperature: settings.temperature,
            top_p: settings.top_p,
        }
    }
}

/// Something that turns a prompt into an answer.
pub trait InferenceClient {
    /// Generates a complete (non-streamed) answer.
    ///
    /// # Errors
    ///
    /// [`ShellError::Network`] when the server cannot be reached or answers
    /// with an error.
    fn generate(&self, model: &str, prompt: &str, options: &GenerateOptions) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: &'a GenerateOptions,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking HTTP client for the Ollama API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl OllamaClient {
    /// Creates a client for `endpoint` (for example `http://localhost:11434`)
    /// whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`ShellError::Network`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("labelist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShellError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the `ollama` settings section.
    ///
    /// # Errors
    ///
    /// See [`OllamaClient::new`].
    pub fn from_settings(settings: &OllamaSettings) -> Result<Self> {
        Self::new(&settings.endpoint, Duration::from_secs(settings.timeout_secs))
    }

    /// Full URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    pub(crate) fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "sending request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| ShellError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(ShellError::Network(format!(
                "HTTP {status} from {url}: {}",
                detail.trim()
            )));
        }

        response
            .json()
            .map_err(|e| ShellError::Network(format!("unreadable response from {url}: {e}")))
    }
}

impl InferenceClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            options,
            stream: false,
        };
        let response: GenerateResponse = self.post_json("/api/generate", &request)?;
        debug!(model, chars = response.response.len(), "generated answer");
        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = OllamaClient::new("http://localhost:11434/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/api/generate"), "http://localhost:11434/api/generate");
        assert_eq!(client.url("api/embeddings"), "http://localhost:11434/api/embeddings");
    }

    #[test]
    fn test_generate_request_body() {
        let options = GenerateOptions::from(&OllamaSettings::default());
        let body = serde_json::to_value(GenerateRequest {
            model: "llama3.2:3b",
            prompt: "Why is the sky blue?",
            options: &options,
            stream: false,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "llama3.2:3b",
                "prompt": "Why is the sky blue?",
                "options": {"temperature": 0.0, "top_p": 0.9},
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"model":"m","response":"Rayleigh scattering.","done":true,"eval_count":7}"#,
        )
        .unwrap();
        assert_eq!(parsed.response, "Rayleigh scattering.");
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let client = OllamaClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client
            .generate("m", "p", &GenerateOptions::from(&OllamaSettings::default()))
            .unwrap_err();
        assert_eq!(err.category(), "NetworkError");
        assert!(err.to_string().contains("/api/generate"));
    }
}
