//! HTTP client for the Ollama API

use crate::config::Config;
use crate::error::{FiloError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);
const TAGS_TIMEOUT: Duration = Duration::from_secs(10);
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    embedding_model: String,
    temperature: f64,
}

impl OllamaClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Probe the service; any transport failure or non-2xx counts as down
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .http_client
            .get(&url)
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("availability probe failed: {}", e);
                false
            }
        }
    }

    /// List installed model names
    pub async fn list_models(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct TagsResponse {
            #[serde(default)]
            models: Vec<ModelTag>,
        }

        #[derive(Deserialize)]
        struct ModelTag {
            name: String,
        }

        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FiloError::Llm(format!(
                "model catalog request failed with HTTP {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check whether a model is installed
    pub async fn has_model(&self, model: &str) -> bool {
        match self.list_models().await {
            Ok(models) => models.iter().any(|m| m == model),
            Err(_) => false,
        }
    }

    /// Send a chat request, optionally forcing JSON output
    pub async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            stream: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            format: Option<&'a str>,
            options: ChatOptions,
        }

        #[derive(Serialize)]
        struct ChatOptions {
            temperature: f64,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: json_mode.then_some("json"),
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .timeout(CHAT_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FiloError::Llm(format!(
                "chat request failed (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.message.content)
    }

    /// Get the embedding for a text from the embeddings endpoint
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            #[serde(default)]
            embedding: Vec<f64>,
        }

        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .timeout(EMBED_TIMEOUT)
            .json(&EmbedRequest {
                model: &self.embedding_model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FiloError::Llm(format!(
                "embedding request failed with HTTP {}",
                response.status()
            )));
        }

        let embed_response: EmbedResponse = response.json().await?;
        Ok(embed_response.embedding)
    }
}
