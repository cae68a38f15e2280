use secrecy::SecretString;
use tracing::debug;
use url::Url;

use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::error::Error;
use crate::http::{handle_response, join_segments};
use crate::transport::TransportConfig;

/// Default generative API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Default model used for single-turn questions.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Async client for single-turn `generateContent` calls.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: Url,
    model: String,
    generation: GenerationConfig,
}

impl AssistantClient {
    pub fn new(
        base_url: &str,
        api_key: &SecretString,
        model: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = crate::auth::api_key_headers(API_KEY_HEADER, api_key)?;
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            model: model.into(),
            generation: GenerationConfig::default(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages the key header).
    pub fn with_client(http: reqwest::Client, base_url: Url, model: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            model: model.into(),
            generation: GenerationConfig::default(),
        }
    }

    /// Override sampling settings.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user turn under `system_instruction` and return the reply text.
    ///
    /// A successful response without any text is [`Error::EmptyResponse`].
    pub async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String, Error> {
        let url = join_segments(
            &self.base_url,
            &["v1beta", "models", &format!("{}:generateContent", self.model)],
        )?;
        debug!(model = %self.model, "POST {url}");

        let body = GenerateContentRequest {
            system_instruction: Content::text(None, system_instruction),
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: self.generation.clone(),
        };

        let resp = self.http.post(url).json(&body).send().await?;
        let parsed: GenerateContentResponse = handle_response(resp).await?;
        parsed.text().ok_or(Error::EmptyResponse("assistant"))
    }
}
