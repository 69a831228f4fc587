//! OpenAI-compatible completion backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, warn};

use reelnotes_core::{defaults, Error, GenerationBackend, Result};

use super::error::{ErrorEnvelope, FailureKind};
use super::types::{ChatReply, ChatRequest, OutgoingMessage, Role};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens in the reply.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::COMPLETION_URL.to_string(),
            api_key: None,
            gen_model: defaults::GEN_MODEL.to_string(),
            temperature: defaults::GEN_TEMPERATURE,
            max_tokens: defaults::GEN_MAX_TOKENS,
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl OpenAIConfig {
    /// Read configuration from `GROQ_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: std::env::var("GROQ_BASE_URL").unwrap_or(base.base_url),
            api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            gen_model: std::env::var("GROQ_MODEL").unwrap_or(base.gen_model),
            temperature: env_parse("GROQ_TEMPERATURE").unwrap_or(base.temperature),
            max_tokens: env_parse("GROQ_MAX_TOKENS").unwrap_or(base.max_tokens),
            timeout_seconds: env_parse("GROQ_TIMEOUT").unwrap_or(base.timeout_seconds),
            skip_tls_verify: std::env::var("GROQ_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Generation backend for any OpenAI-compatible chat completions endpoint.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            model = %config.gen_model,
            has_api_key = config.api_key.is_some(),
            "Initializing completion backend"
        );

        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Build from `GROQ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the bearer token when one is configured.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn chat_request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        let system = (!system.is_empty()).then_some(OutgoingMessage {
            role: Role::System,
            content: system,
        });
        let user = OutgoingMessage {
            role: Role::User,
            content: prompt,
        };

        ChatRequest {
            model: &self.config.gen_model,
            messages: system.into_iter().chain(std::iter::once(user)).collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }

    /// Turn a non-2xx reply into an error, logging what the endpoint said.
    async fn failure(&self, response: Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let envelope = ErrorEnvelope::parse(&body);
        let kind = FailureKind::classify(status.as_u16(), &envelope);

        warn!(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            status = status.as_u16(),
            kind = %kind,
            retryable = kind.is_retryable(),
            error = %envelope.error.message,
            "Completion endpoint returned an error"
        );
        kind.into_error(&format!("{} returned {}", self.config.base_url, status))
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            model = %self.config.gen_model,
            prompt_len = prompt.len(),
            "Sending chat completion"
        );

        let response = self
            .authorize(self.client.post(self.endpoint("/chat/completions")))
            .json(&self.chat_request(system, prompt))
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;
        let usage = reply.usage;
        let text = reply.into_text();

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            response_len = text.len(),
            completion_tokens = usage.map(|u| u.completion_tokens),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }

    /// Lists `/models`, the cheapest authenticated call on these APIs.
    async fn health_check(&self) -> Result<bool> {
        let outcome = self
            .authorize(self.client.get(self.endpoint("/models")))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;

        let healthy = match outcome {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(subsystem = "inference", status = resp.status().as_u16(), "Completion backend unhealthy");
                false
            }
            Err(e) => {
                warn!(subsystem = "inference", error = %e, "Completion backend unreachable");
                false
            }
        };
        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.gen_model, "llama-3.3-70b-versatile");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout_seconds, defaults::GEN_TIMEOUT_SECS);
        assert!(!config.skip_tls_verify);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_custom_config() {
        let config = OpenAIConfig {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: Some("test-key".to_string()),
            gen_model: "llama3".to_string(),
            temperature: 0.2,
            max_tokens: 256,
            timeout_seconds: 60,
            skip_tls_verify: true,
        };

        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.api_key, Some("test-key".to_string()));
        assert_eq!(config.max_tokens, 256);
        assert!(config.skip_tls_verify);
    }

    #[test]
    fn test_backend_creation() {
        let backend = OpenAIBackend::with_defaults().unwrap();
        assert_eq!(backend.config().base_url, defaults::COMPLETION_URL);
        assert_eq!(backend.model_name(), defaults::GEN_MODEL);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.endpoint("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_chat_request_carries_sampling_settings() {
        let backend = OpenAIBackend::with_defaults().unwrap();
        let request = backend.chat_request("Be JSON.", "Format this");
        assert_eq!(request.model, defaults::GEN_MODEL);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].content, "Format this");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1024);
        assert!(!request.stream);
    }

    #[test]
    fn test_chat_request_without_system_message() {
        let backend = OpenAIBackend::with_defaults().unwrap();
        let request = backend.chat_request("", "Hi");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
    }
}
