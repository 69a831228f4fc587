//! Scriptable generation backend for tests.
//!
//! Replies are chosen per call in this order: the next queued reply, the
//! first prompt-substring mapping that matches, then the default reply.
//! Every call is recorded so tests can inspect what the formatter sent.
//!
//! ```rust,ignore
//! use reelnotes_inference::mock::MockGenerationBackend;
//! use reelnotes_core::GenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response(r#"{"title": "T", "contentType": "Recipe", "structuredText": "S"}"#);
//! let reply = backend.generate("anything").await.unwrap();
//! assert!(reply.contains("Recipe"));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use reelnotes_core::{Error, GenerationBackend, Result};

pub const MOCK_MODEL: &str = "mock-model";

/// Error message returned by failing replies.
pub const SIMULATED_FAILURE: &str = "Simulated failure for testing";

/// One canned outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Fail,
}

impl MockReply {
    fn into_result(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Fail => Err(Error::Inference(SIMULATED_FAILURE.to_string())),
        }
    }
}

/// A recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub at: Instant,
}

#[derive(Debug)]
struct MockState {
    queued: VecDeque<MockReply>,
    calls: Vec<MockCall>,
}

/// Generation backend with canned replies. Clones share queue and call log.
#[derive(Clone)]
pub struct MockGenerationBackend {
    default_reply: MockReply,
    mappings: Vec<(String, MockReply)>,
    latency: Duration,
    healthy: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            default_reply: MockReply::Text("Mock response".to_string()),
            mappings: Vec::new(),
            latency: Duration::ZERO,
            healthy: true,
            state: Arc::new(Mutex::new(MockState {
                queued: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Backend whose every call fails with [`Error::Inference`].
    pub fn failing() -> Self {
        Self {
            default_reply: MockReply::Fail,
            ..Self::new()
        }
    }

    /// Reply used when nothing is queued and no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.default_reply = MockReply::Text(response.into());
        self
    }

    /// Reply with `output` whenever the prompt contains `needle`.
    /// Mappings are checked in the order they were added.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.mappings
            .push((needle.into(), MockReply::Text(output.into())));
        self
    }

    /// Queue replies consumed one per call, ahead of mappings and the default.
    pub fn with_replies(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.lock().queued.extend(replies);
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency = Duration::from_millis(latency_ms);
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn generate_call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A failed assertion on another thread must not hide the log
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and pick its reply.
    fn next_reply(&self, system: &str, prompt: &str) -> MockReply {
        let mut state = self.lock();
        state.calls.push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            at: Instant::now(),
        });
        if let Some(reply) = state.queued.pop_front() {
            return reply;
        }
        drop(state);

        self.mappings
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let reply = self.next_reply(system, prompt);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        reply.into_result()
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let backend = MockGenerationBackend::new().with_fixed_response("{\"title\": \"T\"}");
        assert_eq!(backend.generate("caption").await.unwrap(), "{\"title\": \"T\"}");
        assert_eq!(backend.model_name(), MOCK_MODEL);
    }

    #[tokio::test]
    async fn test_mappings_checked_in_order() {
        let backend = MockGenerationBackend::new()
            .with_response_mapping("pasta", "recipe")
            .with_response_mapping("pasta workout", "never reached")
            .with_response_mapping("squat", "workout");

        assert_eq!(backend.generate("pasta workout combo").await.unwrap(), "recipe");
        assert_eq!(backend.generate("squat day").await.unwrap(), "workout");
        assert_eq!(backend.generate("beach").await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_queued_replies_run_first() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("default")
            .with_response_mapping("x", "mapped")
            .with_replies([MockReply::Fail, MockReply::Text("queued".into())]);

        assert!(matches!(backend.generate("x").await, Err(Error::Inference(_))));
        assert_eq!(backend.generate("x").await.unwrap(), "queued");
        assert_eq!(backend.generate("x").await.unwrap(), "mapped");
        assert_eq!(backend.generate("y").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_call_log() {
        let backend = MockGenerationBackend::new();
        backend.generate_with_system("sys", "one").await.unwrap();
        backend.generate("two").await.unwrap();

        let calls = backend.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[1].system, "");
        assert_eq!(calls[1].prompt, "two");
        assert!(calls[0].at <= calls[1].at);

        backend.clear_calls();
        assert_eq!(backend.generate_call_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_log_and_queue() {
        let backend = MockGenerationBackend::new().with_replies([MockReply::Text("once".into())]);
        let clone = backend.clone();

        assert_eq!(clone.generate("a").await.unwrap(), "once");
        assert_eq!(backend.generate("b").await.unwrap(), "Mock response");
        assert_eq!(backend.generate_call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockGenerationBackend::failing();
        let err = backend.generate("test").await.unwrap_err();
        assert_eq!(err.to_string(), format!("Inference error: {}", SIMULATED_FAILURE));
        assert_eq!(backend.generate_call_count(), 1);
    }

    #[tokio::test]
    async fn test_health_flag() {
        assert!(MockGenerationBackend::new().health_check().await.unwrap());
        let down = MockGenerationBackend::new().with_health(false);
        assert!(!down.health_check().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_uses_tokio_clock() {
        let backend = MockGenerationBackend::new().with_latency_ms(50);
        let start = tokio::time::Instant::now();
        backend.generate("test").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
