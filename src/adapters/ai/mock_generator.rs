//! Mock Text Generator for testing.
//!
//! Provides a configurable implementation of the TextGenerator port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Error injection, per call or for every call
//! - Simulated delays
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_response(r#"{"throughline": "trust"}"#)
//!     .with_error(MockError::Network { message: "reset".into() });
//!
//! let text = generator.generate("prompt", &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationError, GenerationOptions, GeneratorInfo, TextGenerator};

/// Text returned once the queue is exhausted and no failure is configured.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

/// Mock text generator for testing.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Returned for every call once the queue is empty.
    exhausted: Option<MockError>,
    info: GeneratorInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Recorded calls for verification.
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for GenerationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                GenerationError::rate_limited(retry_after_secs)
            }
            MockError::Unavailable { message } => GenerationError::unavailable(message),
            MockError::AuthenticationFailed => GenerationError::AuthenticationFailed,
            MockError::Network { message } => GenerationError::network(message),
            MockError::Timeout { timeout_secs } => GenerationError::Timeout { timeout_secs },
        }
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub options: GenerationOptions,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            exhausted: None,
            info: GeneratorInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A generator whose every call fails with `error`.
    pub fn failing(error: MockError) -> Self {
        Self {
            exhausted: Some(error),
            ..Self::new()
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_generator_info(mut self, info: GeneratorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            match &self.exhausted {
                Some(error) => MockResponse::Error(error.clone()),
                None => MockResponse::Success(DEFAULT_MOCK_RESPONSE.to_string()),
            }
        })
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            options: options.clone(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(content) => Ok(content),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn generator_info(&self) -> GeneratorInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GenerationOptions {
        GenerationOptions::new().with_max_tokens(100)
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let generator = MockTextGenerator::new()
            .with_response("First")
            .with_response("Second");

        assert_eq!(generator.generate("p", &options()).await.unwrap(), "First");
        assert_eq!(generator.generate("p", &options()).await.unwrap(), "Second");
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let generator = MockTextGenerator::new().with_response("Only one");

        generator.generate("p", &options()).await.unwrap();
        let second = generator.generate("p", &options()).await.unwrap();

        assert_eq!(second, DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn injects_queued_errors() {
        let generator = MockTextGenerator::new()
            .with_error(MockError::RateLimited { retry_after_secs: 30 })
            .with_response("after");

        let err = generator.generate("p", &options()).await.unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited { retry_after_secs: 30 }));
        assert_eq!(generator.generate("p", &options()).await.unwrap(), "after");
    }

    #[tokio::test]
    async fn failing_generator_always_errors() {
        let generator = MockTextGenerator::failing(MockError::Network {
            message: "down".into(),
        });

        for _ in 0..5 {
            let err = generator.generate("p", &options()).await.unwrap_err();
            assert!(matches!(err, GenerationError::Network(_)));
        }
    }

    #[tokio::test]
    async fn tracks_calls() {
        let generator = MockTextGenerator::new();

        generator.generate("first prompt", &options()).await.unwrap();
        generator.generate("second prompt", &options()).await.unwrap();

        assert_eq!(generator.call_count(), 2);
        let calls = generator.get_calls();
        assert_eq!(calls[0].prompt, "first prompt");
        assert_eq!(calls[1].options.max_tokens, Some(100));

        generator.clear_calls();
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn clones_share_queue_and_calls() {
        let generator = MockTextGenerator::new().with_response("shared");
        let clone = generator.clone();

        assert_eq!(clone.generate("p", &options()).await.unwrap(), "shared");
        assert_eq!(generator.call_count(), 1);
    }

    #[test]
    fn reports_generator_info() {
        let info = MockTextGenerator::new().generator_info();
        assert_eq!(info.name, "mock");
        assert_eq!(info.model, "mock-model-1");
    }
}
