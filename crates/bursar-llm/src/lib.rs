//! Bursar LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `bursar-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic scripted responses for testing
//! - `GeminiProvider`: hosted Generative Language API over HTTP
//!
//! # Examples
//!
//! ```
//! use bursar_llm::MockProvider;
//! use bursar_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from the model");
//! let result = provider.generate("any prompt").unwrap();
//! assert_eq!(result, "Hello from the model");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use bursar_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured model does not exist at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Scripted outcome for one MockProvider call
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Deterministic mock provider for tests
///
/// Returns scripted responses in push order, falling back to a fixed default
/// once the script is exhausted. Clones share the script and call counter,
/// so a test can hold one handle while the pipeline under test holds
/// another.
///
/// # Examples
///
/// ```
/// use bursar_llm::MockProvider;
/// use bursar_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("default");
/// provider.push_response("first");
/// provider.push_error("model overloaded");
///
/// assert_eq!(provider.generate("p").unwrap(), "first");
/// assert!(provider.generate("p").is_err());
/// assert_eq!(provider.generate("p").unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed default response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a successful response for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&self, cause: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(cause.into()));
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(cause)) => Err(LlmError::Other(cause)),
            None => Ok(self.default_response.clone()),
        }
    }
}
