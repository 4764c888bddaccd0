//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `MockTextGenerator` - Configurable mock for testing
//! - `AnthropicTextGenerator` - Anthropic Messages API

mod anthropic_generator;
mod mock_generator;

pub use anthropic_generator::{AnthropicConfig, AnthropicTextGenerator};
pub use mock_generator::{
    MockError, MockResponse, MockTextGenerator, RecordedCall, DEFAULT_MOCK_RESPONSE,
};
