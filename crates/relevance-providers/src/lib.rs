//! relevance-providers: LLM oracle integrations.
//!
//! Implements the `Oracle` trait for OpenAI, Anthropic, and Ollama, each using
//! its backend's structured-output mechanism, plus a mock for tests.

pub mod anthropic;
pub mod config;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, JudgeConfig, ProviderConfig};
pub use mock::MockOracle;
