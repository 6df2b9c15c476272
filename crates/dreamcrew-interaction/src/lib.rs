//! DreamCrew interaction layer: the generation-oracle boundary.
//!
//! Exposes the [`GenerationAgent`] trait the application drives, the
//! Gemini REST implementation, secret configuration, prompt templates, and
//! oracle-output decoding.

pub mod agent;
pub mod config;
pub mod gemini_api_agent;
pub mod parse;
pub mod prompt;

pub use agent::{AgentError, GenerationAgent, GenerationRequest};
pub use config::{GeminiConfig, SecretConfig, load_secret_config};
pub use gemini_api_agent::GeminiApiAgent;
