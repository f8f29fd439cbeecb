//! LLM-backed chart advisors.
//!
//! # Feature Flag
//!
//! The [`ChartAdvisor`] trait and the prompt helpers are always available.
//! The HTTP-backed providers require the `ai` feature (enabled by default):
//!
//! ```toml
//! # Disable the HTTP providers for a smaller binary
//! plotline = { version = "0.1", default-features = false }
//! ```
//!
//! # Providers
//!
//! - [`AnthropicProvider`] - Anthropic Messages API (requires `ai` feature)
//! - [`OpenRouterProvider`] - OpenRouter API (requires `ai` feature)

// Advisor trait and prompt handling are always available (for custom implementations)
mod prompt;
mod provider;

pub use prompt::{build_chart_prompt, parse_chart_spec};
pub use provider::ChartAdvisor;

// Concrete providers require the "ai" feature
#[cfg(feature = "ai")]
mod anthropic;
#[cfg(feature = "ai")]
mod openrouter;

#[cfg(feature = "ai")]
pub use anthropic::{AnthropicConfig, AnthropicConfigBuilder, AnthropicProvider};

#[cfg(feature = "ai")]
pub use openrouter::{OpenRouterConfig, OpenRouterConfigBuilder, OpenRouterProvider};

/// Placeholder shipped in `.env` templates.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Reject empty or placeholder API keys.
#[cfg_attr(not(feature = "ai"), allow(dead_code))]
pub(crate) fn require_api_key(api_key: String, provider: &str) -> anyhow::Result<String> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_API_KEY {
        anyhow::bail!("{} API key is not configured", provider);
    }
    Ok(trimmed.to_string())
}
