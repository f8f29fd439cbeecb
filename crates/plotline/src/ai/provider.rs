//! Chart advisor trait for abstracting LLM interactions.
//!
//! A [`ChartAdvisor`] turns a [`ChartRequest`] (column metadata plus a row
//! sample) into a [`ChartSpec`]. Callers go through
//! [`recommend_chart`](crate::chart::recommend_chart), which validates the
//! result and falls back to a default chart on any failure.
//!
//! # Implementing a New Advisor
//!
//! 1. Create a new file in `src/ai/` (e.g., `ollama.rs`)
//! 2. Implement the [`ChartAdvisor`] trait for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`
//!
//! [`build_chart_prompt`](super::build_chart_prompt) and
//! [`parse_chart_spec`](super::parse_chart_spec) cover the prompt and the
//! response parsing for any text-completion backend.

use crate::chart::{ChartRequest, ChartSpec};
use anyhow::Result;

/// Trait for services that can recommend a chart for a dataset.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage across threads.
///
/// # Error Handling
///
/// Implementations should return meaningful errors via `anyhow::Result`
/// and must not retry; the caller makes exactly one attempt.
pub trait ChartAdvisor: Send + Sync {
    /// Recommend a chart for the sampled dataset.
    ///
    /// Column references in the returned spec should be exact column names
    /// from `request.columns`; the caller rejects anything else.
    fn recommend(&self, request: &ChartRequest<'_>) -> Result<ChartSpec>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}
