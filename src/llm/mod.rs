pub mod openai;
pub mod prompt_builder;
mod prompts;

use crate::error::ReviewError;

/// Trait for talking to a review backend.
///
/// One invocation makes exactly one completion request; there is no retry,
/// streaming, or multi-turn state behind this seam.
pub trait ReviewClient {
    /// Send the built prompt for review and return the feedback text.
    fn review_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ReviewError>;
}
