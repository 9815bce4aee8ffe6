//! Prompt construction for the generative provider

pub mod prompt;

pub use prompt::{Prompt, PromptBuilder, FALLBACK_SENTENCE};
