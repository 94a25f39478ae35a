#![deny(missing_docs)]
//! Study Agent core library.
//!
//! Shared settings, the Gemini provider and the tutor adapter that turns a
//! user query into a structured `{text, options}` reply.

/// Configuration management.
pub mod config;
/// LLM providers and HTTP helpers.
pub mod llm;
/// Prompt building and reply normalization.
pub mod tutor;
/// Utility functions.
pub mod utils;

/// Mock constructors for unit tests.
#[cfg(test)]
pub mod testing;
