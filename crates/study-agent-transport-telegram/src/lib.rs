#![deny(missing_docs)]
//! Telegram transport adapter for Study Agent.

/// Telegram-specific bot/transport implementation.
pub mod bot;
/// Telegram transport configuration.
pub mod config;
/// Webhook HTTP server entrypoint.
pub mod runner;
