/// Outbound Telegram calls and delivery errors
pub mod responder;
/// Update classification and dispatch
pub mod router;
/// Inbound update decoding
pub mod update;
/// View layer for UI components (texts, keyboards, inline cards)
pub mod views;
/// `setWebhook` registration
pub mod webhook;
