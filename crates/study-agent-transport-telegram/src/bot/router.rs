//! Update routing.
//!
//! Takes a classified [`IncomingUpdate`], applies the group-mention filter and
//! command shortcuts, calls the tutor and hands the result to [`TelegramApi`].
//! Every path ends in an [`Ack`] that becomes the webhook's plain-text reply.

use crate::bot::responder::{DeliveryError, TelegramApi};
use crate::bot::update::{ChatKind, IncomingUpdate};
use crate::bot::views::{
    inline_article, labels, reply_body, welcome_text, APOLOGY_OPTIONS, APOLOGY_TEXT,
    GREETING_TEXT, WELCOME_TOPICS,
};
use std::sync::Arc;
use study_agent_core::tutor::{CompletionMode, TutorClient};
use tracing::{debug, error, info, warn};

/// Inline queries shorter than this are not sent to the model.
pub const MIN_INLINE_QUERY_CHARS: usize = 3;

/// Plain-text acknowledgment returned to Telegram for a handled update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// Handled, including failed deliveries
    Ok,
    /// Missing chat or text
    Ignored,
    /// Group message not addressed to the bot
    NotTagged,
    /// Inline query below the minimum length
    TooShort,
    /// Inline query could not be answered
    InlineError,
    /// Completion failed and the apology was sent
    ErrorHandled,
    /// Body was empty or not JSON
    NoBody,
}

impl Ack {
    /// Body text of the HTTP response
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Ignored => "Ignored",
            Self::NotTagged => "Not tagged",
            Self::TooShort => "Too short",
            Self::InlineError => "Inline Error",
            Self::ErrorHandled => "Error handled",
            Self::NoBody => "No body",
        }
    }
}

/// How a text update addresses the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressed {
    /// Text to act on, mention removed
    Query(String),
    /// Bare mention with nothing else
    Greeting,
    /// Group message without the mention
    NotTagged,
}

/// Apply the group mention filter to `text`.
///
/// Private chats pass through untouched. In groups with a configured `mention`,
/// the text must contain it; the first occurrence is removed and the rest trimmed.
#[must_use]
pub fn resolve_query(chat_kind: ChatKind, text: &str, mention: Option<&str>) -> Addressed {
    let Some(tag) = mention.filter(|_| chat_kind.is_group()) else {
        return Addressed::Query(text.to_string());
    };

    if !text.contains(tag) {
        return Addressed::NotTagged;
    }

    let stripped = text.replacen(tag, "", 1);
    let stripped = stripped.trim();
    if stripped.is_empty() {
        Addressed::Greeting
    } else {
        Addressed::Query(stripped.to_string())
    }
}

/// `/start`, optionally addressed as `/start@<username>`
#[must_use]
pub fn is_start_command(text: &str, mention: Option<&str>) -> bool {
    let text = text.trim();
    text == "/start" || mention.is_some_and(|tag| text.strip_prefix("/start") == Some(tag))
}

/// Dispatches updates to the tutor and Telegram
pub struct UpdateRouter {
    tutor: Arc<TutorClient>,
    telegram: Arc<dyn TelegramApi>,
    mention: Option<String>,
}

impl UpdateRouter {
    /// Create a router. `mention` is the `@username` tag, if known.
    #[must_use]
    pub fn new(
        tutor: Arc<TutorClient>,
        telegram: Arc<dyn TelegramApi>,
        mention: Option<String>,
    ) -> Self {
        Self {
            tutor,
            telegram,
            mention,
        }
    }

    /// Handle one update end to end.
    pub async fn route(&self, update: IncomingUpdate) -> Ack {
        if let IncomingUpdate::InlineQuery { id, query } = &update {
            return self.handle_inline(id, query).await;
        }

        let Some((chat_id, chat_kind, text)) = update.text_parts() else {
            debug!("Ignoring update without chat or text");
            return Ack::Ignored;
        };

        match resolve_query(chat_kind, text, self.mention.as_deref()) {
            Addressed::NotTagged => {
                debug!(chat_id, "Group message without mention");
                Ack::NotTagged
            }
            Addressed::Greeting => {
                log_delivery(
                    "greeting",
                    self.telegram.send_message(chat_id, GREETING_TEXT, &[]).await,
                );
                Ack::Ok
            }
            Addressed::Query(query) => self.handle_text(chat_id, &query).await,
        }
    }

    async fn handle_text(&self, chat_id: i64, query: &str) -> Ack {
        log_delivery("typing", self.telegram.send_typing(chat_id).await);

        if is_start_command(query, self.mention.as_deref()) {
            info!(chat_id, "Sending welcome message");
            let welcome = welcome_text(self.mention.as_deref());
            let result = self
                .telegram
                .send_message(chat_id, &welcome, &labels(&WELCOME_TOPICS))
                .await;
            log_delivery("welcome", result);
            return Ack::Ok;
        }

        match self.tutor.complete(query, CompletionMode::Standard).await {
            Ok(reply) => {
                let result = self
                    .telegram
                    .send_message(chat_id, &reply_body(&reply.text), &reply.options)
                    .await;
                log_delivery("reply", result);
                Ack::Ok
            }
            Err(e) => {
                error!(chat_id, error = %e, "Completion failed, sending apology");
                let result = self
                    .telegram
                    .send_message(chat_id, APOLOGY_TEXT, &labels(&APOLOGY_OPTIONS))
                    .await;
                log_delivery("apology", result);
                Ack::ErrorHandled
            }
        }
    }

    async fn handle_inline(&self, query_id: &str, query: &str) -> Ack {
        if query.chars().count() < MIN_INLINE_QUERY_CHARS {
            return Ack::TooShort;
        }

        let reply = match self.tutor.complete(query, CompletionMode::InlineSummary).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(query_id, error = %e, "Inline completion failed");
                return Ack::InlineError;
            }
        };

        let article = inline_article(query, &reply);
        let result = self
            .telegram
            .answer_inline_query(query_id, &article.title, &article.summary, &article.body)
            .await;

        match result {
            Ok(()) => Ack::Ok,
            Err(e) => {
                log_delivery("inline answer", Err(e));
                Ack::InlineError
            }
        }
    }
}

fn log_delivery(what: &str, result: Result<(), DeliveryError>) {
    match result {
        Ok(()) => {}
        Err(DeliveryError::Unreachable(reason)) => {
            warn!(what, reason = %reason, "Telegram unreachable");
        }
        Err(DeliveryError::Rejected(reason)) => {
            warn!(what, reason = %reason, "Telegram rejected request");
        }
    }
}
