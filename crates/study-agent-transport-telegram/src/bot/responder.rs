//! Outbound Telegram calls.
//!
//! [`TelegramApi`] is the seam the router talks to; [`TeloxideResponder`] is
//! the production implementation on top of `teloxide::Bot`.

use crate::bot::views::options_keyboard;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, InlineQueryId, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
    InputMessageContentText, ParseMode,
};
use teloxide::RequestError;
use thiserror::Error;
use tracing::error;

/// Seconds Telegram may cache an inline answer.
pub const INLINE_CACHE_SECS: u32 = 300;

/// Why an outbound Telegram call did not go through
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Telegram could not be reached (network or IO failure)
    #[error("Telegram unreachable: {0}")]
    Unreachable(String),
    /// Telegram answered with an error
    #[error("Telegram rejected the request: {0}")]
    Rejected(String),
}

impl From<RequestError> for DeliveryError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Network(e) => Self::Unreachable(describe_network_error(&e)),
            RequestError::Io(e) => Self::Unreachable(e.to_string()),
            other => Self::Rejected(other.to_string()),
        }
    }
}

// reqwest's Display embeds the request URL, which carries the bot token
fn describe_network_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    match std::error::Error::source(err) {
        Some(source) => format!("{kind}: {source}"),
        None => kind.to_string(),
    }
}

/// Outbound Bot API operations used by the router
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Send an HTML message with one callback button per option, two per row
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &[String],
    ) -> Result<(), DeliveryError>;

    /// Show the "typing…" indicator
    async fn send_typing(&self, chat_id: i64) -> Result<(), DeliveryError>;

    /// Answer an inline query with a single article result
    async fn answer_inline_query(
        &self,
        query_id: &str,
        title: &str,
        summary: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError>;
}

/// [`TelegramApi`] backed by teloxide
#[derive(Clone)]
pub struct TeloxideResponder {
    bot: Bot,
}

impl TeloxideResponder {
    /// Create a responder for `token` against `api_url`.
    ///
    /// An unparsable URL is logged and the public endpoint is used instead.
    #[must_use]
    pub fn new(token: &str, api_url: &str) -> Self {
        let bot = Bot::new(token);
        let bot = match reqwest::Url::parse(api_url) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %api_url, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        };
        Self { bot }
    }
}

#[async_trait]
impl TelegramApi for TeloxideResponder {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &[String],
    ) -> Result<(), DeliveryError> {
        let mut req = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);
        if !options.is_empty() {
            req = req.reply_markup(options_keyboard(options));
        }
        req.await?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), DeliveryError> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await?;
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        title: &str,
        summary: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError> {
        let mut content = InputMessageContentText::new(html_body);
        content.parse_mode = Some(ParseMode::Html);

        let mut article =
            InlineQueryResultArticle::new(query_id, title, InputMessageContent::Text(content));
        article.description = Some(summary.to_string());

        self.bot
            .answer_inline_query(
                InlineQueryId(query_id.to_string()),
                [InlineQueryResult::Article(article)],
            )
            .cache_time(INLINE_CACHE_SECS)
            .await?;
        Ok(())
    }
}
