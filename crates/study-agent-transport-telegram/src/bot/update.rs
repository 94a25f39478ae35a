//! Inbound update decoding.
//!
//! Webhook bodies are decoded into loose `Raw*` structs (every field optional)
//! and then classified exactly once into [`IncomingUpdate`].

use serde::Deserialize;

/// Telegram update as posted to the webhook. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUpdate {
    /// Regular message
    pub message: Option<RawMessage>,
    /// Inline keyboard button press
    pub callback_query: Option<RawCallbackQuery>,
    /// `@bot query` typed in any chat
    pub inline_query: Option<RawInlineQuery>,
}

/// Message subset the bot reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    /// Chat the message belongs to
    pub chat: Option<RawChat>,
    /// Message text, absent for media
    pub text: Option<String>,
}

/// Chat subset the bot reads
#[derive(Debug, Clone, Deserialize)]
pub struct RawChat {
    /// Chat identifier
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
}

/// Callback query subset the bot reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCallbackQuery {
    /// Message carrying the pressed keyboard
    pub message: Option<RawMessage>,
    /// Button payload
    pub data: Option<String>,
}

/// Inline query subset the bot reads
#[derive(Debug, Clone, Deserialize)]
pub struct RawInlineQuery {
    /// Query identifier used to answer it
    pub id: String,
    /// Text typed after the bot mention
    #[serde(default)]
    pub query: String,
}

/// Chat type as reported by Telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// One-to-one chat with the bot
    Private,
    /// Basic group
    Group,
    /// Supergroup
    Supergroup,
    /// Channel
    Channel,
    /// Any type this bot does not know about
    #[default]
    #[serde(other)]
    Other,
}

impl ChatKind {
    /// Group-type chats only answer when the bot is mentioned
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

/// Update classified into the single branch the router handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingUpdate {
    /// Inline query
    InlineQuery {
        /// Query identifier
        id: String,
        /// Raw query text
        query: String,
    },
    /// Text message
    Message {
        /// Chat to reply in
        chat_id: i64,
        /// Type of that chat
        chat_kind: ChatKind,
        /// Non-empty message text
        text: String,
    },
    /// Keyboard button press
    CallbackQuery {
        /// Chat to reply in
        chat_id: i64,
        /// Type of that chat
        chat_kind: ChatKind,
        /// Non-empty button payload
        data: String,
    },
    /// Nothing the bot can act on
    Unrecognized,
}

impl IncomingUpdate {
    /// Chat, chat type and text for the message-like variants
    #[must_use]
    pub fn text_parts(&self) -> Option<(i64, ChatKind, &str)> {
        match self {
            Self::Message {
                chat_id,
                chat_kind,
                text,
            } => Some((*chat_id, *chat_kind, text)),
            Self::CallbackQuery {
                chat_id,
                chat_kind,
                data,
            } => Some((*chat_id, *chat_kind, data)),
            Self::InlineQuery { .. } | Self::Unrecognized => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

impl From<RawUpdate> for IncomingUpdate {
    fn from(raw: RawUpdate) -> Self {
        if let Some(inline) = raw.inline_query {
            return Self::InlineQuery {
                id: inline.id,
                query: inline.query,
            };
        }

        if let Some(message) = raw.message {
            // A message without usable text still shadows the callback branch
            return match (message.chat, non_empty(message.text)) {
                (Some(chat), Some(text)) => Self::Message {
                    chat_id: chat.id,
                    chat_kind: chat.kind,
                    text,
                },
                _ => Self::Unrecognized,
            };
        }

        if let Some(callback) = raw.callback_query {
            let chat = callback.message.and_then(|m| m.chat);
            if let (Some(chat), Some(data)) = (chat, non_empty(callback.data)) {
                return Self::CallbackQuery {
                    chat_id: chat.id,
                    chat_kind: chat.kind,
                    data,
                };
            }
        }

        Self::Unrecognized
    }
}
