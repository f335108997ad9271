//! Telegram Bot API bindings for Rust
//! Provides functions to send text messages, photos and photo albums to a chat

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Maximum length of a message text, in characters
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Maximum length of a photo caption, in characters
pub const MAX_CAPTION_LENGTH: usize = 1024;

/// `sendMediaGroup` accepts between 2 and 10 items
pub const MIN_MEDIA_GROUP_SIZE: usize = 2;
pub const MAX_MEDIA_GROUP_SIZE: usize = 10;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),
    #[error("Invalid Telegram bot token")]
    Unauthorized,
    #[error("Bad request to Telegram API: {0}")]
    BadRequest(String),
    #[error("Bot was blocked by the user or chat not found")]
    Forbidden,
    #[error("Telegram API error: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Telegram API returned error: {0}")]
    Api(String),
    #[error("Unexpected Telegram API response: {0}")]
    Decode(String),
    #[error("Media group must contain between 2 and 10 photos, got {0}")]
    InvalidMediaGroup(usize),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        // Method URLs carry the bot token
        TelegramError::RequestError(err.without_url())
    }
}

/// Markup dialect of a message text or caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    MarkdownV2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// A photo entry of a `sendMediaGroup` album
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputMediaPhoto {
    #[serde(rename = "type")]
    media_type: &'static str,
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
}

impl InputMediaPhoto {
    pub fn new(media: impl Into<String>) -> Self {
        Self {
            media_type: "photo",
            media: media.into(),
            caption: None,
            parse_mode: None,
        }
    }

    pub fn with_caption(
        mut self,
        caption: impl Into<String>,
        parse_mode: Option<ParseMode>,
    ) -> Self {
        self.caption = Some(caption.into());
        self.parse_mode = parse_mode;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
    result: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

#[derive(Debug, Serialize)]
struct SendPhotoPayload<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

#[derive(Debug, Serialize)]
struct SendMediaGroupPayload<'a> {
    chat_id: &'a str,
    media: &'a [InputMediaPhoto],
}

pub struct TelegramClient {
    url: String,
    client: Client,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            url: format!("{}/bot{}", base_url.trim_end_matches('/'), token),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.url, method)
    }

    /// Send a text message to a chat
    pub fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<Message, TelegramError> {
        let payload = SendMessagePayload {
            chat_id,
            text,
            parse_mode,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()?;

        read_response(response)
    }

    /// Send a photo by URL, with an optional caption
    pub fn send_photo(
        &self,
        chat_id: &str,
        photo: &str,
        caption: Option<&str>,
        parse_mode: Option<ParseMode>,
    ) -> Result<Message, TelegramError> {
        let payload = SendPhotoPayload {
            chat_id,
            photo,
            caption,
            parse_mode,
        };

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .json(&payload)
            .send()?;

        read_response(response)
    }

    /// Send several photos as a single album
    pub fn send_media_group(
        &self,
        chat_id: &str,
        media: &[InputMediaPhoto],
    ) -> Result<Vec<Message>, TelegramError> {
        if !(MIN_MEDIA_GROUP_SIZE..=MAX_MEDIA_GROUP_SIZE).contains(&media.len()) {
            return Err(TelegramError::InvalidMediaGroup(media.len()));
        }

        let payload = SendMediaGroupPayload { chat_id, media };

        let response = self
            .client
            .post(self.method_url("sendMediaGroup"))
            .json(&payload)
            .send()?;

        read_response(response)
    }
}

/// Map the HTTP status and the `ok` flag of a Bot API response to a result
fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, TelegramError> {
    let status = response.status();

    if !status.is_success() {
        let description = response
            .json::<ApiResponse>()
            .ok()
            .and_then(|body| body.description);

        return Err(match status {
            StatusCode::UNAUTHORIZED => TelegramError::Unauthorized,
            StatusCode::BAD_REQUEST => TelegramError::BadRequest(
                description.unwrap_or_else(|| "Unknown error".to_string()),
            ),
            StatusCode::FORBIDDEN => TelegramError::Forbidden,
            _ => TelegramError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            },
        });
    }

    let body: ApiResponse = response
        .json()
        .map_err(|e| TelegramError::Decode(e.without_url().to_string()))?;

    if !body.ok {
        return Err(TelegramError::Api(
            body.description.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    serde_json::from_value(body.result.unwrap_or(serde_json::Value::Null))
        .map_err(|e| TelegramError::Decode(e.to_string()))
}
