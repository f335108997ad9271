use std::io::{self, Write};

use telegram::{
    InputMediaPhoto, ParseMode, TelegramClient, MAX_CAPTION_LENGTH, MAX_MEDIA_GROUP_SIZE,
    MAX_MESSAGE_LENGTH,
};
use tracing::{error, info, warn};

use crate::config::TelegramConfig;
use crate::domain::Photo;
use crate::errors::{BotError, BotResult};
use crate::formatting::{format_error, truncate_markup};

#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()>;

    fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()>;

    fn send_photo_group(
        &self,
        chat_id: &str,
        photos: &[Photo],
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()>;

    /// Report a failed run. Never fails: a broken error path is only logged.
    fn send_error(&self, chat_id: &str, message: &str);
}

pub struct NotificationService {
    client: TelegramClient,
}

impl NotificationService {
    pub fn new(config: &TelegramConfig) -> BotResult<Self> {
        let client = TelegramClient::with_base_url(&config.api_url, config.bot_token.expose())?;
        Ok(Self { client })
    }
}

impl Notifier for NotificationService {
    fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        let text = truncate_markup(text, MAX_MESSAGE_LENGTH);
        self.client.send_message(chat_id, &text, parse_mode)?;

        info!(chat_id, "Message sent successfully");
        Ok(())
    }

    fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        let caption = truncate_markup(caption, MAX_CAPTION_LENGTH);
        self.client
            .send_photo(chat_id, photo_url, Some(&caption), parse_mode)?;

        info!(chat_id, "Photo sent successfully");
        Ok(())
    }

    fn send_photo_group(
        &self,
        chat_id: &str,
        photos: &[Photo],
        parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        match photos {
            [] => Err(BotError::EmptyResult("No photos to send".to_string())),
            [photo] => self.send_photo(chat_id, &photo.url, &photo.caption, parse_mode),
            _ => {
                if photos.len() > MAX_MEDIA_GROUP_SIZE {
                    warn!(
                        requested = photos.len(),
                        "Album larger than {} photos, sending the first ones", MAX_MEDIA_GROUP_SIZE
                    );
                }

                let media: Vec<InputMediaPhoto> = photos
                    .iter()
                    .take(MAX_MEDIA_GROUP_SIZE)
                    .map(|photo| {
                        InputMediaPhoto::new(photo.url.as_str()).with_caption(
                            truncate_markup(&photo.caption, MAX_CAPTION_LENGTH),
                            parse_mode,
                        )
                    })
                    .collect();

                self.client.send_media_group(chat_id, &media)?;

                info!(chat_id, photos = media.len(), "Album sent successfully");
                Ok(())
            }
        }
    }

    fn send_error(&self, chat_id: &str, message: &str) {
        let text = format_error(message);

        match self.send_text(chat_id, &text, Some(ParseMode::MarkdownV2)) {
            Ok(()) => info!("Error notification sent to Telegram"),
            Err(e) => {
                // Don't propagate: reporting must not fail the run
                let failure = BotError::Reporting(e.to_string());
                error!(error = %failure, original = %message, "Could not report error");
            }
        }
    }
}

/// Prints messages to stdout instead of sending them (dry runs)
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn print(&self, chat_id: &str, kind: &str, text: &str) -> BotResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "[DRY RUN] {} to chat {}:", kind, chat_id)?;
        writeln!(stdout, "{}", text)?;
        writeln!(stdout)?;
        Ok(())
    }
}

impl Notifier for ConsoleNotifier {
    fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        _parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        self.print(chat_id, "Message", text)
    }

    fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
        _parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        self.print(chat_id, "Photo", &format!("{}\n{}", photo_url, caption))
    }

    fn send_photo_group(
        &self,
        chat_id: &str,
        photos: &[Photo],
        _parse_mode: Option<ParseMode>,
    ) -> BotResult<()> {
        let listing = photos
            .iter()
            .map(|photo| format!("{}\n{}", photo.url, photo.caption))
            .collect::<Vec<_>>()
            .join("\n\n");
        self.print(chat_id, "Album", &listing)
    }

    fn send_error(&self, chat_id: &str, message: &str) {
        if let Err(e) = self.print(chat_id, "Error report", &format_error(message)) {
            error!(error = %e, original = %message, "Could not print error report");
        }
    }
}
