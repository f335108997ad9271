use chrono::{DateTime, SecondsFormat, Utc};
use telegram::ParseMode;

use crate::domain::{ContentItem, DeliveryMode, ItemKind, MessageBody, OutboundMessage, Photo};
use crate::errors::{BotError, BotResult};

use super::markdown::{escape_link_url, escape_markdown, truncate};

/// Longest excerpt shown for an article
const MAX_EXCERPT_LENGTH: usize = 300;

/// Longest article title, so a caption keeps room for the link
const MAX_TITLE_LENGTH: usize = 200;

/// Render a single item as MarkdownV2 text.
///
/// Pins render as a bare link to the pin. Articles also show their title,
/// excerpt, domain and bookmark date.
pub fn format_item(item: &ContentItem) -> String {
    match item.kind {
        ItemKind::Pin => format!("🔗 [View Pin]({})", escape_link_url(&item.link)),
        ItemKind::Article => format_article(item),
    }
}

fn format_article(item: &ContentItem) -> String {
    let title = truncate(&item.title, MAX_TITLE_LENGTH);
    let mut message = format!("📚 *{}*", escape_markdown(&title));

    if let Some(excerpt) = &item.description {
        message.push_str("\n\n");
        message.push_str(&escape_markdown(&truncate(excerpt, MAX_EXCERPT_LENGTH)));
    }

    message.push_str("\n\n🌐 ");
    message.push_str(&escape_markdown(&item.source_label));

    if let Some(created_at) = item.created_at {
        message.push_str(" • ");
        message.push_str(&escape_markdown(&format_date(&created_at)));
    }

    message.push_str(&format!(
        "\n🔗 [Read article]({})",
        escape_link_url(&item.link)
    ));

    message
}

/// Render several items as a numbered list, one line per item
pub fn format_item_list(items: &[ContentItem]) -> String {
    if items.is_empty() {
        return "No items available".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let (icon, link_text) = match item.kind {
                ItemKind::Pin => ("📋", "📍 Pin →"),
                ItemKind::Article => ("🌐", "📖 Read →"),
            };

            format!(
                "{}\\. {} {} • [{}]({})",
                index + 1,
                icon,
                escape_markdown(&item.source_label),
                link_text,
                escape_link_url(&item.link)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an error notification stamped with the current time
pub fn format_error(message: &str) -> String {
    format_error_at(message, Utc::now())
}

/// Render an error notification stamped with `at`
pub fn format_error_at(message: &str, at: DateTime<Utc>) -> String {
    // Code spans only reserve ` and \, so the timestamp stays verbatim
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        "🚨 *Daily Pin Bot Error*\n\n\
         ❌ Scheduled delivery failed\n\n\
         *Error Details:*\n\
         {}\n\n\
         *Time:* `{}`\n\n\
         Please check your source credentials and chat settings\\.",
        escape_markdown(message),
        timestamp
    )
}

/// Format a timestamp as e.g. `March 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Build the outbound message for the picked items
pub fn compose_message(
    chat_id: &str,
    mode: DeliveryMode,
    items: &[ContentItem],
) -> BotResult<OutboundMessage> {
    let first = items
        .first()
        .ok_or_else(|| BotError::EmptyResult("No items to deliver".to_string()))?;

    let body = match mode {
        DeliveryMode::Link => MessageBody::Text(format_item(first)),
        DeliveryMode::Photo => match photo_for(first) {
            Some(photo) => MessageBody::Photo(photo),
            None => MessageBody::Text(format_item(first)),
        },
        DeliveryMode::List => MessageBody::Text(format_item_list(items)),
        DeliveryMode::Album => {
            let mut photos: Vec<Photo> = items.iter().filter_map(photo_for).collect();
            match photos.len() {
                0 => MessageBody::Text(format_item_list(items)),
                1 => MessageBody::Photo(photos.remove(0)),
                _ => MessageBody::Album(photos),
            }
        }
    };

    Ok(OutboundMessage::new(chat_id, body, Some(ParseMode::MarkdownV2)))
}

fn photo_for(item: &ContentItem) -> Option<Photo> {
    item.image_url.as_ref().map(|url| Photo {
        url: url.clone(),
        caption: format_item(item),
    })
}
