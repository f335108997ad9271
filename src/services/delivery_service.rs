use rand::Rng;
use telegram::MAX_MEDIA_GROUP_SIZE;
use tracing::{error, info};

use crate::domain::{DeliveryMode, MessageBody, OutboundMessage};
use crate::errors::BotResult;
use crate::formatting::compose_message;
use crate::sources::ContentSource;

use super::fetch_service::FetchService;
use super::notification_service::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub mode: DeliveryMode,
    pub count: usize,
}

impl DeliveryOptions {
    pub fn new(mode: DeliveryMode, count: usize) -> Self {
        Self { mode, count }
    }

    /// How many items to pick for this mode
    pub fn item_count(&self) -> usize {
        if !self.mode.is_multi() {
            return 1;
        }

        let count = self.count.max(1);
        match self.mode {
            DeliveryMode::Album => count.min(MAX_MEDIA_GROUP_SIZE),
            _ => count,
        }
    }
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self::new(DeliveryMode::Link, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The content message went out with this many items
    Delivered { items: usize },
    /// The run failed and the failure was handed to the error path
    Reported { error: String },
}

pub struct DeliveryService<S: ContentSource, N: Notifier> {
    fetcher: FetchService<S>,
    notifier: N,
    chat_id: String,
    options: DeliveryOptions,
}

impl<S: ContentSource, N: Notifier> DeliveryService<S, N> {
    pub fn new(
        source: S,
        notifier: N,
        chat_id: impl Into<String>,
        options: DeliveryOptions,
    ) -> Self {
        Self {
            fetcher: FetchService::new(source),
            notifier,
            chat_id: chat_id.into(),
            options,
        }
    }

    /// Send one content message. Returns the number of items it carries.
    pub fn deliver<R: Rng + ?Sized>(&self, rng: &mut R) -> BotResult<usize> {
        let items = self.fetcher.pick_random(self.options.item_count(), rng)?;
        let message = compose_message(&self.chat_id, self.options.mode, &items)?;

        self.send(&message)?;

        Ok(match &message.body {
            MessageBody::Album(photos) => photos.len(),
            _ => items.len(),
        })
    }

    pub fn send(&self, message: &OutboundMessage) -> BotResult<()> {
        let chat_id = message.chat_id.as_str();

        match &message.body {
            MessageBody::Text(text) => self.notifier.send_text(chat_id, text, message.parse_mode),
            MessageBody::Photo(photo) => {
                self.notifier
                    .send_photo(chat_id, &photo.url, &photo.caption, message.parse_mode)
            }
            MessageBody::Album(photos) => {
                self.notifier
                    .send_photo_group(chat_id, photos, message.parse_mode)
            }
        }
    }

    /// One scheduled invocation: deliver, or report the failure to the chat.
    ///
    /// Never fails. The chat receives either the content or a single error
    /// notification.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> RunOutcome {
        info!(mode = %self.options.mode, "Starting delivery");

        match self.deliver(rng) {
            Ok(items) => {
                info!(items, "Delivery completed");
                RunOutcome::Delivered { items }
            }
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "Delivery failed");
                self.notifier.send_error(&self.chat_id, &message);
                RunOutcome::Reported { error: message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentItem, ItemKind, Photo, SourceType};
    use crate::errors::{BotError, FetchError};
    use crate::services::notification_service::MockNotifier;
    use crate::sources::traits::MockContentSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use telegram::{ParseMode, TelegramError};

    fn pins(n: usize) -> Vec<ContentItem> {
        (0..n)
            .map(|i| {
                ContentItem::new(
                    ItemKind::Pin,
                    format!("{}", 100 + i),
                    format!("Pin {}", i),
                    format!("https://www.pinterest.com/pin/{}/", 100 + i),
                    "Board".to_string(),
                )
                .with_image_url(Some(format!("https://i.pinimg.com/{}.jpg", i)))
            })
            .collect()
    }

    fn source_with(result: fn() -> BotResult<Vec<ContentItem>>) -> MockContentSource {
        let mut source = MockContentSource::new();
        source.expect_fetch_items().times(1).returning(result);
        source.expect_source_type().return_const(SourceType::Pins);
        source
    }

    fn service(
        source: MockContentSource,
        notifier: MockNotifier,
        mode: DeliveryMode,
        count: usize,
    ) -> DeliveryService<MockContentSource, MockNotifier> {
        DeliveryService::new(source, notifier, "42", DeliveryOptions::new(mode, count))
    }

    #[test]
    fn test_item_count_per_mode() {
        assert_eq!(DeliveryOptions::new(DeliveryMode::Link, 5).item_count(), 1);
        assert_eq!(DeliveryOptions::new(DeliveryMode::Photo, 5).item_count(), 1);
        assert_eq!(DeliveryOptions::new(DeliveryMode::List, 5).item_count(), 5);
        assert_eq!(DeliveryOptions::new(DeliveryMode::List, 0).item_count(), 1);
        assert_eq!(DeliveryOptions::new(DeliveryMode::Album, 25).item_count(), 10);
        assert_eq!(DeliveryOptions::default().item_count(), 1);
    }

    #[test]
    fn test_link_mode_sends_one_text() {
        let source = source_with(|| Ok(pins(5)));
        let links: Vec<String> = pins(5).into_iter().map(|p| p.link).collect();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(move |chat_id, text, parse_mode| {
                chat_id == "42"
                    && *parse_mode == Some(ParseMode::MarkdownV2)
                    && links.iter().any(|link| text.contains(link.as_str()))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        notifier.expect_send_error().times(0);

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Link, 1).run(&mut rng);

        assert_eq!(outcome, RunOutcome::Delivered { items: 1 });
    }

    #[test]
    fn test_unauthorized_source_is_reported_once() {
        let source = source_with(|| {
            Err(FetchError::Unauthorized {
                service: "Pinterest",
                credential: "PINTEREST_COOKIE",
            }
            .into())
        });

        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().times(0);
        notifier
            .expect_send_error()
            .withf(|chat_id, message| {
                chat_id == "42"
                    && message.contains("Invalid")
                    && message.contains("PINTEREST_COOKIE")
            })
            .times(1)
            .return_const(());

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Link, 1).run(&mut rng);

        assert!(matches!(outcome, RunOutcome::Reported { .. }));
    }

    #[test]
    fn test_empty_source_is_reported_once() {
        let source = source_with(|| Ok(Vec::new()));

        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().times(0);
        notifier
            .expect_send_error()
            .withf(|_, message| message == "No pins found")
            .times(1)
            .return_const(());

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Link, 1).run(&mut rng);

        assert_eq!(
            outcome,
            RunOutcome::Reported {
                error: "No pins found".to_string()
            }
        );
    }

    #[test]
    fn test_send_failure_is_reported_once() {
        let source = source_with(|| Ok(pins(3)));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .times(1)
            .returning(|_, _, _| Err(BotError::Send(TelegramError::Forbidden)));
        notifier
            .expect_send_error()
            .withf(|_, message| message.contains("blocked"))
            .times(1)
            .return_const(());

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Link, 1).run(&mut rng);

        assert!(matches!(outcome, RunOutcome::Reported { .. }));
    }

    #[test]
    fn test_photo_mode_sends_photo() {
        let source = source_with(|| Ok(pins(1)));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_photo()
            .withf(|_, url, caption, _| {
                url == "https://i.pinimg.com/0.jpg" && caption.contains("View Pin")
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Photo, 1).run(&mut rng);

        assert_eq!(outcome, RunOutcome::Delivered { items: 1 });
    }

    #[test]
    fn test_list_mode_sends_numbered_text() {
        let source = source_with(|| Ok(pins(6)));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(|_, text, _| text.lines().count() == 4 && text.starts_with("1\\."))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::List, 4).run(&mut rng);

        assert_eq!(outcome, RunOutcome::Delivered { items: 4 });
    }

    #[test]
    fn test_album_mode_sends_one_group() {
        let source = source_with(|| Ok(pins(5)));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_photo_group()
            .withf(|_, photos: &[Photo], _| photos.len() == 3)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = service(source, notifier, DeliveryMode::Album, 3).run(&mut rng);

        assert_eq!(outcome, RunOutcome::Delivered { items: 3 });
    }

    #[test]
    fn test_send_dispatches_on_body() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(|chat_id, text, parse_mode| chat_id == "7" && text == "hello" && parse_mode.is_none())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(MockContentSource::new(), notifier, DeliveryMode::Link, 1);
        let message = OutboundMessage::new("7", MessageBody::Text("hello".to_string()), None);

        service.send(&message).unwrap();
    }
}
