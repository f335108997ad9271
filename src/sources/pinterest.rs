use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{PinterestConfig, Secret};
use crate::domain::{parse_timestamp, ContentItem, ItemKind, SourceType};
use crate::errors::{BotError, BotResult, FetchError};
use crate::sources::traits::ContentSource;

const SERVICE: &str = "Pinterest";
const CREDENTIAL: &str = "PINTEREST_COOKIE";

// Undocumented home feed resource, see https://github.com/bstoilov/py3-pinterest
#[derive(Debug, Deserialize)]
struct HomefeedResponse {
    resource_response: Option<ResourceResponse>,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    data: Option<Vec<RawPin>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPin {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    board: Option<RawBoard>,
    created_at: Option<String>,
    images: Option<RawImages>,
}

#[derive(Debug, Deserialize)]
struct RawBoard {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawImages {
    orig: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: Option<String>,
}

pub struct PinterestSource {
    client: Client,
    api_url: String,
    cookie: Secret,
}

impl PinterestSource {
    pub fn new(config: PinterestConfig) -> BotResult<Self> {
        Ok(Self {
            client: super::http_client()?,
            api_url: config.api_url,
            cookie: config.cookie,
        })
    }

    /// Parse a home feed response body into pins that have an image
    fn parse_pins(body: &str) -> BotResult<Vec<ContentItem>> {
        let response: HomefeedResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Schema {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let pins = response
            .resource_response
            .and_then(|r| r.data)
            .unwrap_or_default();

        if pins.is_empty() {
            return Err(BotError::EmptyResult(
                "No pins found. The user may have no pins or the API request failed.".to_string(),
            ));
        }

        let total = pins.len();
        let items: Vec<ContentItem> = pins.into_iter().filter_map(Self::normalize).collect();
        debug!(total, usable = items.len(), "Parsed Pinterest home feed");

        if items.is_empty() {
            return Err(BotError::EmptyResult(
                "No pins with images found in the home feed".to_string(),
            ));
        }

        Ok(items)
    }

    /// Convert a raw pin, dropping it if it has no id or image
    fn normalize(pin: RawPin) -> Option<ContentItem> {
        let id = pin.id.filter(|id| !id.is_empty())?;
        let image_url = pin
            .images
            .and_then(|images| images.orig)
            .and_then(|orig| orig.url)
            .filter(|url| !url.is_empty())?;

        let title = pin
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "No Title".to_string());
        let link = pin
            .link
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| format!("https://www.pinterest.com/pin/{}/", id));
        let board_name = pin
            .board
            .and_then(|board| board.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "No Board".to_string());
        let created_at = pin.created_at.as_deref().and_then(parse_timestamp);

        Some(
            ContentItem::new(ItemKind::Pin, id, title, link, board_name)
                .with_description(pin.description)
                .with_image_url(Some(image_url))
                .with_created_at(created_at),
        )
    }
}

impl ContentSource for PinterestSource {
    fn source_type(&self) -> SourceType {
        SourceType::Pins
    }

    fn fetch_items(&self) -> BotResult<Vec<ContentItem>> {
        info!("Fetching pins from Pinterest home feed");

        let response = self
            .client
            .get(&self.api_url)
            .header(COOKIE, self.cookie.expose())
            .header("x-pinterest-pws-handler", "www/index.js")
            .send()
            .map_err(|e| FetchError::Request {
                service: SERVICE,
                source: e,
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| FetchError::Request {
            service: SERVICE,
            source: e,
        })?;

        if !status.is_success() {
            return Err(
                FetchError::from_status(SERVICE, CREDENTIAL, "Pinterest home feed", status, &body)
                    .into(),
            );
        }

        Self::parse_pins(&body)
    }
}
