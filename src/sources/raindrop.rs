use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::{RaindropConfig, Secret};
use crate::domain::{parse_timestamp, ContentItem, ItemKind, SourceType};
use crate::errors::{BotError, BotResult, FetchError};
use crate::sources::traits::ContentSource;

const SERVICE: &str = "Raindrop.io";
const CREDENTIAL: &str = "RAINDROP_TOKEN";

#[derive(Debug, Deserialize)]
struct RaindropsResponse {
    #[serde(default)]
    result: bool,
    items: Option<Vec<RawRaindrop>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRaindrop {
    #[serde(rename = "_id")]
    id: Option<i64>,
    title: Option<String>,
    excerpt: Option<String>,
    link: Option<String>,
    cover: Option<String>,
    domain: Option<String>,
    created: Option<String>,
}

pub struct RaindropSource {
    client: Client,
    endpoint: Url,
    token: Secret,
    collection_id: String,
}

impl RaindropSource {
    pub fn new(config: RaindropConfig) -> BotResult<Self> {
        let endpoint = Self::build_endpoint(&config.api_url, &config.collection_id)?;

        Ok(Self {
            client: super::http_client()?,
            endpoint,
            token: config.token,
            collection_id: config.collection_id,
        })
    }

    /// `{api_url}/raindrops/{collection_id}`
    fn build_endpoint(api_url: &str, collection_id: &str) -> BotResult<Url> {
        let mut url = Url::parse(api_url)
            .map_err(|e| BotError::Config(format!("Invalid RAINDROP_API_URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| BotError::Config("RAINDROP_API_URL cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["raindrops", collection_id]);

        Ok(url)
    }

    fn parse_articles(body: &str) -> BotResult<Vec<ContentItem>> {
        let response: RaindropsResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Schema {
                service: SERVICE,
                message: e.to_string(),
            })?;

        if !response.result {
            return Err(FetchError::Unsuccessful(
                "Raindrop.io API returned unsuccessful result".to_string(),
            )
            .into());
        }

        let raw = response.items.unwrap_or_default();
        if raw.is_empty() {
            return Err(BotError::EmptyResult(
                "No articles found in the collection".to_string(),
            ));
        }

        let total = raw.len();
        let items: Vec<ContentItem> = raw.into_iter().filter_map(Self::normalize).collect();
        debug!(total, usable = items.len(), "Parsed Raindrop.io collection");

        if items.is_empty() {
            return Err(BotError::EmptyResult(
                "No articles with a link found in the collection".to_string(),
            ));
        }

        Ok(items)
    }

    /// Convert a raw bookmark, dropping it if it has no id or link
    fn normalize(raw: RawRaindrop) -> Option<ContentItem> {
        let id = raw.id?;
        let link = raw.link.filter(|l| !l.trim().is_empty())?;

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string());
        let domain = raw
            .domain
            .filter(|d| !d.trim().is_empty())
            .or_else(|| {
                Url::parse(&link)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
            })
            .unwrap_or_else(|| "unknown".to_string());
        let created_at = raw.created.as_deref().and_then(parse_timestamp);

        Some(
            ContentItem::new(ItemKind::Article, id.to_string(), title, link, domain)
                .with_description(raw.excerpt)
                .with_image_url(raw.cover)
                .with_created_at(created_at),
        )
    }
}

impl ContentSource for RaindropSource {
    fn source_type(&self) -> SourceType {
        SourceType::Articles
    }

    fn fetch_items(&self) -> BotResult<Vec<ContentItem>> {
        info!(collection = %self.collection_id, "Fetching articles from Raindrop.io");

        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(self.token.expose())
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
            let resource = format!("Collection {}", self.collection_id);
            return Err(
                FetchError::from_status(SERVICE, CREDENTIAL, &resource, status, &body).into(),
            );
        }

        Self::parse_articles(&body)
    }
}
