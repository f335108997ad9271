use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Pins,
    Articles,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Pins => "pins",
            SourceType::Articles => "articles",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pins" | "pin" | "pinterest" => Ok(SourceType::Pins),
            "articles" | "article" | "raindrop" => Ok(SourceType::Articles),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Pin,
    Article,
}

/// A normalized pin or article, ready for formatting
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub kind: ItemKind,
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub image_url: Option<String>,
    /// Board name for pins, domain for articles
    pub source_label: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    pub fn new(
        kind: ItemKind,
        id: String,
        title: String,
        link: String,
        source_label: String,
    ) -> Self {
        Self {
            kind,
            id,
            title,
            description: None,
            link,
            image_url: None,
            source_label,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Parse an API timestamp, accepting RFC 3339 and RFC 2822
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
