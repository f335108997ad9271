use telegram::ParseMode;

/// How the picked items are delivered to the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// One item, rendered as a text message
    #[default]
    Link,
    /// One item, sent as a photo with the rendered item as caption
    Photo,
    /// Several items, rendered as a numbered text list
    List,
    /// Several items, sent as one photo album
    Album,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Link => "link",
            DeliveryMode::Photo => "photo",
            DeliveryMode::List => "list",
            DeliveryMode::Album => "album",
        }
    }

    /// Whether this mode delivers more than one item
    pub fn is_multi(&self) -> bool {
        matches!(self, DeliveryMode::List | DeliveryMode::Album)
    }
}

impl std::str::FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "link" | "text" => Ok(DeliveryMode::Link),
            "photo" => Ok(DeliveryMode::Photo),
            "list" => Ok(DeliveryMode::List),
            "album" | "group" => Ok(DeliveryMode::Album),
            _ => Err(format!("Unknown delivery mode: {}", s)),
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Photo(Photo),
    Album(Vec<Photo>),
}

/// A formatted payload for one chat, consumed once by a `Notifier`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: String,
    pub body: MessageBody,
    /// `None` sends the text as is
    pub parse_mode: Option<ParseMode>,
}

impl OutboundMessage {
    pub fn new(chat_id: &str, body: MessageBody, parse_mode: Option<ParseMode>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            body,
            parse_mode,
        }
    }
}
