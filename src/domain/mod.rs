pub mod item;
pub mod message;

pub use item::{parse_timestamp, ContentItem, ItemKind, SourceType};
pub use message::{DeliveryMode, MessageBody, OutboundMessage, Photo};
