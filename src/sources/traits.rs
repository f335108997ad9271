use crate::domain::{ContentItem, SourceType};
use crate::errors::BotResult;

#[cfg_attr(test, mockall::automock)]
pub trait ContentSource: Send + Sync {
    /// Identifies this source type
    fn source_type(&self) -> SourceType;

    /// Fetch the current collection and return its usable items.
    /// Records missing the fields needed for rendering are dropped here.
    fn fetch_items(&self) -> BotResult<Vec<ContentItem>>;
}
