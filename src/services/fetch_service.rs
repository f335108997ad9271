use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::domain::ContentItem;
use crate::errors::{BotError, BotResult};
use crate::sources::ContentSource;

pub struct FetchService<S: ContentSource> {
    source: S,
}

impl<S: ContentSource> FetchService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch all usable items from the source
    pub fn fetch_items(&self) -> BotResult<Vec<ContentItem>> {
        let items = self.source.fetch_items()?;

        if items.is_empty() {
            return Err(BotError::EmptyResult(format!(
                "No {} found",
                self.source.source_type()
            )));
        }

        Ok(items)
    }

    /// Fetch the collection and pick `count` distinct items at random
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> BotResult<Vec<ContentItem>> {
        let items = self.fetch_items()?;
        let available = items.len();
        let picked = pick_random(items, count, rng);

        info!(
            source = %self.source.source_type(),
            available,
            picked = picked.len(),
            ids = ?picked.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            "Selected random items"
        );

        Ok(picked)
    }
}

/// Pick `count` distinct elements uniformly at random.
///
/// Asking for at least as many elements as available returns all of them,
/// shuffled. A count of zero is treated as one.
pub fn pick_random<T, R: Rng + ?Sized>(mut items: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    if items.is_empty() {
        return items;
    }

    let count = count.max(1);

    if count == 1 {
        let index = rng.gen_range(0..items.len());
        return vec![items.swap_remove(index)];
    }

    items.shuffle(rng);
    items.truncate(count);
    items
}
