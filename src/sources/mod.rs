pub mod traits;
pub mod pinterest;
pub mod raindrop;

pub use traits::ContentSource;
pub use pinterest::PinterestSource;
pub use raindrop::RaindropSource;

use std::time::Duration;

use reqwest::blocking::Client;

use crate::errors::{BotError, BotResult};

/// Blocking client shared by the source implementations
fn http_client() -> BotResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| BotError::Config(format!("Failed to build HTTP client: {}", e)))
}
