use crate::domain::SourceType;
use crate::errors::{BotError, BotResult};

pub const DEFAULT_TELEGRAM_API_URL: &str = telegram::DEFAULT_API_URL;
// Subdomain depends on where the cookie was issued
pub const DEFAULT_PINTEREST_API_URL: &str =
    "https://ru.pinterest.com/_ngjs/resource/UserHomefeedResource/get/";
pub const DEFAULT_RAINDROP_API_URL: &str = "https://api.raindrop.io/rest/v1";

/// A credential that never shows up in logs or debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: Secret,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct PinterestConfig {
    pub api_url: String,
    pub cookie: Secret,
}

#[derive(Debug, Clone)]
pub struct RaindropConfig {
    pub api_url: String,
    pub token: Secret,
    pub collection_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub source: SourceType,
    pinterest_api_url: String,
    pinterest_cookie: Option<Secret>,
    raindrop_api_url: String,
    raindrop_token: Option<Secret>,
    raindrop_collection_id: Option<String>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> BotResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| BotError::MissingEnvVar(key.to_string()));

        let telegram = TelegramConfig {
            api_url: var("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            bot_token: Secret::new(required("TELEGRAM_BOT_TOKEN")?),
            chat_id: required("TELEGRAM_CHAT_ID")?,
        };

        let source = match var("DAILYPIN_SOURCE") {
            Some(raw) => raw.parse::<SourceType>().map_err(BotError::Config)?,
            None => SourceType::Pins,
        };

        Ok(Self {
            telegram,
            source,
            pinterest_api_url: var("PINTEREST_API_URL")
                .unwrap_or_else(|| DEFAULT_PINTEREST_API_URL.to_string()),
            pinterest_cookie: var("PINTEREST_COOKIE").map(Secret::new),
            raindrop_api_url: var("RAINDROP_API_URL")
                .unwrap_or_else(|| DEFAULT_RAINDROP_API_URL.to_string()),
            raindrop_token: var("RAINDROP_TOKEN").map(Secret::new),
            raindrop_collection_id: var("RAINDROP_COLLECTION_ID"),
        })
    }

    /// Settings for the pin source; fails if the cookie is not configured
    pub fn pinterest(&self) -> BotResult<PinterestConfig> {
        let cookie = self
            .pinterest_cookie
            .clone()
            .ok_or_else(|| BotError::MissingEnvVar("PINTEREST_COOKIE".to_string()))?;

        Ok(PinterestConfig {
            api_url: self.pinterest_api_url.clone(),
            cookie,
        })
    }

    /// Settings for the article source; fails if the token or collection is not configured
    pub fn raindrop(&self) -> BotResult<RaindropConfig> {
        let token = self
            .raindrop_token
            .clone()
            .ok_or_else(|| BotError::MissingEnvVar("RAINDROP_TOKEN".to_string()))?;
        let collection_id = self
            .raindrop_collection_id
            .clone()
            .ok_or_else(|| BotError::MissingEnvVar("RAINDROP_COLLECTION_ID".to_string()))?;

        Ok(RaindropConfig {
            api_url: self.raindrop_api_url.clone(),
            token,
            collection_id,
        })
    }
}
