use reqwest::StatusCode;
use thiserror::Error;

use crate::formatting::truncate;

/// Longest slice of an error response body kept in a `FetchError`
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// Failures talking to a source content API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid {service} credentials, check {credential}")]
    Unauthorized {
        service: &'static str,
        credential: &'static str,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{service} API rate limit exceeded")]
    RateLimited { service: &'static str },

    #[error("{service} API request failed: {status}\n{body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    Unsuccessful(String),

    #[error("{service} API request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected {service} API response: {message}")]
    Schema {
        service: &'static str,
        message: String,
    },
}

impl FetchError {
    /// Map a non-2xx source API response to an error
    pub fn from_status(
        service: &'static str,
        credential: &'static str,
        resource: &str,
        status: StatusCode,
        body: &str,
    ) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => FetchError::Unauthorized {
                service,
                credential,
            },
            StatusCode::NOT_FOUND => FetchError::NotFound(resource.to_string()),
            StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { service },
            _ => FetchError::Status {
                service,
                status: status.as_u16(),
                body: truncate(body.trim(), MAX_ERROR_BODY_LENGTH),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Source errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    EmptyResult(String),

    // Messaging errors
    #[error(transparent)]
    Send(#[from] telegram::TelegramError),

    #[error("Failed to send error notification: {0}")]
    Reporting(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BotResult<T> = Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_names_credential() {
        let err = FetchError::from_status(
            "Raindrop.io",
            "RAINDROP_TOKEN",
            "Collection 1",
            StatusCode::UNAUTHORIZED,
            "",
        );
        assert_eq!(
            err.to_string(),
            "Invalid Raindrop.io credentials, check RAINDROP_TOKEN"
        );
    }

    #[test]
    fn test_not_found_names_resource() {
        let err = FetchError::from_status(
            "Raindrop.io",
            "RAINDROP_TOKEN",
            "Collection 123",
            StatusCode::NOT_FOUND,
            "",
        );
        assert_eq!(err.to_string(), "Collection 123 not found");
    }

    #[test]
    fn test_rate_limited() {
        let err = FetchError::from_status(
            "Pinterest",
            "PINTEREST_COOKIE",
            "Home feed",
            StatusCode::TOO_MANY_REQUESTS,
            "",
        );
        assert_eq!(err.to_string(), "Pinterest API rate limit exceeded");
    }

    #[test]
    fn test_other_status_keeps_code_and_body() {
        let err = FetchError::from_status(
            "Pinterest",
            "PINTEREST_COOKIE",
            "Home feed",
            StatusCode::INTERNAL_SERVER_ERROR,
            "  upstream exploded \n",
        );
        assert_eq!(
            err.to_string(),
            "Pinterest API request failed: 500\nupstream exploded"
        );
    }

    #[test]
    fn test_long_error_body_is_truncated() {
        let body = "word ".repeat(200);
        let err = FetchError::from_status(
            "Pinterest",
            "PINTEREST_COOKIE",
            "Home feed",
            StatusCode::BAD_GATEWAY,
            &body,
        );
        match err {
            FetchError::Status { body, .. } => {
                assert!(body.chars().count() <= MAX_ERROR_BODY_LENGTH + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bot_error_is_transparent_for_fetch() {
        let err: BotError = FetchError::Unsuccessful("nope".to_string()).into();
        assert_eq!(err.to_string(), "nope");
    }
}
