use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Browser error: {0}")]
    BrowserError(anyhow::Error),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<anyhow::Error> for WatchError {
    fn from(err: anyhow::Error) -> Self {
        WatchError::BrowserError(err)
    }
}

pub type WatchResult<T> = Result<T, WatchError>;
