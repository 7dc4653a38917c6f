use url::Url;

use crate::core::errors::{WatchError, WatchResult};

pub const TARGET_URL: &str = "https://hometax.go.kr";
pub const BANNER_CONTAINER_ID: &str = "mf_txppWframe_grpImgGrp";

pub const DEFAULT_TIMEZONE_LABEL: &str = "KST";
pub const DEFAULT_COLLECTION: &str = "banner_history";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "hometax";

/// Environment-derived settings, read once at startup and handed to the
/// components explicitly. The timezone label is display-only; rendered
/// timestamps are always computed at the fixed UTC+9 offset.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub webhook_url: Url,
    pub timezone_label: String,
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub target_url: Url,
    pub banner_container_id: String,
}

impl WatchConfig {
    pub fn from_env() -> WatchResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> WatchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A missing webhook URL aborts before any scraping happens.
        let webhook_url = get("SLACK_WEBHOOK_URL")
            .ok_or_else(|| WatchError::ConfigError("SLACK_WEBHOOK_URL is not set".to_string()))?;
        let webhook_url = Url::parse(&webhook_url)?;

        Ok(Self {
            webhook_url,
            timezone_label: get("TIMEZONE")
                .unwrap_or_else(|| DEFAULT_TIMEZONE_LABEL.to_string()),
            mongo_uri: get("MONGO_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.to_string()),
            database: get("MONGO_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: get("BANNER_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            target_url: Url::parse(TARGET_URL).unwrap(),
            banner_container_id: BANNER_CONTAINER_ID.to_string(),
        })
    }
}
