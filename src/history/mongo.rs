use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};

use crate::core::{WatchError, WatchResult};
use crate::extract::BannerImage;

use super::base::{BannerRecord, HistoryStore};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// History store backed by a MongoDB collection. The fingerprint is the
/// `_id`, so the store enforces the one-record-per-fingerprint invariant,
/// and a TTL index on `expires_at` handles retention.
pub struct MongoHistory {
    collection: Collection<Document>,
}

impl MongoHistory {
    pub async fn new(uri: &str, database: &str, collection: &str) -> WatchResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection::<Document>(collection);

        let ttl_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();
        collection.create_index(ttl_index).await?;

        Ok(Self { collection })
    }

    fn to_document(record: &BannerRecord) -> Document {
        doc! {
            "_id": &record.fingerprint,
            "first_seen": record.first_seen.to_rfc3339(),
            "src": &record.src,
            "alt": &record.alt,
            "title": &record.title,
            "className": &record.class_name,
            "expires_at": mongodb::bson::DateTime::from_millis(record.expires_at.timestamp_millis()),
        }
    }
}

impl From<mongodb::error::Error> for WatchError {
    fn from(err: mongodb::error::Error) -> Self {
        WatchError::StorageError(err.to_string())
    }
}

fn only_duplicate_keys(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().all(|e| e.code == DUPLICATE_KEY_CODE)),
        _ => false,
    }
}

#[async_trait]
impl HistoryStore for MongoHistory {
    async fn known_fingerprints(&self) -> HashSet<String> {
        match self.collection.distinct("_id", doc! {}).await {
            Ok(values) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            Err(err) => {
                // Degrades to "everything is new" rather than failing the
                // run; duplicate notifications are the accepted cost.
                warn!("Could not read banner history: {}", err);
                HashSet::new()
            }
        }
    }

    async fn save_new(&self, banners: &[BannerImage]) -> bool {
        if banners.is_empty() {
            return true;
        }

        let now = Utc::now();
        let documents: Vec<Document> = banners
            .iter()
            .map(|banner| Self::to_document(&BannerRecord::from_banner(banner, now)))
            .collect();

        // Unordered, so a duplicate key does not block the rest of the batch.
        match self.collection.insert_many(documents).ordered(false).await {
            Ok(result) => {
                info!("Persisted {} new banner records", result.inserted_ids.len());
                true
            }
            Err(err) if only_duplicate_keys(&err) => {
                debug!("All banner records were already present");
                true
            }
            Err(err) => {
                error!("Failed to persist banner records: {}", err);
                false
            }
        }
    }
}
