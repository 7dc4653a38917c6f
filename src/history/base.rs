use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::extract::BannerImage;

use super::fingerprint::fingerprint;

pub const RETENTION_DAYS: i64 = 90;

/// A banner the system has decided to remember. Written at most once per
/// fingerprint, never updated; removal after `expires_at` is the store's
/// own expiry mechanism, not application code.
#[derive(Debug, Clone, Serialize)]
pub struct BannerRecord {
    pub fingerprint: String,
    pub first_seen: DateTime<Utc>,
    pub src: String,
    pub alt: String,
    pub title: String,
    pub class_name: String,
    pub expires_at: DateTime<Utc>,
}

impl BannerRecord {
    pub fn from_banner(banner: &BannerImage, first_seen: DateTime<Utc>) -> Self {
        Self {
            fingerprint: fingerprint(banner),
            first_seen,
            src: banner.src.clone(),
            alt: banner.alt.clone(),
            title: banner.title.clone(),
            class_name: banner.class_name.clone(),
            expires_at: first_seen + Duration::days(RETENTION_DAYS),
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All fingerprints currently on record. A read failure degrades to an
    /// empty set: the pipeline then treats every banner as new, which can
    /// produce duplicate notifications but never aborts the run.
    async fn known_fingerprints(&self) -> HashSet<String>;

    /// Persists one record per banner in a single batch, with
    /// `first_seen = now` and a 90-day expiry. Returns false on write
    /// failure; the caller continues to notification either way.
    /// Re-saving an already known banner is idempotent in effect.
    async fn save_new(&self, banners: &[BannerImage]) -> bool;

    /// The subsequence of `all` not yet on record, original order kept.
    async fn filter_new(&self, all: &[BannerImage]) -> Vec<BannerImage> {
        let known = self.known_fingerprints().await;
        all.iter()
            .filter(|banner| !known.contains(&fingerprint(banner)))
            .cloned()
            .collect()
    }
}
