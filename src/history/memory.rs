use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::extract::BannerImage;

use super::base::{BannerRecord, HistoryStore};

/// In-process history store, used by the test suite and for local runs
/// without a database.
#[derive(Default)]
pub struct MemoryHistory {
    records: RwLock<HashMap<String, BannerRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn record(&self, fingerprint: &str) -> Option<BannerRecord> {
        self.records.read().get(fingerprint).cloned()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn known_fingerprints(&self) -> HashSet<String> {
        self.records.read().keys().cloned().collect()
    }

    async fn save_new(&self, banners: &[BannerImage]) -> bool {
        let now = Utc::now();
        let mut records = self.records.write();
        for banner in banners {
            let record = BannerRecord::from_banner(banner, now);
            records.entry(record.fingerprint.clone()).or_insert(record);
        }
        true
    }
}
