use std::collections::VecDeque;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{WatchError, WatchResult};

use super::banner::BannerImage;
use super::extractor::BannerExtractor;

pub enum MockOutcome {
    Banners(Vec<BannerImage>),
    Failure(String),
}

/// Scripted extractor for tests: plays back the given outcomes in order,
/// then keeps returning empty results.
pub struct MockExtractor {
    outcomes: Mutex<VecDeque<MockOutcome>>,
}

impl MockExtractor {
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    pub fn with_banners(banners: Vec<BannerImage>) -> Self {
        Self::new(vec![MockOutcome::Banners(banners)])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![MockOutcome::Failure(message.into())])
    }
}

#[async_trait]
impl BannerExtractor for MockExtractor {
    async fn extract(&self) -> WatchResult<Vec<BannerImage>> {
        match self.outcomes.lock().pop_front() {
            Some(MockOutcome::Banners(banners)) => Ok(banners),
            Some(MockOutcome::Failure(message)) => {
                Err(WatchError::BrowserError(anyhow!("{}", message)))
            }
            None => Ok(Vec::new()),
        }
    }
}
