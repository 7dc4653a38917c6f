use async_trait::async_trait;

use crate::core::WatchResult;

use super::banner::BannerImage;

/// Produces the banner images currently visible on the target page.
///
/// Launch and navigation problems are hard errors; an absent container or
/// an empty banner list is reported as an empty collection.
#[async_trait]
pub trait BannerExtractor: Send + Sync {
    async fn extract(&self) -> WatchResult<Vec<BannerImage>>;
}
