use std::ffi::OsStr;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use log::info;
use url::Url;

use crate::core::{WatchError, WatchResult};

use super::banner::BannerImage;
use super::dom::collect_banner_images;
use super::extractor::BannerExtractor;

const OPERATION_TIMEOUT_SECS: u64 = 30;

// Banner images are injected by client-side scripts after the load event,
// so the DOM is only read once the page's resource count has been stable
// for a quiet window. The loop is bounded by the same 30s ceiling as the
// other tab operations.
const NETWORK_IDLE_SCRIPT: &str = r#"
(async () => {
    const quietMillis = 500;
    const ceilingMillis = 30000;
    const started = Date.now();
    let seen = performance.getEntriesByType('resource').length;
    let lastChange = Date.now();
    while (Date.now() - started < ceilingMillis) {
        await new Promise((resolve) => setTimeout(resolve, 250));
        const current = performance.getEntriesByType('resource').length;
        if (current !== seen) {
            seen = current;
            lastChange = Date.now();
        } else if (Date.now() - lastChange >= quietMillis) {
            break;
        }
    }
    return seen;
})()
"#;

/// Extracts banners by rendering the target page in a headless Chromium
/// session. One session per extraction; the browser process is torn down
/// when the session leaves scope, on every exit path.
pub struct ChromeExtractor {
    target_url: Url,
    container_id: String,
}

impl ChromeExtractor {
    pub fn new(target_url: Url, container_id: impl Into<String>) -> Self {
        Self {
            target_url,
            container_id: container_id.into(),
        }
    }
}

#[async_trait]
impl BannerExtractor for ChromeExtractor {
    async fn extract(&self) -> WatchResult<Vec<BannerImage>> {
        let target_url = self.target_url.clone();
        let container_id = self.container_id.clone();

        // headless_chrome drives the DevTools protocol over blocking IO.
        tokio::task::spawn_blocking(move || scrape_rendered_page(&target_url, &container_id))
            .await
            .map_err(|e| WatchError::BrowserError(anyhow!("browser task failed: {}", e)))?
    }
}

fn scrape_rendered_page(target_url: &Url, container_id: &str) -> WatchResult<Vec<BannerImage>> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .args(vec![
            OsStr::new("--disable-gpu"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-web-security"),
        ])
        .build()
        .map_err(|e| WatchError::BrowserError(anyhow!("invalid launch options: {}", e)))?;

    let browser = Browser::new(launch_options)?;
    let tab = browser.new_tab()?;
    tab.set_default_timeout(Duration::from_secs(OPERATION_TIMEOUT_SECS));

    info!("Loading {}", target_url);
    tab.navigate_to(target_url.as_str())?;
    tab.wait_until_navigated()?;
    tab.evaluate(NETWORK_IDLE_SCRIPT, true)?;

    let html = tab.get_content()?;
    Ok(collect_banner_images(&html, container_id))
}
