use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use reqwest::{Client, ClientBuilder, StatusCode};
use url::Url;

use crate::core::WatchResult;
use crate::extract::BannerImage;

use super::blocks::{build_message, display_time};

const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Posts run summaries to a Slack incoming webhook. Transport problems
/// are reported as `false`, never raised: a lost notification must not
/// fail the run that produced it.
pub struct SlackNotifier {
    webhook_url: Url,
    timezone_label: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: Url, timezone_label: impl Into<String>) -> WatchResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            webhook_url,
            timezone_label: timezone_label.into(),
            client,
        })
    }

    pub async fn notify(&self, banners: &[BannerImage], succeeded: bool, new_only: bool) -> bool {
        let ran_at = display_time(Utc::now(), &self.timezone_label);

        let message = match build_message(banners, succeeded, new_only, &ran_at) {
            Some(message) => message,
            None => {
                info!("No new banners; skipping notification");
                return true;
            }
        };

        match self
            .client
            .post(self.webhook_url.clone())
            .json(&message)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                info!("Slack notification delivered");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!("Slack webhook rejected the message: {} {}", status, body);
                false
            }
            Err(err) => {
                error!("Slack webhook request failed: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{NO_CLASS, NO_TITLE};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn banner(src: &str, alt: &str) -> BannerImage {
        BannerImage {
            list_index: 0,
            image_index: 0,
            src: src.to_string(),
            alt: alt.to_string(),
            title: NO_TITLE.to_string(),
            class_name: NO_CLASS.to_string(),
        }
    }

    fn notifier_for(server: &MockServer) -> SlackNotifier {
        SlackNotifier::new(Url::parse(&server.uri()).unwrap(), "KST").unwrap()
    }

    #[tokio::test]
    async fn accepted_message_reports_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains("배너 1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        assert!(notifier.notify(&[banner("/a.png", "alt")], true, true).await);
    }

    #[tokio::test]
    async fn non_ok_status_reports_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        assert!(!notifier.notify(&[banner("/a.png", "alt")], true, true).await);
    }

    #[tokio::test]
    async fn transport_failure_reports_not_sent() {
        // Nothing listens on this port.
        let notifier =
            SlackNotifier::new(Url::parse("http://127.0.0.1:9").unwrap(), "KST").unwrap();
        assert!(!notifier.notify(&[banner("/a.png", "alt")], true, true).await);
    }

    #[tokio::test]
    async fn empty_new_only_run_sends_nothing_and_reports_sent() {
        let server = MockServer::start().await;

        let notifier = notifier_for(&server);
        assert!(notifier.notify(&[], true, true).await);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_notification_is_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("스크래핑 실패"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        assert!(notifier.notify(&[], false, false).await);
    }
}
