use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;

use crate::core::errors::{WatchError, WatchResult};
use crate::extract::{BannerExtractor, BannerImage};
use crate::history::HistoryStore;
use crate::notify::SlackNotifier;

const SUCCESS_MESSAGE: &str = "홈택스 스크래핑 완료";
const FAILURE_MESSAGE: &str = "홈택스 스크래핑 실패";

/// Summary of one orchestration pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_extracted: usize,
    pub new_count: usize,
    pub unique_total: usize,
    pub unique_new: usize,
    pub notification_sent: bool,
    pub duration_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub status_code: u16,
    pub body: String,
}

pub fn failure_response(err: &WatchError) -> RunResponse {
    RunResponse {
        status_code: 500,
        body: json!({
            "message": FAILURE_MESSAGE,
            "error": err.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        })
        .to_string(),
    }
}

/// Sequences one pass: extract, filter against history, persist anything
/// new, notify, summarize. Nothing escapes `handle`; every outcome is a
/// well-formed JSON response.
pub struct Runner {
    extractor: Box<dyn BannerExtractor>,
    history: Arc<dyn HistoryStore>,
    notifier: SlackNotifier,
}

impl Runner {
    pub fn new(
        extractor: Box<dyn BannerExtractor>,
        history: Arc<dyn HistoryStore>,
        notifier: SlackNotifier,
    ) -> Self {
        Self {
            extractor,
            history,
            notifier,
        }
    }

    pub async fn handle(&self) -> RunResponse {
        let started = Instant::now();

        match self.run(started).await {
            Ok(report) => {
                info!(
                    "Run finished: {} extracted, {} new, {:.2}s",
                    report.total_extracted, report.new_count, report.duration_seconds
                );
                RunResponse {
                    status_code: 200,
                    body: json!({
                        "message": SUCCESS_MESSAGE,
                        "total_images_count": report.total_extracted,
                        "new_images_count": report.new_count,
                        "unique_total_count": report.unique_total,
                        "unique_new_count": report.unique_new,
                        "notification_sent": report.notification_sent,
                        "execution_time": format!("{:.2}초", report.duration_seconds),
                        "timestamp": report.timestamp.to_rfc3339(),
                    })
                    .to_string(),
                }
            }
            Err(err) => {
                error!("Run failed: {}", err);
                // Best-effort failure notice. Its own failure is logged
                // and swallowed; it never escalates.
                if !self.notifier.notify(&[], false, false).await {
                    error!("Failure notification could not be delivered");
                }
                failure_response(&err)
            }
        }
    }

    async fn run(&self, started: Instant) -> WatchResult<RunReport> {
        let all = self.extractor.extract().await?;
        info!("Extracted {} banner images", all.len());

        let new = self.history.filter_new(&all).await;
        info!("{} of {} banners are new", new.len(), all.len());

        if !new.is_empty() && !self.history.save_new(&new).await {
            warn!("Could not persist new banner records; continuing to notification");
        }

        let notification_sent = self.notifier.notify(&new, true, true).await;

        Ok(RunReport {
            total_extracted: all.len(),
            new_count: new.len(),
            unique_total: unique_src_count(&all),
            unique_new: unique_src_count(&new),
            notification_sent,
            duration_seconds: started.elapsed().as_secs_f64(),
            timestamp: Utc::now(),
        })
    }
}

fn unique_src_count(banners: &[BannerImage]) -> usize {
    banners
        .iter()
        .filter(|banner| !banner.src.is_empty())
        .map(|banner| banner.src.as_str())
        .collect::<HashSet<_>>()
        .len()
}
