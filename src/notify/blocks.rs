use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::extract::BannerImage;

/// Slack allows 50 blocks per message; stop at 48 to leave headroom for
/// the header, summary and truncation blocks.
pub const MAX_BLOCKS: usize = 48;
pub const ALT_PREVIEW_CHARS: usize = 200;

const KST_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Header { text: BlockText },
    Section { text: BlockText },
    Divider,
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: BlockText {
                kind: "plain_text".to_string(),
                text: text.into(),
            },
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: BlockText {
                kind: "mrkdwn".to_string(),
                text: text.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage {
    pub text: String,
    pub blocks: Vec<Block>,
}

/// Renders a run timestamp at the fixed UTC+9 offset, independent of the
/// host timezone. The label is display-only.
pub fn display_time(at: DateTime<Utc>, label: &str) -> String {
    let offset = FixedOffset::east_opt(KST_OFFSET_HOURS * 3600).unwrap();
    format!(
        "{} {}",
        at.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S"),
        label
    )
}

/// Builds the outbound message for one run, or `None` when a successful
/// new-only run found nothing: "no new banners" is not worth notifying.
pub fn build_message(
    banners: &[BannerImage],
    succeeded: bool,
    new_only: bool,
    ran_at: &str,
) -> Option<SlackMessage> {
    if !succeeded {
        return Some(failure_message(ran_at));
    }
    if banners.is_empty() {
        if new_only {
            return None;
        }
        return Some(empty_message(ran_at));
    }
    Some(results_message(banners, new_only, ran_at))
}

fn failure_message(ran_at: &str) -> SlackMessage {
    let title = "🚨 홈택스 배너 스크래핑 실패";
    SlackMessage {
        text: title.to_string(),
        blocks: vec![
            Block::header(title),
            Block::section(format!(
                "*실행 시간:* {}\n*상태:* 실패\n*이미지 수:* 0개",
                ran_at
            )),
        ],
    }
}

fn empty_message(ran_at: &str) -> SlackMessage {
    SlackMessage {
        text: "홈택스 배너 스크래핑 완료 - 추출된 이미지 없음".to_string(),
        blocks: vec![
            Block::header("📊 홈택스 배너 스크래핑 결과"),
            Block::section(format!(
                "*실행 시간:* {}\n*상태:* 성공\n*추출된 이미지 수:* 0개",
                ran_at
            )),
        ],
    }
}

fn results_message(banners: &[BannerImage], new_only: bool, ran_at: &str) -> SlackMessage {
    let deduped = dedup_by_src(banners);

    let (title, summary, text) = if new_only {
        (
            "🔔 홈택스 신규 배너 알림",
            format!(
                "*실행 시간:* {}\n*상태:* 성공\n*신규 배너 수:* {}개",
                ran_at,
                banners.len()
            ),
            format!("홈택스 신규 배너 {}건 발견", deduped.len()),
        )
    } else {
        (
            "📊 홈택스 배너 스크래핑 결과",
            format!(
                "*실행 시간:* {}\n*상태:* 성공\n*추출된 이미지 수:* {}개",
                ran_at,
                banners.len()
            ),
            format!("홈택스 배너 스크래핑 완료 - {}개 이미지 추출", deduped.len()),
        )
    };

    let mut blocks = vec![Block::header(title), Block::section(summary), Block::Divider];

    for (index, banner) in deduped.iter().enumerate() {
        let sequence = index + 1;
        blocks.push(Block::section(format!(
            "*배너 {}*\n*Alt 텍스트:* {}\n*이미지 URL:* {}",
            sequence,
            preview(&banner.alt),
            banner.src
        )));

        if blocks.len() >= MAX_BLOCKS {
            let omitted = deduped.len() - sequence;
            if omitted > 0 {
                blocks.push(Block::section(format!(
                    "_... 그 외 {}개 이미지 생략_",
                    omitted
                )));
            }
            break;
        }
    }

    SlackMessage { text, blocks }
}

// First occurrence per src wins; insertion order is preserved.
fn dedup_by_src(banners: &[BannerImage]) -> Vec<&BannerImage> {
    let mut seen = HashSet::new();
    banners
        .iter()
        .filter(|banner| seen.insert(banner.src.as_str()))
        .collect()
}

// Character-based, not byte-based: alt texts are Korean.
fn preview(alt: &str) -> String {
    if alt.chars().count() > ALT_PREVIEW_CHARS {
        let cut: String = alt.chars().take(ALT_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        alt.to_string()
    }
}
