pub mod blocks;
pub mod slack;

pub use blocks::{build_message, display_time, Block, SlackMessage, ALT_PREVIEW_CHARS, MAX_BLOCKS};
pub use slack::SlackNotifier;
