pub mod core;
pub mod extract;
pub mod history;
pub mod notify;

pub use crate::core::{RunReport, RunResponse, Runner, WatchConfig, WatchError, WatchResult};
pub use crate::extract::{BannerExtractor, BannerImage, ChromeExtractor, MockExtractor};
pub use crate::history::{BannerRecord, HistoryStore, MemoryHistory, MongoHistory};
pub use crate::notify::SlackNotifier;
