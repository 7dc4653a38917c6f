mod config;
mod errors;
mod runner;

pub use config::WatchConfig;
pub use errors::{WatchError, WatchResult};
pub use runner::{failure_response, RunReport, RunResponse, Runner};
