pub mod base;
pub mod fingerprint;
pub mod memory;
pub mod mongo;

pub use base::{BannerRecord, HistoryStore, RETENTION_DAYS};
pub use fingerprint::fingerprint;
pub use memory::MemoryHistory;
pub use mongo::MongoHistory;
