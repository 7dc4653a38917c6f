use sha2::{Digest, Sha256};

use crate::extract::BannerImage;

/// Deduplication key: SHA-256 over `src` then `alt`, as lowercase hex.
/// Positional metadata never participates, so the same banner at a new
/// slot keeps its fingerprint.
pub fn fingerprint(banner: &BannerImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(banner.src.as_bytes());
    hasher.update(banner.alt.as_bytes());
    format!("{:x}", hasher.finalize())
}
