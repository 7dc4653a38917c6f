use serde::{Deserialize, Serialize};

// Sentinels substituted for missing attributes, matching what the page
// script has always reported. Downstream code may rely on the exact text.
pub const NO_SRC: &str = "No src attribute";
pub const NO_ALT: &str = "No alt attribute";
pub const NO_TITLE: &str = "No title attribute";
pub const NO_CLASS: &str = "No class";

/// One image found inside the banner container. `list_index` and
/// `image_index` record where it sat in the markup; identity for
/// deduplication is the `(src, alt)` pair only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerImage {
    pub list_index: usize,
    pub image_index: usize,
    pub src: String,
    pub alt: String,
    pub title: String,
    pub class_name: String,
}
