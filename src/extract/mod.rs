pub mod banner;
pub mod chrome_extractor;
pub mod dom;
pub mod extractor;
pub mod mock_extractor;

pub use banner::{BannerImage, NO_ALT, NO_CLASS, NO_SRC, NO_TITLE};
pub use chrome_extractor::ChromeExtractor;
pub use dom::collect_banner_images;
pub use extractor::BannerExtractor;
pub use mock_extractor::{MockExtractor, MockOutcome};
