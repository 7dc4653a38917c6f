use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

use super::banner::{BannerImage, NO_ALT, NO_CLASS, NO_SRC, NO_TITLE};

/// Queries the rendered document for banner images.
///
/// A missing container or a container without list items is a soft
/// failure: it is logged and yields an empty collection, so the caller
/// reports "no banners" instead of aborting the run.
pub fn collect_banner_images(html: &str, container_id: &str) -> Vec<BannerImage> {
    let document = Html::parse_document(html);
    let container_selector = Selector::parse(&format!("#{}", container_id)).unwrap();

    let container = match document.select(&container_selector).next() {
        Some(container) => container,
        None => {
            warn!("Banner container #{} not found in page", container_id);
            return Vec::new();
        }
    };

    let item_selector = Selector::parse("li").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let items: Vec<_> = container.select(&item_selector).collect();
    if items.is_empty() {
        warn!("Banner container #{} has no list items", container_id);
        return Vec::new();
    }

    let mut banners = Vec::new();
    for (list_index, item) in items.iter().enumerate() {
        for (image_index, image) in item.select(&image_selector).enumerate() {
            banners.push(BannerImage {
                list_index,
                image_index,
                src: attr_or(&image, "src", NO_SRC),
                alt: attr_or(&image, "alt", NO_ALT),
                title: attr_or(&image, "title", NO_TITLE),
                class_name: attr_or(&image, "class", NO_CLASS),
            });
        }
    }

    debug!("Collected {} banner images from {} list items", banners.len(), items.len());
    banners
}

fn attr_or(element: &ElementRef, name: &str, sentinel: &str) -> String {
    match element.value().attr(name) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => sentinel.to_string(),
    }
}
