//! CSS selectors for catalog listing pages.
//!
//! All markup assumptions live here. When the site layout changes, capture
//! an HTML sample, update the selectors, and add a fixture under
//! `tests/fixtures/`.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for listing pages.
pub mod listing {
    use super::*;

    /// Repeated item container, one per catalog entry.
    pub static ITEM: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".product_pod").unwrap());

    /// Cover image whose alt text carries the full title.
    pub static TITLE_IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".image_container img").unwrap());

    /// Attribute on the cover image holding the title.
    pub static TITLE_ATTR: &str = "alt";

    /// Displayed price.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".price_color").unwrap());

    /// Pager label ("Page 1 of 50").
    pub static CURRENT_PAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("li.current").unwrap());
}

/// Selectors for pagination.
pub mod pagination {
    use super::*;

    /// Next page link.
    pub static NEXT: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".next > a").unwrap());

    /// Attribute holding the (usually relative) link target.
    pub static HREF_ATTR: &str = "href";
}
