//! HTML parser for catalog listing pages.

use crate::catalog::models::{CatalogPage, Record};
use crate::catalog::selectors::{listing, pagination};
use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use url::Url;

/// Parser for catalog listing HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a listing page into records and next-page links.
    ///
    /// `page_url` is the URL the page was served from; relative pagination
    /// links are resolved against it. Parsing never fails: markup that does
    /// not match yields empty fields or an empty page.
    pub fn parse_page(&self, html: &str, page_url: &Url) -> CatalogPage {
        let document = Html::parse_document(html);
        let mut page = CatalogPage::default();

        for element in document.select(&listing::ITEM) {
            let record = self.parse_item(element);
            trace!("Parsed record: {} - {}", record.title, record.price);
            page.records.push(record);
        }

        for element in document.select(&pagination::NEXT) {
            let Some(href) = element.value().attr(pagination::HREF_ATTR) else {
                debug!("Next link without href on {}", page_url);
                continue;
            };

            match resolve_link(page_url, href) {
                Some(next) => page.next_pages.push(next),
                None => debug!("Ignoring unusable next link {:?} on {}", href, page_url),
            }
        }

        page.page_label = document
            .select(&listing::CURRENT_PAGE)
            .next()
            .map(|e| collapse_whitespace(&e.text().collect::<String>()))
            .filter(|label| !label.is_empty());

        debug!(
            "Parsed {} records from {} (next: {})",
            page.count(),
            page_url,
            page.has_next()
        );

        page
    }

    /// Builds a record from a single item element.
    ///
    /// The title is the first image's `alt`; the price is the text of every
    /// matching price element, concatenated. Both are trimmed.
    fn parse_item(&self, element: ElementRef) -> Record {
        let title = element
            .select(&listing::TITLE_IMAGE)
            .next()
            .and_then(|e| e.value().attr(listing::TITLE_ATTR))
            .map(|alt| alt.trim().to_string())
            .unwrap_or_default();

        let price = element
            .select(&listing::PRICE)
            .flat_map(|e| e.text())
            .collect::<String>()
            .trim()
            .to_string();

        Record { title, price }
    }
}

/// Resolves a (possibly relative) href against the page URL.
///
/// Returns `None` for fragment-only links, non-navigational schemes, and
/// anything that does not resolve to an http(s) URL. The fragment is
/// stripped from the result.
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
