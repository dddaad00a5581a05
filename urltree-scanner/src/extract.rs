use crate::classify;
use crate::result::{Extraction, LinkRecord};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

/// Display labels are cut to this many characters.
pub const MAX_TEXT_CHARS: usize = 200;

const FALLBACK_TEXT: &str = "Unknown";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Extract the page links from `html`, resolved against `base`.
///
/// Never fails: anchors whose href cannot be resolved are logged and dropped.
/// The result is deduplicated by url (first occurrence wins) and sorted with
/// internal links first, then by url.
pub fn extract(html: &str, base: &Url) -> Extraction {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let resolved = match classify::resolve(base, href) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => continue,
            Err(e) => {
                warn!("Invalid URL: {}", e);
                continue;
            }
        };

        if !seen.insert(resolved.url.clone()) {
            debug!("Duplicate link {}", resolved.url);
            continue;
        }

        links.push(LinkRecord {
            url: resolved.url,
            text: display_text(&element, href),
            link_type: resolved.link_type,
        });
    }

    links.sort_by(|a, b| {
        a.link_type
            .cmp(&b.link_type)
            .then_with(|| a.url.cmp(&b.url))
    });

    debug!("Extracted {} links from {}", links.len(), base);
    Extraction::new(links)
}

fn display_text(element: &ElementRef, href: &str) -> String {
    let own_text = element.text().collect::<String>();
    let own_text = own_text.trim();

    let label = if !own_text.is_empty() {
        own_text
    } else {
        [element.value().attr("title"), element.value().attr("aria-label")]
            .into_iter()
            .flatten()
            .chain(std::iter::once(href))
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(FALLBACK_TEXT)
    };

    label.chars().take(MAX_TEXT_CHARS).collect()
}
