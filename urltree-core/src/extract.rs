use tracing::info;
use url::Url;
use urltree_scanner::error::Result;
use urltree_scanner::{Extraction, Fetcher};

/// Fetch `url` and extract its links. Relative links are resolved against
/// the requested URL, not the end of any redirect chain.
pub async fn extract_url(fetcher: &Fetcher, url: &str) -> Result<Extraction> {
    let page = fetcher.fetch(url).await?;
    let extraction = urltree_scanner::extract(&page.body, &page.url);
    info!(
        "Extracted {} links from {} ({} internal, {} external)",
        extraction.count,
        page.url,
        extraction.internal().count(),
        extraction.external().count()
    );
    Ok(extraction)
}

/// Generate a text report for one extraction
pub fn generate_extraction_report(extraction: &Extraction, source_url: &str) -> String {
    let internal: Vec<_> = extraction.internal().collect();
    let external: Vec<_> = extraction.external().collect();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Source: {}\n", source_url));
    report.push_str(&format!("  Links found: {}\n", extraction.count));
    report.push_str(&format!("  Internal: {}\n", internal.len()));
    report.push_str(&format!("  External: {}\n", external.len()));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if !internal.is_empty() {
        report.push_str("## Internal\n");
        for link in internal {
            report.push_str(&format!(
                "  \x1b[32m{}\x1b[0m \x1b[90m{}\x1b[0m\n",
                Url::parse(&link.url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_else(|_| link.url.clone()),
                link.text
            ));
        }
        report.push('\n');
    }

    if !external.is_empty() {
        report.push_str("## External\n");
        for link in external {
            report.push_str(&format!(
                "  \x1b[36m{}\x1b[0m \x1b[90m{}\x1b[0m\n",
                link.url, link.text
            ));
        }
        report.push('\n');
    }

    report
}
