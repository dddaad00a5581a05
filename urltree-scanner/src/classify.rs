use crate::error::{Result, ScanError};
use crate::result::LinkType;
use tracing::debug;
use url::Url;

/// Path suffixes that point at downloads rather than pages.
pub const NON_PAGE_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".exe", ".dmg",
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".mp4", ".mp3", ".avi",
];

const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// An href resolved against the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub link_type: LinkType,
}

/// Resolve `href` against `base` and classify it.
///
/// `Ok(None)` means the href is deliberately skipped (anchors, non-page
/// schemes, downloads). `Err` means the href could not be resolved at all;
/// callers drop it and carry on with the next anchor.
pub fn resolve(base: &Url, href: &str) -> Result<Option<ResolvedUrl>> {
    if is_skipped(href) {
        debug!("Skipping href {:?}", href);
        return Ok(None);
    }

    let full_url = if has_scheme(href) {
        href.to_string()
    } else if href.starts_with("//") {
        format!("{}:{}", base.scheme(), href)
    } else if href.starts_with('/') {
        format!("{}{}", base.origin().ascii_serialization(), href)
    } else {
        base.join(href)
            .map_err(|e| malformed(href, e))?
            .to_string()
    };

    let parsed = Url::parse(&full_url).map_err(|e| malformed(href, e))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        debug!("Skipping non-web scheme {}: {}", parsed.scheme(), href);
        return Ok(None);
    }

    if has_non_page_extension(&parsed) {
        debug!("Skipping file download {}", full_url);
        return Ok(None);
    }

    let link_type = if parsed.host_str() == base.host_str() {
        LinkType::Internal
    } else {
        LinkType::External
    };

    Ok(Some(ResolvedUrl {
        url: full_url,
        link_type,
    }))
}

pub fn is_skipped(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return true;
    }
    let lowered = href.to_ascii_lowercase();
    SKIPPED_SCHEMES.iter().any(|scheme| lowered.contains(scheme))
}

pub fn has_non_page_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    NON_PAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn malformed(href: &str, err: url::ParseError) -> ScanError {
    ScanError::MalformedHref {
        href: href.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_root_relative_is_internal() {
        let resolved = resolve(&base(), "/about").unwrap().unwrap();
        assert_eq!(resolved.url, "https://example.com/about");
        assert_eq!(resolved.link_type, LinkType::Internal);
    }

    #[test]
    fn test_absolute_other_host_is_external() {
        let base = Url::parse("https://example.com").unwrap();
        let resolved = resolve(&base, "https://other.com/x").unwrap().unwrap();
        assert_eq!(resolved.url, "https://other.com/x");
        assert_eq!(resolved.link_type, LinkType::External);
    }

    #[test]
    fn test_absolute_href_kept_as_written() {
        let resolved = resolve(&base(), "https://example.com").unwrap().unwrap();
        assert_eq!(resolved.url, "https://example.com");
        assert_eq!(resolved.link_type, LinkType::Internal);
    }

    #[test]
    fn test_protocol_relative_inherits_scheme() {
        let base = Url::parse("http://example.com/").unwrap();
        let resolved = resolve(&base, "//cdn.example.net/app").unwrap().unwrap();
        assert_eq!(resolved.url, "http://cdn.example.net/app");
        assert_eq!(resolved.link_type, LinkType::External);
    }

    #[test]
    fn test_page_relative_resolution() {
        let resolved = resolve(&base(), "other").unwrap().unwrap();
        assert_eq!(resolved.url, "https://example.com/docs/other");

        let resolved = resolve(&base(), "../up").unwrap().unwrap();
        assert_eq!(resolved.url, "https://example.com/up");
    }

    #[test]
    fn test_root_relative_keeps_port() {
        let base = Url::parse("http://127.0.0.1:8080/index.html").unwrap();
        let resolved = resolve(&base, "/next").unwrap().unwrap();
        assert_eq!(resolved.url, "http://127.0.0.1:8080/next");
        assert_eq!(resolved.link_type, LinkType::Internal);
    }

    #[test]
    fn test_skipped_hrefs() {
        for href in [
            "",
            "#section",
            "javascript:void(0)",
            "mailto:someone@example.com",
            "tel:+15555555555",
            "JavaScript:alert(1)",
        ] {
            assert_eq!(resolve(&base(), href).unwrap(), None, "href {:?}", href);
        }
    }

    #[test]
    fn test_non_web_scheme_is_skipped() {
        assert_eq!(resolve(&base(), "ftp://example.com/pub").unwrap(), None);
        assert_eq!(resolve(&base(), "data:text/plain,hi").unwrap(), None);
    }

    #[test]
    fn test_file_extensions_are_filtered() {
        assert_eq!(resolve(&base(), "report.pdf").unwrap(), None);
        assert_eq!(resolve(&base(), "/images/LOGO.PNG").unwrap(), None);
        assert_eq!(
            resolve(&base(), "https://other.com/archive.zip").unwrap(),
            None
        );
        // Only the path is inspected, not the query.
        assert!(resolve(&base(), "/view?file=a.pdf").unwrap().is_some());
    }

    #[test]
    fn test_malformed_href_is_an_error() {
        let err = resolve(&base(), "http://[::1").unwrap_err();
        assert!(matches!(err, ScanError::MalformedHref { .. }));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://x"));
        assert!(has_scheme("git+ssh://x"));
        assert!(!has_scheme("/path:with-colon"));
        assert!(!has_scheme("page"));
        assert!(!has_scheme("1abc:foo"));
    }
}
