use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Raw page body plus what we learned fetching it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was asked for. Links are resolved against this one.
    pub url: Url,
    /// Where the redirect chain ended.
    pub final_url: Url,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
    pub body: String,
}

pub struct Fetcher {
    client: Client,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(FetchOptions::default())
    }

    pub fn with_options(options: FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .default_headers(headers)
            .timeout(options.timeout)
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
            .build()
            .map_err(|e| ScanError::ClientBuild(e.to_string()))?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Check that `url` is a well-formed http(s) URL.
    pub fn validate_url(url: &str) -> Result<Url> {
        if url.trim().is_empty() {
            return Err(ScanError::InvalidInput("URL is required".to_string()));
        }

        let parsed = Url::parse(url)
            .map_err(|_| ScanError::InvalidInput("Invalid URL format".to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidInput(
                "Only HTTP and HTTPS URLs are allowed".to_string(),
            ));
        }

        Ok(parsed)
    }

    /// GET `url` and return its body. Any final status below 400 is success.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let parsed = Self::validate_url(url)?;
        info!("Fetching {}", parsed);

        let start = Instant::now();
        let response = self.client.get(parsed.clone()).send().await?;
        let response_time = start.elapsed();

        let status = response.status();
        if status.as_u16() >= 400 {
            debug!("{} answered {}", parsed, status);
            return Err(ScanError::from_status(status));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes, status {}, {:?})",
            final_url,
            body.len(),
            status.as_u16(),
            response_time
        );

        Ok(FetchedPage {
            url: parsed,
            final_url,
            status_code: status.as_u16(),
            content_type,
            response_time,
            body,
        })
    }
}
