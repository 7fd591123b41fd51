//! Page retrieval and HTML-to-text extraction for URL analysis.

use std::time::Duration;

use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;

/// Settings for the HTTP client used by [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Overall request timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("seo-analyzer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Source of raw page markup for a URL.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP with a single blocking GET, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = validate_url(url)?;

        info!(url = %parsed, "fetching page");
        let response = self.client.get(parsed).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "page fetch returned non-success status");
            return Err(FetchError::Status(status));
        }

        let body = response.text()?;
        info!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}

/// Parse `url` and require an http(s) scheme.
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Concatenate every text node of the document, in document order, with no
/// separator. Title and script text are included; all markup is dropped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text: String = document.root_element().text().collect();
    debug!(
        html_bytes = html.len(),
        text_bytes = text.len(),
        "extracted page text"
    );
    text
}
