//! Remote page retrieval for grading hosted submissions
//!
//! Requires the `fetch` feature to be enabled:
//! ```toml
//! gridmark = { version = "0.4", features = ["fetch"] }
//! ```
//!
//! GitHub "view" URLs are rewritten to their raw-content form; a bare
//! repository URL falls back to `index.html` on the `main` branch. The
//! fallback is a best-effort heuristic, not a contract.

use std::time::Duration;
use thiserror::Error;

/// Bounded timeout for a single request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const RAW_HOST: &str = "raw.githubusercontent.com";

/// Error retrieving a remote page. The grading engine is never invoked
/// when fetching fails.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("fetched page is empty")]
    EmptyBody,
}

/// Rewrite a GitHub view URL into its raw-content URL:
/// `github.com/{user}/{repo}/blob/{branch}/{path}` becomes
/// `raw.githubusercontent.com/{user}/{repo}/{branch}/{path}`
/// (host replaced, `blob` segment dropped). Returns None for anything else.
pub fn rewrite_view_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() >= 5 && parts[2] == "blob" {
        Some(format!(
            "https://{}/{}/{}/{}",
            RAW_HOST,
            parts[0],
            parts[1],
            parts[3..].join("/")
        ))
    } else {
        None
    }
}

/// Fallback URL for a bare repository link: index.html on the main branch
pub fn fallback_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let parts: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() < 2 {
        return None;
    }
    Some(format!(
        "https://{}/{}/{}/main/index.html",
        RAW_HOST,
        parts[0],
        parts[1].trim_end_matches(".git")
    ))
}

/// Fetch one URL with the bounded timeout
pub fn fetch_page(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| FetchError::RequestFailed(e.to_string()))?;
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }
    Ok(body)
}

/// Fetch a submission: rewrite view URLs, then on failure try the
/// main-branch index.html fallback. The first error is reported when the
/// fallback also fails.
pub fn fetch_submission(url: &str) -> Result<String, FetchError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let primary = rewrite_view_url(url).unwrap_or_else(|| url.to_string());
    match fetch_page(&primary) {
        Ok(body) => Ok(body),
        Err(first) => {
            if let Some(fallback) = fallback_url(url) {
                if fallback != primary {
                    if let Ok(body) = fetch_page(&fallback) {
                        return Ok(body);
                    }
                }
            }
            Err(first)
        }
    }
}
