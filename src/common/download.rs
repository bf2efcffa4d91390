use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{blocking::Client, redirect::Policy};

const USER_AGENT: &str = concat!("highmaps/", env!("CARGO_PKG_VERSION"));

/// Blocking client shared by downloads and export requests.
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(10));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("[common::download] build HTTP client")
}

/// Fetch `url` and return the response body as text.
pub(crate) fn download_text(url: &str) -> Result<String> {
    log::debug!("[common::download] GET {url}");
    http_client(Some(Duration::from_secs(60)))?
        .get(url)
        .send()
        .with_context(|| format!("[common::download] GET {url}"))?
        .error_for_status()
        .with_context(|| format!("[common::download] GET {url} returned error status"))?
        .text()
        .with_context(|| format!("[common::download] read body of {url}"))
}
