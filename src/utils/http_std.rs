use std::time::Duration;

use log::debug;
use reqwest::{header, Client, Proxy};
use thiserror::Error;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to set proxy: {0}")]
    Proxy(#[source] reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to send request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Where outgoing subscription requests are routed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Connect directly, ignoring proxy environment variables
    #[default]
    Direct,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`ALL_PROXY`
    System,
    /// Route everything through this proxy URL
    Custom(String),
}

pub fn parse_proxy(proxy_str: &str) -> ProxyConfig {
    match proxy_str.trim() {
        "" | "NONE" => ProxyConfig::Direct,
        "SYSTEM" => ProxyConfig::System,
        other => ProxyConfig::Custom(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub proxy: ProxyConfig,
    pub max_size: usize,
}

impl From<&Settings> for FetchOptions {
    fn from(settings: &Settings) -> Self {
        FetchOptions {
            user_agent: settings.fetch_user_agent.clone(),
            timeout: Duration::from_secs(settings.fetch_timeout),
            proxy: parse_proxy(&settings.proxy_subscription),
            max_size: settings.max_allowed_download_size,
        }
    }
}

/// Fetch `url` and return its body as text.
///
/// Non-2xx statuses are errors. Bodies larger than `options.max_size` are
/// rejected, checked against `Content-Length` first and again while reading.
pub async fn web_get_async(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    let mut client_builder = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str());

    client_builder = match &options.proxy {
        ProxyConfig::Direct => client_builder.no_proxy(),
        ProxyConfig::System => client_builder,
        ProxyConfig::Custom(proxy) => {
            client_builder.proxy(Proxy::all(proxy.as_str()).map_err(FetchError::Proxy)?)
        }
    };

    let client = client_builder.build().map_err(FetchError::Client)?;

    debug!("Fetching subscription from {}", url);
    let mut response = client
        .get(url)
        .header(header::ACCEPT, "*/*")
        .send()
        .await
        .map_err(FetchError::Request)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let limit = options.max_size;
    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(FetchError::TooLarge { limit });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(FetchError::Body)? {
        if body.len() + chunk.len() > limit {
            return Err(FetchError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    debug!("Fetched {} bytes from {}", body.len(), url);

    Ok(String::from_utf8_lossy(&body).into_owned())
}
