use crate::core::title::{extract_title, split_title};
use crate::domain::model::ResolvedPost;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, SafariError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("safari-gold/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// reqwest-backed fetcher. Sends a fixed User-Agent since some sites
/// (Wikimedia among them) reject anonymous clients.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| SafariError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Making request to: {}", url);
        let retrieval_error = |source| SafariError::RetrievalError {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(retrieval_error)?;
        tracing::debug!("Response status: {}", response.status());

        if !response.status().is_success() {
            return Err(SafariError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(retrieval_error)
    }
}

pub struct TitleResolver<F: PageFetcher> {
    fetcher: F,
    separators: Vec<String>,
}

impl<F: PageFetcher> TitleResolver<F> {
    pub fn new(fetcher: F, separators: Vec<String>) -> Self {
        Self {
            fetcher,
            separators,
        }
    }

    pub async fn resolve(&self, url: &str) -> Result<ResolvedPost> {
        validate_url("url", url)?;

        let body = self.fetcher.fetch(url).await?;
        let title = extract_title(&body).ok_or_else(|| SafariError::ParseError {
            url: url.to_string(),
        })?;

        let post = split_title(&title, &self.separators);
        tracing::debug!(
            "Resolved {} -> title: {:?}, site: {:?}",
            url,
            post.thread_title,
            post.site_name
        );
        Ok(post)
    }
}
