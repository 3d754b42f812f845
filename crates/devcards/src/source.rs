use crate::prelude::*;
use crate::settings::Settings;
use devcards_core::article::{decode_articles, Article};
use std::future::Future;
use std::time::Duration;

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("devcards/", env!("CARGO_PKG_VERSION"));

/// Something that can produce the current article list
pub trait ArticleSource: Send + Sync {
    fn fetch_articles(&self) -> impl Future<Output = std::result::Result<Vec<Article>, Error>> + Send;
}

/// Article source backed by the Dev.to HTTP API
#[derive(Debug, Clone)]
pub struct HttpArticleSource {
    client: reqwest::Client,
    endpoint: String,
    per_page: u32,
}

impl HttpArticleSource {
    /// Build a source with its own client
    ///
    /// Certificate verification is left at reqwest's default (enabled).
    pub fn new(endpoint: impl Into<String>, per_page: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            per_page,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.endpoint.clone(), settings.per_page, settings.timeout)
    }

    async fn request(&self) -> std::result::Result<Vec<Article>, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("per_page", self.per_page.to_string()),
                ("sort", "-published_at".to_string()),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        decode_articles(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

impl ArticleSource for HttpArticleSource {
    async fn fetch_articles(&self) -> std::result::Result<Vec<Article>, Error> {
        log::debug!("GET {} (per_page={})", self.endpoint, self.per_page);

        let result = self.request().await;

        match &result {
            Ok(articles) => log::info!("Fetched {} articles from {}", articles.len(), self.endpoint),
            Err(e) => log::warn!("Failed to fetch articles from {}: {}", self.endpoint, e),
        }

        result
    }
}
