use reqwest::blocking::Client;
use scraper::Html;
use tracing::{debug, error};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::job::Category;

/// Single-attempt page fetcher. No retries, no backoff.
pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn category_url(&self, category: Category) -> String {
        format!("{}/{}", self.base_url, category.slug())
    }

    /// Fetches and parses one category page.
    pub fn fetch_category(&self, category: Category) -> Result<Html, FetchError> {
        let url = self.category_url(category);
        self.fetch_document(&url).inspect_err(|e| {
            error!(category = %category, error = %e, "failed to fetch category page");
        })
    }

    pub fn fetch_document(&self, url: &str) -> Result<Html, FetchError> {
        debug!(url, "GET");
        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(network)?;
        Ok(Html::parse_document(&body))
    }
}
