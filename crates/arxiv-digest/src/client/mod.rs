//! arXiv search client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - A fixed delay before each query, as the arXiv API terms ask
//! - Atom feed parsing via feed-rs

mod atom;

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::SearchHit;
use crate::query::SearchQuery;

pub use atom::parse_feed;

/// Anything that can answer a planned query with raw hits.
///
/// The fetch pipeline only sees this trait, so tests can substitute an
/// in-memory backend.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one query, newest submissions first, at most `query.max_results` hits.
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<SearchHit>>;
}

/// arXiv Atom API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query endpoint.
    api_url: String,

    /// Delay before each request.
    rate_limit_delay: Duration,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL is invalid or HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        url::Url::parse(&config.api_url).map_err(ClientError::from)?;

        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            rate_limit_delay: config.rate_limit_delay,
        })
    }

    /// Query parameters for a planned search.
    #[must_use]
    pub fn query_params(query: &SearchQuery) -> Vec<(String, String)> {
        vec![
            ("search_query".to_string(), query.expression()),
            ("start".to_string(), "0".to_string()),
            ("max_results".to_string(), query.max_results.to_string()),
            ("sortBy".to_string(), "submittedDate".to_string()),
            ("sortOrder".to_string(), "descending".to_string()),
        ]
    }

    /// Handle API response status codes.
    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

#[async_trait::async_trait]
impl SearchBackend for ArxivClient {
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<SearchHit>> {
        let params = Self::query_params(query);

        // Rate limit
        tokio::time::sleep(self.rate_limit_delay).await;

        tracing::debug!(query = %query, max_results = query.max_results, "Querying arXiv");
        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let response = self.handle_response(response).await?;
        let body = response.bytes().await?;

        let mut hits = parse_feed(&body)?;
        hits.truncate(usize::try_from(query.max_results).unwrap_or(usize::MAX));
        tracing::info!(query = %query, hits = hits.len(), "arXiv query complete");
        Ok(hits)
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}
