//! Async client for the LODsyndesisIE REST API, wrapping reqwest.
//!
//! One connection pool is reused for every call. Each operation builds a
//! query URL, performs a single GET (retrying on 5xx and backing off on
//! 429), then re-joins the response tokens for display.

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use url::Url;

use crate::format::{is_error_page, join_entities, join_space, parse_entities, tokenize_lines};
use crate::query::{
    annotate_url, dataset_discovery_url, entities_url, parse_base_url, AnnotateQuery,
    DatasetDiscoveryQuery, EntitiesQuery, DEFAULT_BASE_URL,
};
use crate::types::{EntityRecord, LodError, LodResult, Service};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

const MAX_RETRIES: u32 = 2;
const MAX_RETRY_AFTER_SECS: u64 = 10;
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Connection settings for [`LodSyndesisClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Client for the LODsyndesisIE services.
#[derive(Clone)]
pub struct LodSyndesisClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl LodSyndesisClient {
    /// Client for the public endpoint with the default timeout.
    pub fn new() -> LodResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client for an explicit endpoint and timeout.
    pub fn with_config(config: ClientConfig) -> LodResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("lodsyndesis-ie/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Base URL every service path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Entities of the text as a tab-separated table, header first.
    ///
    /// Columns are the entity, its DBpedia URI and its LODsyndesis URI,
    /// optionally followed by equivalent URIs and provenance.
    pub async fn get_entities_of_text(&self, query: &EntitiesQuery) -> LodResult<String> {
        let url = entities_url(&self.base_url, query)?;
        let body = self.fetch(Service::GetEntities, url).await?;
        Ok(join_entities(&tokenize_lines(&body)))
    }

    /// Entities of the text parsed into records.
    ///
    /// Parses the service's own tab-separated table, so a cell holding
    /// several space-separated URIs stays in one field.
    pub async fn entities(&self, query: &EntitiesQuery) -> LodResult<Vec<EntityRecord>> {
        let url = entities_url(&self.base_url, query)?;
        let table = self.fetch(Service::GetEntities, url).await?;
        parse_entities(&table)
    }

    /// The text annotated as HTML+RDFa.
    pub async fn export_as_rdfa(&self, query: &AnnotateQuery) -> LodResult<String> {
        self.annotate(Service::ExportAsRdfa, query).await
    }

    /// N-Quads describing each recognized entity.
    pub async fn get_triples_of_entities(&self, query: &AnnotateQuery) -> LodResult<String> {
        self.annotate(Service::GetTriplesOfEntities, query).await
    }

    /// N-Triples relating the entities recognized in the text.
    pub async fn find_related_facts(&self, query: &AnnotateQuery) -> LodResult<String> {
        self.annotate(Service::FindRelatedFacts, query).await
    }

    /// Top-K dataset subsets ranked by coverage or commonalities for the
    /// entities of the text.
    pub async fn text_entities_dataset_discovery(
        &self,
        query: &DatasetDiscoveryQuery,
    ) -> LodResult<String> {
        let url = dataset_discovery_url(&self.base_url, query)?;
        let body = self.fetch(Service::TextEntitiesDatasetDiscovery, url).await?;
        Ok(join_space(&tokenize_lines(&body)))
    }

    async fn annotate(&self, service: Service, query: &AnnotateQuery) -> LodResult<String> {
        let url = annotate_url(&self.base_url, service, query)?;
        let body = self.fetch(service, url).await?;
        Ok(join_space(&tokenize_lines(&body)))
    }

    /// GET a service URL and return the body text.
    async fn fetch(&self, service: Service, url: Url) -> LodResult<String> {
        let mut retries = 0u32;

        loop {
            tracing::debug!(%service, %url, attempt = retries + 1, "GET");
            let resp = self
                .client
                .get(url.clone())
                .header(ACCEPT, service.media_type())
                .header(CONTENT_TYPE, service.media_type())
                .timeout(self.timeout)
                .send()
                .await;

            let r = match resp {
                Ok(r) => r,
                Err(e) => {
                    if retries < MAX_RETRIES {
                        retries += 1;
                        tracing::warn!(%service, error = %e, retries, "request failed, retrying");
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }
                    tracing::error!(%service, error = %e, "request failed");
                    return Err(e.into());
                }
            };

            let status = r.status();

            // Retry on 5xx
            if status.is_server_error() && retries < MAX_RETRIES {
                retries += 1;
                tracing::warn!(%service, status = status.as_u16(), retries, "server error, retrying");
                tokio::time::sleep(backoff(retries)).await;
                continue;
            }

            // Backoff on 429
            if status.as_u16() == 429 && retries < MAX_RETRIES {
                retries += 1;
                let delay = retry_after_delay(r.headers());
                tracing::warn!(%service, ?delay, retries, "rate limited, backing off");
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                tracing::error!(%service, status = status.as_u16(), "request rejected");
                return Err(LodError::Status {
                    service,
                    status: status.as_u16(),
                });
            }

            let body = r.text().await?;
            if !service.returns_html() {
                if let Some(first) = body.lines().next() {
                    if is_error_page(first) {
                        tracing::warn!(%service, line = first, "service returned an HTML error page");
                        return Err(LodError::ErrorPage {
                            service,
                            line: first.to_string(),
                        });
                    }
                }
            }
            return Ok(body);
        }
    }
}

fn backoff(retry: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(retry.saturating_sub(1)))
}

/// Delay before retrying a 429: `Retry-After` seconds, capped.
fn retry_after_delay(headers: &HeaderMap) -> Duration {
    let secs = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LodSyndesisClient::new().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_client_rejects_bad_base() {
        let config = ClientConfig {
            base_url: "::not-a-url".to_string(),
            ..Default::default()
        };
        assert!(LodSyndesisClient::with_config(config).is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(2), Duration::from_millis(1000));
    }

    fn retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_retry_after_is_capped() {
        assert_eq!(retry_after_delay(&retry_after("3600")), Duration::from_secs(10));
        assert_eq!(retry_after_delay(&retry_after(" 3 ")), Duration::from_secs(3));
        assert_eq!(retry_after_delay(&retry_after("0")), Duration::ZERO);
    }

    #[test]
    fn test_retry_after_defaults() {
        assert_eq!(retry_after_delay(&HeaderMap::new()), Duration::from_secs(2));
        assert_eq!(
            retry_after_delay(&retry_after("Wed, 21 Oct 2015 07:28:00 GMT")),
            Duration::from_secs(2)
        );
    }
}
