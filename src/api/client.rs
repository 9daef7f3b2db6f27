//! PokeAPI HTTP client with response caching
//!
//! Every request is keyed by its full URL. A cached body is decoded without
//! touching the network; on a miss the body is fetched, decoded, and only
//! then stored, so failed requests never poison the cache.

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::{LocationArea, LocationAreaPage, Pokemon};
use crate::cache::{Cache, CacheError};

/// Base URL for the public PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when fetching PokeAPI data
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The response cache could not be created
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// The configured API root is not a usable base URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Settings for building a [`PokeApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; a trailing slash is optional
    pub base_url: String,
    /// Timeout applied to each HTTP request
    pub timeout: Duration,
    /// Maximum age of a cached response (also the reaper period)
    pub cache_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
            cache_interval: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Client for the PokeAPI location and Pokemon endpoints
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http_client: Client,
    cache: Cache,
    base_url: Url,
}

impl PokeApiClient {
    /// Creates a new client and starts its response cache
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Returns
    /// * `Ok(PokeApiClient)` on success
    /// * `Err(ApiError::Cache)` if the cache interval is zero
    /// * `Err(ApiError::InvalidBaseUrl)` if `base_url` cannot take path segments
    /// * `Err(ApiError::RequestFailed)` if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        let cache = Cache::new(config.cache_interval)?;
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            cache,
            base_url,
        })
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment
    ///
    /// A name containing `/`, `?` or `#` stays inside its own path segment
    /// instead of changing which resource is requested.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    /// The response cache shared by all requests from this client
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Fetches one page of location areas
    ///
    /// # Arguments
    /// * `page_url` - A `next`/`previous` URL from an earlier page, or `None`
    ///   for the first page
    pub async fn list_locations(
        &self,
        page_url: Option<&str>,
    ) -> Result<LocationAreaPage, ApiError> {
        let url = match page_url {
            Some(url) => url.to_string(),
            None => self.endpoint(&["location-area"]),
        };
        self.fetch_json(&url).await
    }

    /// Fetches a single location area by name or id
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let url = self.endpoint(&["location-area", name, ""]);
        self.fetch_json(&url).await
    }

    /// Fetches a single Pokemon by name or id
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = self.endpoint(&["pokemon", name]);
        self.fetch_json(&url).await
    }

    /// Stops the cache reaper and waits for it to exit
    pub async fn shutdown(self) {
        self.cache.shutdown().await;
    }

    /// Returns the decoded body for `url`, from the cache when possible
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        if let Some(body) = self.cache.get(url) {
            tracing::debug!(url, bytes = body.len(), "cache hit");
            return Ok(serde_json::from_slice(&body)?);
        }

        tracing::debug!(url, "cache miss, fetching");
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(url, %status, "request failed");
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body)?;

        tracing::debug!(url, bytes = body.len(), "caching response");
        self.cache.add(url, body);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE_ONE: &str = r#"{
        "count": 4,
        "next": "NEXT_URL",
        "previous": null,
        "results": [
            {"name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/"},
            {"name": "eterna-city-area", "url": "https://pokeapi.co/api/v2/location-area/2/"}
        ]
    }"#;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "height": 4,
        "weight": 60,
        "stats": [],
        "types": []
    }"#;

    fn client_for(server: &MockServer) -> PokeApiClient {
        PokeApiClient::new(ClientConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .expect("Failed to build client")
    }

    #[tokio::test]
    async fn test_new_rejects_zero_cache_interval() {
        let result = PokeApiClient::new(ClientConfig {
            cache_interval: Duration::ZERO,
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::Cache(_))));
    }

    #[tokio::test]
    async fn test_endpoint_ignores_base_url_trailing_slash() {
        for base_url in [DEFAULT_BASE_URL, "https://pokeapi.co/api/v2/"] {
            let client = PokeApiClient::new(ClientConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(
                client.endpoint(&["location-area"]),
                "https://pokeapi.co/api/v2/location-area"
            );
            assert_eq!(
                client.endpoint(&["location-area", "canalave-city-area", ""]),
                "https://pokeapi.co/api/v2/location-area/canalave-city-area/"
            );
        }
    }

    #[tokio::test]
    async fn test_endpoint_percent_encodes_names() {
        let client = PokeApiClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(&["pokemon", "mr/mime?x#y"]),
            "https://pokeapi.co/api/v2/pokemon/mr%2Fmime%3Fx%23y"
        );
    }

    #[tokio::test]
    async fn test_new_rejects_unusable_base_url() {
        for base_url in ["not a url", "mailto:ash@example.com"] {
            let result = PokeApiClient::new(ClientConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            });
            assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
        }
    }

    #[tokio::test]
    async fn test_name_with_reserved_characters_stays_in_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu%3Fshiny"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PIKACHU))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PIKACHU))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.pokemon("pikachu?shiny").await.unwrap();

        let encoded = format!("{}/pokemon/pikachu%3Fshiny", server.uri());
        assert!(client.cache().get(&encoded).is_some());
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_list_locations_first_page_is_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_ONE))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        let first = client.list_locations(None).await.expect("first fetch");
        let second = client.list_locations(None).await.expect("cached fetch");

        assert_eq!(first.results.len(), 2);
        assert_eq!(second.results[0].name, "canalave-city-area");
        let key = format!("{}/location-area", server.uri());
        assert!(client.cache().get(&key).is_some());
    }

    #[tokio::test]
    async fn test_list_locations_follows_page_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"count": 4, "next": null, "previous": "prev", "results": [{"name": "pastoria-city-area", "url": "u"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page_url = format!("{}/location-area/page-2", server.uri());

        let page = client.list_locations(Some(&page_url)).await.unwrap();

        assert!(page.next.is_none());
        assert_eq!(page.previous.as_deref(), Some("prev"));
        assert_eq!(page.results[0].name, "pastoria-city-area");
    }

    #[tokio::test]
    async fn test_pokemon_cache_hit_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PIKACHU))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        for _ in 0..3 {
            let pokemon = client.pokemon("pikachu").await.unwrap();
            assert_eq!(pokemon.base_experience, Some(112));
        }
    }

    #[tokio::test]
    async fn test_location_area_uses_trailing_slash_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/canalave-city-area/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id": 1, "name": "canalave-city-area", "pokemon_encounters": [
                    {"pokemon": {"name": "tentacool", "url": "u"}}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let area = client.location_area("canalave-city-area").await.unwrap();

        assert_eq!(area.pokemon_encounters[0].pokemon.name, "tentacool");
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);

        for _ in 0..2 {
            let err = client.pokemon("missingno").await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)));
        }
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.pokemon("pikachu").await.unwrap_err();

        match err {
            ApiError::Status { status, .. } => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("unexpected error: {other}"),
        }
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.pokemon("pikachu").await.unwrap_err();

        assert!(matches!(err, ApiError::ParseError(_)));
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cached_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PIKACHU))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = format!("{}/pokemon/pikachu", server.uri());
        client.cache().add(url, &b"not json"[..]);

        let err = client.pokemon("pikachu").await.unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_shutdown_completes() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        client.shutdown().await;
    }
}
