//! HTTP catalog client.

use async_trait::async_trait;
use pokedex_core::{CatalogEntryDetail, EntryList, TypeName};
use pokedex_fetch::{FetchError, HttpClient};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

use crate::api::{ListResponse, PokemonResponse, TypeDetailResponse, TypeListResponse};
use crate::cache::{CatalogCache, MemoCache};
use crate::source::CatalogApi;

// ============================================================================
// Constants
// ============================================================================

/// List endpoint.
const POKEMON_ENDPOINT: &str = "pokemon";

/// Type endpoint.
const TYPE_ENDPOINT: &str = "type";

// ============================================================================
// Catalog Client
// ============================================================================

/// REST client for the upstream catalog.
///
/// Cloning is cheap; clones share the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    base_url: Url,
    cache: Option<Arc<CatalogCache>>,
}

impl CatalogClient {
    /// The public catalog service.
    pub const DEFAULT_BASE_URL: &'static str = "https://pokeapi.co/api/v2";

    /// Creates a client with a default [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_http(HttpClient::new()?, base_url)
    }

    /// Creates a client over an existing [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` does not parse or
    /// cannot carry a path.
    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!("{base_url}: not a base URL")));
        }

        Ok(Self {
            http,
            base_url,
            cache: None,
        })
    }

    /// Memoizes responses in `cache`.
    pub fn with_cache(mut self, cache: Arc<CatalogCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The base URL all endpoints hang off.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The injected cache, if any.
    pub fn cache(&self) -> Option<&Arc<CatalogCache>> {
        self.cache.as_ref()
    }

    /// Builds `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `url`, consulting `memo` first and storing successes in it.
    async fn fetch_memoized<W, V>(
        &self,
        url: &Url,
        memo: Option<&MemoCache<V>>,
        convert: impl FnOnce(W) -> V,
    ) -> Result<V, FetchError>
    where
        W: serde::de::DeserializeOwned,
        V: Clone,
    {
        let key = cache_key(url);

        if let Some(memo) = memo {
            if let Some(hit) = memo.get(&key).await {
                debug!(key = %key, "Memo hit");
                return Ok(hit);
            }
        }

        let response: W = self.http.fetch_json(url).await?;
        let value = convert(response);

        if let Some(memo) = memo {
            memo.insert(key, value.clone()).await;
        }

        Ok(value)
    }
}

/// Memo key for a request: path plus query, independent of the host.
fn cache_key(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Lower-cases and trims a user-supplied name, rejecting blanks.
fn normalize_name(name: &str) -> Result<String, FetchError> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(FetchError::InvalidUrl("name must not be empty".to_string()));
    }
    Ok(normalized)
}

#[async_trait]
impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list_entries(&self, limit: usize, offset: usize) -> Result<EntryList, FetchError> {
        let mut url = self.endpoint(&[POKEMON_ENDPOINT])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let memo = self.cache.as_ref().map(|c| &c.lists);
        self.fetch_memoized(&url, memo, |response: ListResponse| {
            let mut list = EntryList::from(response);
            list.results.truncate(limit);
            list
        })
        .await
    }

    #[instrument(skip(self))]
    async fn entry_detail(&self, name_or_id: &str) -> Result<CatalogEntryDetail, FetchError> {
        let name = normalize_name(name_or_id)?;
        let url = self.endpoint(&[POKEMON_ENDPOINT, &name])?;

        let memo = self.cache.as_ref().map(|c| &c.details);
        self.fetch_memoized(&url, memo, |response: PokemonResponse| {
            CatalogEntryDetail::from(response)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn type_names(&self) -> Result<Vec<TypeName>, FetchError> {
        let url = self.endpoint(&[TYPE_ENDPOINT])?;

        let memo = self.cache.as_ref().map(|c| &c.type_names);
        self.fetch_memoized(&url, memo, TypeListResponse::into_type_names)
            .await
    }

    #[instrument(skip(self))]
    async fn type_members(&self, type_name: &str) -> Result<Vec<String>, FetchError> {
        let name = normalize_name(type_name)?;
        let url = self.endpoint(&[TYPE_ENDPOINT, &name])?;

        let memo = self.cache.as_ref().map(|c| &c.type_members);
        self.fetch_memoized(&url, memo, TypeDetailResponse::into_member_names)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pokedex_fetch::RetryStrategy;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn pikachu_json() -> Value {
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "sprites": {
                "front_default": "https://img/25.png",
                "other": { "official-artwork": { "front_default": "https://img/art/25.png" } }
            },
            "types": [{ "slot": 1, "type": { "name": "electric", "url": "" } }],
            "stats": [{ "base_stat": 35, "stat": { "name": "hp", "url": "" } }],
            "abilities": [{ "ability": { "name": "static", "url": "" } }]
        })
    }

    fn client_for(server: &MockServer) -> CatalogClient {
        let http = HttpClient::new()
            .unwrap()
            .with_retry_strategy(RetryStrategy::default().with_base_delay(Duration::from_millis(5)));
        CatalogClient::with_http(http, &server.url("/api/v2")).unwrap()
    }

    #[test]
    fn test_endpoint_building() {
        let client = CatalogClient::new(CatalogClient::DEFAULT_BASE_URL).unwrap();
        let url = client.endpoint(&["pokemon", "mr. mime"]).unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon/mr.%20mime");

        let trailing = CatalogClient::new("https://pokeapi.co/api/v2/").unwrap();
        let url = trailing.endpoint(&["type"]).unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/type");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            CatalogClient::new("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            CatalogClient::new("mailto:ash@example.com"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_cache_key_ignores_host() {
        let a = Url::parse("https://a.example/api/v2/pokemon?limit=20&offset=0").unwrap();
        let b = Url::parse("http://b.example/api/v2/pokemon?limit=20&offset=0").unwrap();
        assert_eq!(cache_key(&a), cache_key(&b));
        assert_eq!(cache_key(&a), "/api/v2/pokemon?limit=20&offset=0");
    }

    #[tokio::test]
    async fn test_list_entries() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/pokemon")
                .query_param("limit", "2")
                .query_param("offset", "2");
            then.status(200).json_body(json!({
                "count": 1302,
                "next": "next-page",
                "previous": "previous-page",
                "results": [
                    { "name": "ivysaur", "url": "u2" },
                    { "name": "venusaur", "url": "u3" }
                ]
            }));
        });

        let client = client_for(&server);
        let list = client.list_entries(2, 2).await.unwrap();

        assert_eq!(list.count, 1302);
        assert!(list.next_page_exists);
        assert!(list.previous_page_exists);
        assert_eq!(list.results.len(), 2);
        assert_eq!(list.results[1].name, "venusaur");
        mock.assert();
    }

    #[tokio::test]
    async fn test_list_entries_never_exceeds_limit() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/pokemon");
            then.status(200).json_body(json!({
                "count": 3,
                "next": null,
                "previous": null,
                "results": [
                    { "name": "a", "url": "" },
                    { "name": "b", "url": "" },
                    { "name": "c", "url": "" }
                ]
            }));
        });

        let client = client_for(&server);
        let list = client.list_entries(1, 0).await.unwrap();
        assert_eq!(list.results.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_detail_is_case_insensitive() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/pokemon/pikachu");
            then.status(200).json_body(pikachu_json());
        });

        let client = client_for(&server);
        let upper = client.entry_detail("PIKACHU").await.unwrap();
        let lower = client.entry_detail("pikachu").await.unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.id, 25);
        // No cache injected: both calls hit the network
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_cache_serves_repeated_calls() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/pokemon/pikachu");
            then.status(200).json_body(pikachu_json());
        });

        let cache = Arc::new(CatalogCache::default());
        let client = client_for(&server).with_cache(cache.clone());

        let first = client.entry_detail("Pikachu").await.unwrap();
        let second = client.entry_detail("pikachu").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.details.len().await, 1);
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/pokemon/missingno");
            then.status(404);
        });

        let cache = Arc::new(CatalogCache::default());
        let client = client_for(&server).with_cache(cache.clone());

        let err = client.entry_detail("missingno").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(cache.details.is_empty().await);
        mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_request() {
        let server = MockServer::start_async().await;
        let client = client_for(&server);
        assert!(matches!(
            client.entry_detail("   ").await,
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_type_names() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/type");
            then.status(200).json_body(json!({
                "count": 3,
                "results": [
                    { "name": "normal", "url": "" },
                    { "name": "fighting", "url": "" },
                    { "name": "fire", "url": "" }
                ]
            }));
        });

        let client = client_for(&server);
        let names = client.type_names().await.unwrap();
        assert_eq!(
            names,
            vec![TypeName::new("normal"), TypeName::new("fighting"), TypeName::new("fire")]
        );
    }

    #[tokio::test]
    async fn test_type_members_lowercases_input() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/type/fire");
            then.status(200).json_body(json!({
                "pokemon": [
                    { "pokemon": { "name": "charmander", "url": "" } },
                    { "pokemon": { "name": "charmeleon", "url": "" } }
                ]
            }));
        });

        let client = client_for(&server);
        let members = client.type_members("FIRE").await.unwrap();
        assert_eq!(members, vec!["charmander", "charmeleon"]);
        mock.assert();
    }
}
