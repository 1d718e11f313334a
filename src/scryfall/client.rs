//! Blocking Scryfall HTTP client.
//!
//! Built on `reqwest::blocking`, so every call must run off the async
//! runtime (tool routes use `spawn_blocking`). The underlying HTTP client is
//! created lazily on the first request for the same reason.

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::{ProviderError, ProviderResult};
use super::model::{Card, SearchOptions, SearchPage};
use super::provider::{CardProvider, RequestScope};
use crate::core::config::ScryfallConfig;

/// Scryfall list object returned by `/cards/search`.
#[derive(Debug, Deserialize)]
struct CardList {
    #[serde(default)]
    data: Vec<Card>,
    #[serde(default)]
    total_cards: Option<usize>,
    #[serde(default)]
    has_more: bool,
}

/// Scryfall error object.
#[derive(Debug, Deserialize)]
struct ApiError {
    status: u16,
    code: String,
    details: String,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    #[serde(flatten)]
    options: &'a SearchOptions,
}

/// Card provider backed by the Scryfall REST API.
pub struct ScryfallClient {
    config: ScryfallConfig,
    http: OnceLock<reqwest::blocking::Client>,
    last_request: Mutex<Option<Instant>>,
}

impl ScryfallClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: ScryfallConfig) -> Self {
        Self {
            config,
            http: OnceLock::new(),
            last_request: Mutex::new(None),
        }
    }

    /// The API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn http(&self) -> ProviderResult<&reqwest::blocking::Client> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(self.http.get_or_init(|| client))
    }

    /// Build the search URL for a query.
    pub fn search_url(&self, query: &str, options: &SearchOptions) -> ProviderResult<String> {
        let params = serde_urlencoded::to_string(SearchParams { q: query, options })
            .map_err(|e| ProviderError::http(format!("Failed to encode query: {}", e)))?;
        Ok(format!("{}/cards/search?{}", self.base_url(), params))
    }

    /// Build the lookup URL for a card id.
    pub fn card_url(&self, id: &str) -> String {
        format!("{}/cards/{}", self.base_url(), id)
    }

    /// Sleep until the configured spacing since the previous request has passed.
    fn throttle(&self) {
        let interval = Duration::from_millis(self.config.request_interval_ms);
        if interval.is_zero() {
            return;
        }

        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    /// Send a GET request and return the status with the raw body.
    fn get(&self, scope: &RequestScope, url: &str) -> ProviderResult<(u16, Vec<u8>)> {
        scope.check()?;
        let client = self.http()?;
        self.throttle();
        scope.check()?;

        let mut request = client.get(url).header(reqwest::header::ACCEPT, "application/json");
        if let Some(left) = scope.remaining() {
            let configured = Duration::from_secs(self.config.timeout_secs);
            request = request.timeout(left.min(configured));
        }

        debug!("GET {}", url);
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                if scope.check().is_err() {
                    ProviderError::DeadlineExceeded
                } else {
                    ProviderError::http("Request timed out")
                }
            } else if e.is_connect() {
                ProviderError::http("Connection failed")
            } else {
                ProviderError::http(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ProviderError::decode(e.to_string()))?;

        debug!("Response {} ({} bytes)", status, body.len());
        Ok((status, body.to_vec()))
    }
}

/// Decode a search response body.
fn decode_search(status: u16, body: &[u8]) -> ProviderResult<SearchPage> {
    if (200..300).contains(&status) {
        let list: CardList = serde_json::from_slice(body)
            .map_err(|e| ProviderError::decode(format!("JSON parse error: {e}")))?;
        let total_cards = list.total_cards.unwrap_or(list.data.len());
        return Ok(SearchPage {
            cards: list.data,
            total_cards,
            has_more: list.has_more,
        });
    }

    match decode_error(status, body) {
        // A search that matches nothing is reported as a 404.
        ProviderError::Api { status: 404, .. } => Ok(SearchPage::default()),
        other => Err(other),
    }
}

/// Decode a single-card response body.
fn decode_card(status: u16, body: &[u8]) -> ProviderResult<Card> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body)
            .map_err(|e| ProviderError::decode(format!("JSON parse error: {e}")));
    }

    match decode_error(status, body) {
        ProviderError::Api {
            status: 404,
            details,
            ..
        } => Err(ProviderError::NotFound(details)),
        other => Err(other),
    }
}

/// Map a non-success response to a provider error.
fn decode_error(status: u16, body: &[u8]) -> ProviderError {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(error) => ProviderError::api(error.status, error.code, error.details),
        Err(_) => {
            warn!("Undecodable error response with status {}", status);
            ProviderError::api(status, "unknown", format!("HTTP status {}", status))
        }
    }
}

impl CardProvider for ScryfallClient {
    #[instrument(skip(self, scope, options))]
    fn search_cards(
        &self,
        scope: &RequestScope,
        query: &str,
        options: &SearchOptions,
    ) -> ProviderResult<SearchPage> {
        let url = self.search_url(query, options)?;
        let (status, body) = self.get(scope, &url)?;
        decode_search(status, &body)
    }

    #[instrument(skip(self, scope))]
    fn get_card(&self, scope: &RequestScope, id: &str) -> ProviderResult<Card> {
        let (status, body) = self.get(scope, &self.card_url(id))?;
        decode_card(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scryfall::query;

    fn client() -> ScryfallClient {
        ScryfallClient::new(ScryfallConfig::default())
    }

    #[test]
    fn test_search_url_encodes_query_and_options() {
        let url = client()
            .search_url(&query::exact_name("Llanowar Elves"), &SearchOptions::default())
            .unwrap();
        assert!(url.starts_with("https://api.scryfall.com/cards/search?q="));
        assert!(url.contains("q=%21%22Llanowar+Elves%22"));
        assert!(url.contains("unique=cards"));
        assert!(url.contains("include_variations=false"));
    }

    #[test]
    fn test_card_url_trims_trailing_slash() {
        let client = ScryfallClient::new(ScryfallConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..ScryfallConfig::default()
        });
        assert_eq!(client.card_url("abc"), "http://localhost:9000/cards/abc");
    }

    #[test]
    fn test_decode_search_page() {
        let body = br#"{"object":"list","total_cards":2,"has_more":false,
            "data":[{"id":"a","name":"A"},{"id":"b","name":"B"}]}"#;
        let page = decode_search(200, body).unwrap();
        assert_eq!(page.cards.len(), 2);
        assert_eq!(page.total_cards, 2);
    }

    #[test]
    fn test_decode_search_not_found_is_empty() {
        let body = br#"{"object":"error","code":"not_found","status":404,
            "details":"Your query didn't match any cards."}"#;
        let page = decode_search(404, body).unwrap();
        assert!(page.cards.is_empty());
    }

    #[test]
    fn test_decode_search_bad_query_is_error() {
        let body = br#"{"object":"error","code":"bad_request","status":400,
            "details":"All of your terms were ignored."}"#;
        let err = decode_search(400, body).unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
    }

    #[test]
    fn test_decode_card_not_found() {
        let body = br#"{"object":"error","code":"not_found","status":404,"details":"No card found"}"#;
        assert!(matches!(
            decode_card(404, body),
            Err(ProviderError::NotFound(_))
        ));
    }

    #[test]
    fn test_decode_error_without_body() {
        let err = decode_error(502, b"<html>Bad Gateway</html>");
        assert!(matches!(err, ProviderError::Api { status: 502, .. }));
    }

    #[test]
    fn test_cancelled_scope_skips_request() {
        let scope = RequestScope::unbounded();
        scope.cancel();
        let result = client().search_cards(&scope, "flying", &SearchOptions::default());
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    // Integration tests (require network, run with: cargo test -- --ignored)
    #[ignore]
    #[test]
    fn test_search_live() {
        let page = client()
            .search_cards(
                &RequestScope::unbounded(),
                &query::exact_name("Llanowar Elves"),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(page.cards[0].name, "Llanowar Elves");
    }
}
