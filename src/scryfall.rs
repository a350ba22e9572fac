//! HTTP client for the Scryfall card API.
//!
//! Two endpoints are used: `GET /cards/search?q=...` for free-text search and
//! `GET /cards/{set}/{number}` for resolving a single printing. Failed
//! requests come back as a Scryfall error object, which is mapped onto
//! [`DeckError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config;
use crate::error::{DeckError, Result};
use crate::lookup::CardLookup;
use crate::models::Card;

/// Error object Scryfall returns with every non-2xx response.
#[derive(Debug, Deserialize)]
struct ApiError {
    status: u16,
    code: String,
    details: String,
}

/// One page of a paginated card list.
#[derive(Debug, Deserialize)]
struct CardList {
    data: Vec<Card>,
    #[serde(default)]
    has_more: bool,
    next_page: Option<String>,
}

/// Async client for the Scryfall API.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: Client,
    api_base: Url,
    max_search_pages: usize,
}

impl ScryfallClient {
    /// Create a client against `api_base` (normally [`config::API_BASE`]).
    ///
    /// `max_search_pages` bounds how many result pages a single
    /// [`search`](Self::search) follows; values below 1 are treated as 1.
    pub fn new(api_base: &str, timeout: Duration, max_search_pages: usize) -> Result<Self> {
        let api_base = Url::parse(api_base).map_err(|e| {
            DeckError::InvalidArgument(format!("Invalid API base URL {}: {}", api_base, e))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(DeckError::InvalidArgument(format!(
                "API base URL cannot carry a path: {}",
                api_base
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base,
            max_search_pages: max_search_pages.max(1),
        })
    }

    /// Fetch the printing `collector_number` of set `set_code`.
    pub async fn card_by_set_number(&self, set_code: &str, collector_number: &str) -> Result<Card> {
        if set_code.is_empty() || collector_number.is_empty() {
            return Err(DeckError::InvalidArgument(
                "set code and collector number are required".into(),
            ));
        }
        let url = self.endpoint(&["cards", set_code, collector_number])?;
        self.get_json(url).await
    }

    /// Free-text search using Scryfall's query syntax.
    ///
    /// A query with no matches is reported by Scryfall as a 404 and surfaces
    /// here as [`DeckError::NotFound`].
    pub async fn search(&self, query: &str) -> Result<Vec<Card>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DeckError::InvalidArgument("search query is empty".into()));
        }

        let mut url = self.endpoint(&["cards", "search"])?;
        url.query_pairs_mut().append_pair("q", query);

        let mut cards = Vec::new();
        let mut pages = 0;
        loop {
            let page: CardList = self.get_json(url).await?;
            pages += 1;
            cards.extend(page.data);

            match page.next_page {
                Some(next) if page.has_more && pages < self.max_search_pages => {
                    url = Url::parse(&next).map_err(|e| {
                        DeckError::InvalidArgument(format!("Bad next_page URL {}: {}", next, e))
                    })?;
                }
                _ => break,
            }
        }
        Ok(cards)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DeckError::InvalidArgument(format!(
                    "API base URL cannot carry a path: {}",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let body = resp.text().await?;
        Err(error_from_body(status.as_u16(), &body))
    }
}

/// Map a non-2xx response body onto a [`DeckError`].
fn error_from_body(status: u16, body: &str) -> DeckError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) if status == 404 || err.code == "not_found" => DeckError::NotFound(err.details),
        Ok(err) => DeckError::Api {
            status: err.status,
            code: err.code,
            details: err.details,
        },
        Err(_) if status == 404 => DeckError::NotFound("HTTP 404 from Scryfall".into()),
        Err(_) => DeckError::Api {
            status,
            code: "unknown".into(),
            details: body.chars().take(200).collect(),
        },
    }
}

#[async_trait]
impl CardLookup for ScryfallClient {
    async fn card_by_set_number(&self, set_code: &str, collector_number: &str) -> Result<Card> {
        ScryfallClient::card_by_set_number(self, set_code, collector_number).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Card>> {
        ScryfallClient::search(self, query).await
    }
}
