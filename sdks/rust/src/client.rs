//! HTTP client for the memory inspection API.

use crate::{
    error::{Error, Result},
    types::*,
};
use url::Url;

/// HTTP client for the API.
///
/// # Example
///
/// ```rust,no_run
/// use memory_browser_sdk::{Client, EventQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?;
///
/// let memories = client.memories().list().await?;
/// if let Some(first) = memories.first() {
///     let memory = client.memories().get(&first.id).await?;
///     println!("{} has {} strategies", memory.id, memory.strategies.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:8080")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the Memories API (memories, events, records).
    pub fn memories(&self) -> MemoriesApi<'_> {
        MemoriesApi { client: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Build an endpoint URL from raw path segments. Each segment is
    /// percent-encoded, so identifiers may contain `/` or spaces.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            })
        }
    }
}

// =============================================================================
// Memories API
// =============================================================================

/// Memories API client.
#[derive(Debug)]
pub struct MemoriesApi<'a> {
    client: &'a Client,
}

impl<'a> MemoriesApi<'a> {
    /// List all memories.
    pub async fn list(&self) -> Result<Vec<MemorySummary>> {
        let url = self.client.endpoint(&["api", "memories"]);
        let response = self.client.http.get(url).send().await?;
        Client::handle_response(response).await
    }

    /// Get a memory with its strategies.
    pub async fn get(&self, memory_id: &str) -> Result<Memory> {
        let url = self.client.endpoint(&["api", "memories", memory_id]);
        let response = self.client.http.get(url).send().await?;
        Client::handle_response(response).await
    }

    /// List events for a session/actor pair.
    pub async fn list_events(&self, memory_id: &str, query: &EventQuery) -> Result<EventsPage> {
        let mut url = self
            .client
            .endpoint(&["api", "memories", memory_id, "events"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("session_id", &query.session_id)
                .append_pair("actor_id", &query.actor_id)
                .append_pair("max_results", &query.max_results.to_string());
            if let Some(token) = &query.next_token {
                pairs.append_pair("next_token", token);
            }
        }
        let response = self.client.http.get(url).send().await?;
        Client::handle_response(response).await
    }

    /// List records stored in a namespace.
    pub async fn list_records(&self, memory_id: &str, query: &RecordQuery) -> Result<RecordsPage> {
        let mut url = self
            .client
            .endpoint(&["api", "memories", memory_id, "records"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("namespace", &query.namespace);
            if let Some(strategy_id) = &query.memory_strategy_id {
                pairs.append_pair("memory_strategy_id", strategy_id);
            }
            pairs.append_pair("max_results", &query.max_results.to_string());
            if let Some(token) = &query.next_token {
                pairs.append_pair("next_token", token);
            }
        }
        let response = self.client.http.get(url).send().await?;
        Client::handle_response(response).await
    }

    /// Search records in a namespace.
    pub async fn retrieve(&self, memory_id: &str, req: &RetrieveRequest) -> Result<RecordsPage> {
        let url = self
            .client
            .endpoint(&["api", "memories", memory_id, "retrieve"]);
        let response = self.client.http.post(url).json(req).send().await?;
        Client::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = Client::new("http://localhost:8080").unwrap();
        let url = client.endpoint(&["api", "memories", "mem/1 a"]);
        assert_eq!(url.as_str(), "http://localhost:8080/api/memories/mem%2F1%20a");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let client = Client::new("http://localhost:8080/proxy/").unwrap();
        let url = client.endpoint(&["api", "memories"]);
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/api/memories");
    }

    #[test]
    fn test_rejects_cannot_be_a_base_url() {
        assert!(matches!(
            Client::new("mailto:someone@example.com"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
