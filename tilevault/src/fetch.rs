//! Tile byte fetching
//!
//! The store never fetches; downloading a tile's bytes once its URL is
//! known is the caller's job. This module is the documented upstream
//! producer for [`TileStore::save`](crate::store::TileStore::save): an
//! HTTP client abstraction plus [`download_tile`], whose failures are the
//! `FetchFailed` half of the error taxonomy.

use thiserror::Error;

/// Errors from fetching tile bytes.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),
}

/// Async HTTP GET abstraction.
///
/// Allows dependency injection and easier testing by enabling mock
/// clients; production code uses [`ReqwestClient`].
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET and returns the response body.
    fn get(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with a 30 second request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(30)
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Transport(format!("failed to read response: {e}")))
    }
}

/// Downloads the bytes for one resolved tile URL.
///
/// Feed the result to the store's `save` together with the descriptor
/// the URL came from.
pub async fn download_tile(
    client: &impl AsyncHttpClient,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    client.get(url).await
}
