//! Shared HTTP fetch primitive used by both resolvers.

use thiserror::Error;
use tracing::debug;

/// Failure of a single HTTP body fetch.
///
/// Every variant carries the URL so callers can report which mirror or
/// document broke.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Fetches the body of `url` with a GET request. Any status other than
/// 200 is an error.
pub async fn get_body(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|e| FetchError::Network {
        url: url.to_string(),
        source: e,
    })
}
