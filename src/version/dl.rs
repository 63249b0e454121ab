//! Go distribution index client for standard-library releases.
//!
//! Standard-library binaries have no module proxy history; their
//! versions come from the toolchain release index instead. No
//! retraction concept applies there.

use crate::fetch;
use crate::version::error::CatalogError;
use crate::version::semver::compare_toolchain;
use crate::version::types::VersionRecord;

/// Default release index endpoint.
pub const DEFAULT_INDEX_URL: &str = "https://go.dev/dl/?mode=json&include=all";

/// Fetches the toolchain release list from `index_url`, newest first.
///
/// Release versions carry a literal `go` prefix (`go1.21.0`); the sort
/// treats it as the generic `v` prefix so `go1.21.0` orders above
/// `go1.9.0`.
pub async fn releases(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<Vec<VersionRecord>, CatalogError> {
    let body = fetch::get_body(client, index_url).await?;
    let mut releases: Vec<VersionRecord> =
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode {
            url: index_url.to_string(),
            reason: e.to_string(),
        })?;
    releases.sort_by(|a, b| compare_toolchain(&b.version, &a.version));
    Ok(releases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn releases_sorts_go_versions_descending() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/dl/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"version": "go1.9.0", "stable": true},
                    {"version": "go1.21.0", "stable": true},
                    {"version": "go1.20.5", "stable": true}
                ]"#,
            )
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/dl/?mode=json&include=all", server.url());
        let releases = releases(&client, &url).await.unwrap();

        mock.assert_async().await;
        let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["go1.21.0", "go1.20.5", "go1.9.0"]);
    }

    #[tokio::test]
    async fn releases_reports_invalid_json_as_decode_failure() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/dl/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/dl/?mode=json&include=all", server.url());
        let err = releases(&client, &url).await.unwrap_err();

        assert!(matches!(err, CatalogError::Decode { .. }));
    }
}
