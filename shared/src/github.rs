/// GitHub REST client for the release data shown on the site.
///
/// The aggregator and the API handlers only see the [`ReleaseSource`] trait,
/// so tests can swap in an in-memory source.
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GithubConfig;
use crate::errors::UpstreamError;
use crate::models::{Release, Repository};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = "VidGrab-DownloadCounter";

/// Read-only access to a repository's releases.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// One page of releases, newest first. `page` starts at 1.
    async fn list_releases(&self, per_page: usize, page: u32) -> Result<Vec<Release>, UpstreamError>;

    /// The release currently marked as latest.
    async fn latest_release(&self) -> Result<Release, UpstreamError>;

    /// Repository metadata (star count).
    async fn repository(&self) -> Result<Repository, UpstreamError>;
}

/// [`ReleaseSource`] backed by the GitHub REST API.
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    /// Build a client with the configured timeout and credentials.
    pub fn new(config: GithubConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(build_headers(config.token.as_deref())?)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn repo_endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.config.api_url, self.config.owner, self.config.repo, suffix
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn list_releases(&self, per_page: usize, page: u32) -> Result<Vec<Release>, UpstreamError> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_endpoint("/releases"),
            per_page,
            page
        );
        self.get_json(&url).await
    }

    async fn latest_release(&self) -> Result<Release, UpstreamError> {
        self.get_json(&self.repo_endpoint("/releases/latest")).await
    }

    async fn repository(&self) -> Result<Repository, UpstreamError> {
        self.get_json(&self.repo_endpoint("")).await
    }
}

/// Headers attached to every upstream request.
pub fn build_headers(token: Option<&str>) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| UpstreamError::Transport(format!("Invalid GitHub token: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_without_token() {
        let headers = build_headers(None).unwrap();
        assert_eq!(headers[ACCEPT], "application/vnd.github+json");
        assert_eq!(headers[USER_AGENT], "VidGrab-DownloadCounter");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let headers = build_headers(Some("ghp_abc")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer ghp_abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_repo_endpoints() {
        let client = GithubClient::new(GithubConfig {
            api_url: "http://localhost:9999".into(),
            ..GithubConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.repo_endpoint("/releases/latest"),
            "http://localhost:9999/repos/ellaboevans/vidgrab/releases/latest"
        );
        assert_eq!(client.repo_endpoint(""), "http://localhost:9999/repos/ellaboevans/vidgrab");
    }

    /// Local stand-in for the GitHub API: 404 with a body on `latest`,
    /// a non-JSON 200 on the repo, and one valid release page.
    async fn spawn_upstream() -> String {
        use axum::http::StatusCode;
        use axum::routing::get;

        let app = axum::Router::new()
            .route(
                "/repos/ellaboevans/vidgrab/releases/latest",
                get(|| async { (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#) }),
            )
            .route("/repos/ellaboevans/vidgrab", get(|| async { "not json" }))
            .route(
                "/repos/ellaboevans/vidgrab/releases",
                get(|| async {
                    r#"[{"tag_name":"v1.0.0","assets":[{"name":"VidGrab.exe","browser_download_url":"https://example.com/VidGrab.exe","download_count":3}]}]"#
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn local_client(api_url: String) -> GithubClient {
        GithubClient::new(GithubConfig { api_url, ..GithubConfig::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let client = local_client(spawn_upstream().await);
        match client.latest_release().await {
            Err(UpstreamError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, r#"{"message":"Not Found"}"#);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_json_is_decode_error() {
        let client = local_client(spawn_upstream().await);
        let err = client.repository().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_release_page_decodes() {
        let client = local_client(spawn_upstream().await);
        let page = client.list_releases(100, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].assets[0].download_count, 3);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = local_client(format!("http://{}", addr));
        let err = client.latest_release().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)), "got {:?}", err);
    }
}
