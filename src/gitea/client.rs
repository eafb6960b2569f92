// src/gitea/client.rs
// =============================================================================
// HTTP client for the Gitea REST API.
//
// Endpoints used (all under <server>/api/v1/repos/<owner>/<repo>):
// - GET /topics                 -> {"topics": ["..."]}
// - GET /branches/<branch>      -> {"name": "...", ...}
// - GET /media/<path>?ref=<ref> -> raw bytes (LFS objects resolved)
//
// The /media endpoint is what makes LFS transparent: for a file tracked by
// LFS it streams the real object instead of the pointer text.
//
// Every request carries the static access token, if one is configured.
// Timeouts are set once on the reqwest client; a timed out request surfaces
// as SourceError::Transport like any other network failure.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use url::Url;

use super::source::ContentSource;
use crate::error::SourceError;

// Body of GET /repos/{owner}/{repo}/topics
#[derive(Debug, Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    topics: Vec<String>,
}

// Body of GET /repos/{owner}/{repo}/branches/{branch}
// Gitea returns much more, we only need the name
#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
}

/// Talks to one Gitea server with one access token.
#[derive(Debug, Clone)]
pub struct GiteaClient {
    http: Client,
    base: Url,
    token: String,
}

impl GiteaClient {
    // Creates a client for `server` (e.g. "https://gitea.example.com")
    //
    // Parameters:
    //   server: base URL of the Gitea instance
    //   token: access token, "" for anonymous access
    //   timeout: per-request timeout for every outbound call
    pub fn new(server: &str, token: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base = Url::parse(server).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", server, e)))?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl(format!("not an http(s) base url: {}", server)));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base,
            token: token.to_string(),
        })
    }

    // Builds <server>/api/v1/repos/<owner>/<repo>/<extra...>
    //
    // Each piece is pushed as its own path segment, so names containing
    // '/', '?' or '#' cannot escape into another part of the URL.
    fn repo_url<'a>(
        &self,
        owner: &str,
        repo: &str,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, SourceError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SourceError::InvalidUrl(self.base.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", "repos", owner, repo])
                .extend(extra);
        }
        Ok(url)
    }

    fn media_url(&self, owner: &str, repo: &str, file_path: &str, git_ref: &str) -> Result<Url, SourceError> {
        let path_segments = file_path.split('/').filter(|s| !s.is_empty());
        let mut url = self.repo_url(owner, repo, std::iter::once("media").chain(path_segments))?;

        if !git_ref.is_empty() {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }

        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.http.get(url);
        if self.token.is_empty() {
            request
        } else {
            request.header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
        }
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, SourceError> {
        let response = self.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(SourceError::NotFound),
            status if status.is_success() => Ok(response),
            status => Err(SourceError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl ContentSource for GiteaClient {
    async fn list_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>, SourceError> {
        let url = self.repo_url(owner, repo, ["topics"])?;
        let body: TopicsResponse = self.send(url).await?.json().await?;
        Ok(body.topics)
    }

    async fn has_branch(&self, owner: &str, repo: &str, branch: &str) -> bool {
        let url = match self.repo_url(owner, repo, ["branches", branch]) {
            Ok(url) => url,
            Err(_) => return false,
        };

        let response = match self.send(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(owner, repo, branch, error = %e, "branch lookup failed");
                return false;
            }
        };

        match response.json::<BranchResponse>().await {
            Ok(body) => body.name == branch,
            Err(_) => false,
        }
    }

    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Bytes, SourceError> {
        let url = self.media_url(owner, repo, file_path, git_ref)?;
        let content = self.send(url).await?.bytes().await?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::{Path, Query};
    use axum::http::{header, HeaderMap, StatusCode as ServerStatus};
    use axum::response::IntoResponse;
    use axum::{routing, Json, Router};
    use serde_json::json;

    use super::*;

    // A tiny stand-in for the Gitea API on a loopback port
    //
    // - topics echoes the Authorization header back as the only topic
    // - branches: "main" exists, "renamed" answers with another name,
    //   "broken" fails with 500, everything else is 404
    // - media: "docs/index.html" answers "<path>@<ref>", "broken.html" is 500,
    //   everything else is 404
    async fn spawn_gitea() -> String {
        let app = Router::new()
            .route(
                "/api/v1/repos/:owner/:repo/topics",
                routing::get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    Json(json!({ "topics": [auth] }))
                }),
            )
            .route(
                "/api/v1/repos/:owner/:repo/branches/:branch",
                routing::get(|Path((_, _, branch)): Path<(String, String, String)>| async move {
                    match branch.as_str() {
                        "main" => Json(json!({ "name": "main" })).into_response(),
                        "renamed" => Json(json!({ "name": "other" })).into_response(),
                        "broken" => ServerStatus::INTERNAL_SERVER_ERROR.into_response(),
                        _ => ServerStatus::NOT_FOUND.into_response(),
                    }
                }),
            )
            .route(
                "/api/v1/repos/:owner/:repo/media/*path",
                routing::get(
                    |Path((_, _, path)): Path<(String, String, String)>,
                     Query(query): Query<HashMap<String, String>>| async move {
                        let git_ref = query.get("ref").cloned().unwrap_or_default();
                        match path.as_str() {
                            "docs/index.html" => format!("{}@{}", path, git_ref).into_response(),
                            "broken.html" => ServerStatus::INTERNAL_SERVER_ERROR.into_response(),
                            _ => ServerStatus::NOT_FOUND.into_response(),
                        }
                    },
                ),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client(server: &str) -> GiteaClient {
        GiteaClient::new(server, "secret", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_topics_url() {
        let url = client("https://gitea.example.com").repo_url("org", "site", ["topics"]).unwrap();
        assert_eq!(url.as_str(), "https://gitea.example.com/api/v1/repos/org/site/topics");
    }

    #[test]
    fn test_server_with_subpath() {
        let url = client("https://example.com/gitea/").repo_url("org", "site", ["topics"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/gitea/api/v1/repos/org/site/topics");
    }

    #[test]
    fn test_media_url_with_ref() {
        let url = client("https://gitea.example.com")
            .media_url("org", "site", "/docs/my page.html", "feature/x")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitea.example.com/api/v1/repos/org/site/media/docs/my%20page.html?ref=feature%2Fx"
        );
    }

    #[test]
    fn test_media_url_without_ref() {
        let url = client("https://gitea.example.com")
            .media_url("org", "gitea-pages", "index.html", "")
            .unwrap();
        assert_eq!(url.as_str(), "https://gitea.example.com/api/v1/repos/org/gitea-pages/media/index.html");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_branch_name_is_one_segment() {
        let url = client("https://gitea.example.com")
            .repo_url("org", "site", ["branches", "release/1.0"])
            .unwrap();
        assert_eq!(url.as_str(), "https://gitea.example.com/api/v1/repos/org/site/branches/release%2F1.0");
    }

    #[test]
    fn test_rejects_non_http_server() {
        assert!(GiteaClient::new("ftp://gitea.example.com", "", Duration::from_secs(1)).is_err());
        assert!(GiteaClient::new("not a url", "", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_token_sent_with_requests() {
        let server = spawn_gitea().await;

        let topics = client(&server).list_topics("org", "site").await.unwrap();
        assert_eq!(topics, vec!["token secret".to_string()]);

        let anonymous = GiteaClient::new(&server, "", Duration::from_secs(5)).unwrap();
        let topics = anonymous.list_topics("org", "site").await.unwrap();
        assert_eq!(topics, vec![String::new()]);
    }

    #[tokio::test]
    async fn test_has_branch() {
        let server = spawn_gitea().await;
        let gitea = client(&server);

        assert!(gitea.has_branch("org", "site", "main").await);
        assert!(!gitea.has_branch("org", "site", "renamed").await);
        assert!(!gitea.has_branch("org", "site", "broken").await);
        assert!(!gitea.has_branch("org", "site", "missing").await);
    }

    #[tokio::test]
    async fn test_fetch_raw_statuses() {
        let server = spawn_gitea().await;
        let gitea = client(&server);

        let content = gitea.fetch_raw("org", "site", "/docs/index.html", "main").await.unwrap();
        assert_eq!(&content[..], b"docs/index.html@main");

        let err = gitea.fetch_raw("org", "site", "broken.html", "main").await.unwrap_err();
        assert!(matches!(err, SourceError::Status(500)));

        let err = gitea.fetch_raw("org", "site", "missing.html", "main").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind then drop so nothing listens on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gitea = client(&format!("http://{}", addr));
        let err = gitea.fetch_raw("org", "site", "index.html", "").await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
        assert!(!gitea.has_branch("org", "site", "main").await);
    }
}
