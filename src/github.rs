use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{Profile, Repository, RepositoryDetails, SearchCount};

const MAX_USERNAME_LEN: usize = 39;
const MAX_REPO_NAME_LEN: usize = 100;

/// Which kind of item an issue search counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    PullRequest,
    Issue,
}

impl IssueKind {
    fn qualifier(self) -> &'static str {
        match self {
            IssueKind::PullRequest => "pr",
            IssueKind::Issue => "issue",
        }
    }
}

/// The calls the statistics aggregator depends on.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn profile(&self, username: &str) -> Result<Profile>;

    async fn repositories(&self, username: &str) -> Result<Vec<Repository>>;

    /// Number of issues or pull requests authored by `username`.
    async fn search_issue_count(&self, username: &str, kind: IssueKind) -> Result<u64>;
}

/// GitHub logins: 1-39 ASCII alphanumerics or single hyphens, no hyphen at either end.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Repository names: ASCII alphanumerics, `-`, `_` and `.`, but not `.` or `..`.
pub fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_REPO_NAME_LEN
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GithubClient {
    base_url: Arc<String>,
    http: Arc<Client>,
}

impl GithubClient {
    /// Create an unauthenticated REST client for `config.api_url`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: Arc::new(config.api_url.trim_end_matches('/').to_string()),
            http: Arc::new(http),
        })
    }

    /// Low-level GET that treats any non-2xx status or unparsable body as an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Network error requesting {url}: {e}"))?;

        let status = resp.status();
        debug!("GET {url} -> {}", status.as_u16());

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // GitHub error payloads look like {"message": "...", "documentation_url": "..."}
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(anyhow::anyhow!(
                "GitHub API returned HTTP {} for {url}: {message}",
                status.as_u16()
            ));
        }

        resp.json::<T>()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON from {url}: {e}"))
    }

    /// Full details of a single repository.
    pub async fn repository(&self, owner: &str, name: &str) -> Result<RepositoryDetails> {
        if !is_valid_username(owner) || !is_valid_repo_name(name) {
            return Err(anyhow::anyhow!("Invalid repository {owner}/{name}"));
        }
        self.get_json(&format!("/repos/{owner}/{name}"), &[])
            .await
            .with_context(|| format!("Failed to fetch repository {owner}/{name}"))
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn profile(&self, username: &str) -> Result<Profile> {
        self.get_json(&format!("/users/{username}"), &[])
            .await
            .with_context(|| format!("Failed to fetch profile of {username}"))
    }

    /// First page only; pagination is out of scope.
    async fn repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.get_json(&format!("/users/{username}/repos"), &[])
            .await
            .with_context(|| format!("Failed to fetch repositories of {username}"))
    }

    async fn search_issue_count(&self, username: &str, kind: IssueKind) -> Result<u64> {
        let q = format!("author:{username} type:{}", kind.qualifier());
        let found: SearchCount = self
            .get_json("/search/issues", &[("q", q.as_str())])
            .await
            .with_context(|| format!("Failed to search {} authored by {username}", kind.qualifier()))?;
        Ok(found.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GithubClient {
        let config = Config {
            api_url: server.uri(),
            ..Config::default()
        };
        GithubClient::new(&config).unwrap()
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("a"));
        assert!(is_valid_username("some-user-42"));
        assert!(is_valid_username(&"x".repeat(39)));

        assert!(!is_valid_username(""));
        assert!(!is_valid_username("-leading"));
        assert!(!is_valid_username("trailing-"));
        assert!(!is_valid_username("double--hyphen"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("../etc"));
        assert!(!is_valid_username(&"x".repeat(40)));
    }

    #[test]
    fn test_repo_name_validation() {
        assert!(is_valid_repo_name("Hello-World"));
        assert!(is_valid_repo_name("octocat.github.io"));
        assert!(is_valid_repo_name("my_repo.rs"));
        assert!(is_valid_repo_name(".github"));

        assert!(!is_valid_repo_name(""));
        assert!(!is_valid_repo_name("."));
        assert!(!is_valid_repo_name(".."));
        assert!(!is_valid_repo_name("a/b"));
        assert!(!is_valid_repo_name("x?y"));
        assert!(!is_valid_repo_name("x#y"));
        assert!(!is_valid_repo_name("x/../../users/octocat"));
        assert!(!is_valid_repo_name(&"r".repeat(101)));
    }

    #[tokio::test]
    async fn test_repository_rejects_path_traversal_without_requesting() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .repository("octocat", "x/../../users/octocat")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_profile_sends_v3_accept_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "avatar_url": "https://avatars.example.com/u/1",
                "html_url": "https://github.com/octocat",
                "name": "The Octocat",
                "bio": null,
                "company": "@github",
                "location": "San Francisco",
                "twitter_username": null,
                "blog": "https://github.blog",
                "followers": 100,
                "following": 9,
                "public_repos": 8,
                "created_at": "2011-01-25T18:44:36Z"
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).profile("octocat").await.unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.name.as_deref(), Some("The Octocat"));
        assert_eq!(profile.followers, 100);
    }

    #[tokio::test]
    async fn test_search_issue_count_builds_author_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "author:octocat type:pr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 42,
                "incomplete_results": false,
                "items": []
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "author:octocat type:issue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 7,
                "incomplete_results": false,
                "items": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let prs = client
            .search_issue_count("octocat", IssueKind::PullRequest)
            .await
            .unwrap();
        let issues = client
            .search_issue_count("octocat", IssueKind::Issue)
            .await
            .unwrap();

        assert_eq!(prs, 42);
        assert_eq!(issues, 7);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .repositories("ghost")
            .await
            .unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("404"));
        assert!(chain.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).repositories("octocat").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_repository_details() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Hello-World",
                "html_url": "https://github.com/octocat/Hello-World",
                "description": "My first repository on GitHub!",
                "language": null,
                "stargazers_count": 80,
                "forks_count": 9,
                "updated_at": "2024-01-15T10:30:00Z",
                "topics": ["demo"],
                "open_issues_count": 0,
                "watchers_count": 80,
                "license": { "name": "MIT License" },
                "owner": { "login": "octocat", "avatar_url": "https://avatars.example.com/u/1" }
            })))
            .mount(&server)
            .await;

        let details = client_for(&server)
            .repository("octocat", "Hello-World")
            .await
            .unwrap();
        assert_eq!(details.stargazers_count, 80);
        assert_eq!(details.topics, vec!["demo".to_string()]);
        assert_eq!(details.license.unwrap().name, "MIT License");
    }
}
