//! Payloads returned by the GitHub REST API.
//!
//! Only the fields the views need are modelled; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /users/{username}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub twitter_username: Option<String>,
    pub blog: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub created_at: DateTime<Utc>,
}

/// One entry of `GET /users/{username}/repos`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    /// Disk footprint in KB as reported by GitHub.
    #[serde(default)]
    pub size: u64,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct License {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Owner {
    pub login: String,
}

/// `GET /repos/{owner}/{name}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryDetails {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub open_issues_count: u64,
    pub watchers_count: u64,
    pub license: Option<License>,
    pub owner: Owner,
}

/// `GET /search/issues`. Only the match count is used.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SearchCount {
    pub total_count: u64,
}
