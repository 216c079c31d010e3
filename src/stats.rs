//! stats.rs
//!
//! Folds a user's repositories and two issue-search counts into the
//! `Statistics` record behind the analysis view.
//!
//! Two figures are approximations and are kept that way on purpose:
//!   • `total_commits` is the sum of repository sizes (disk footprint in KB),
//!     not a commit count.
//!   • the monthly series comes from a `ContributionSource`; the default one
//!     draws random placeholder counts, there is no real calendar data behind it.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::github::{GithubApi, IssueKind, is_valid_username};
use crate::models::Repository;

/// Number of points in the monthly series: six months back plus the current one.
pub const MONTHS_IN_SERIES: usize = 7;
pub const POPULAR_LIMIT: usize = 5;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyContributions {
    pub month: String,
    pub contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularRepository {
    pub name: String,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_contributions: u64,
    pub total_commits: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    pub total_issues: u64,
    pub total_stars: u64,
    pub popular_repositories: Vec<PopularRepository>,
    pub contributions_by_month: Vec<MonthlyContributions>,
    pub language_distribution: Vec<LanguageShare>,
}

/// Supplies the contribution count of one calendar month.
pub trait ContributionSource {
    fn contributions(&mut self, year: i32, month: u32) -> u32;
}

/// Placeholder source: uniform random counts in `[20, 120)`.
pub struct RandomContributions<R> {
    rng: R,
}

impl<R: Rng> RandomContributions<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ContributionSource for RandomContributions<R> {
    fn contributions(&mut self, _year: i32, _month: u32) -> u32 {
        self.rng.gen_range(20..120)
    }
}

/// Fetch everything needed for `username` and build its statistics.
///
/// Any failed call fails the whole aggregation; there is no partial result.
pub async fn analyze<A, C>(
    api: &A,
    username: &str,
    today: NaiveDate,
    source: &mut C,
) -> Result<Statistics, AnalysisError>
where
    A: GithubApi + ?Sized,
    C: ContributionSource,
{
    if !is_valid_username(username) {
        return Err(AnalysisError::InvalidUsername(username.to_string()));
    }

    let (profile, repos) = tokio::try_join!(api.profile(username), api.repositories(username))
        .map_err(|e| fetch_failed(username, e))?;
    debug!(
        "aggregating {} repositories of {}",
        repos.len(),
        profile.login
    );

    let months = monthly_series(today, source);

    let (prs, issues) = tokio::try_join!(
        api.search_issue_count(username, IssueKind::PullRequest),
        api.search_issue_count(username, IssueKind::Issue)
    )
    .map_err(|e| fetch_failed(username, e))?;

    Ok(summarize(&repos, months, prs, issues))
}

fn fetch_failed(username: &str, cause: anyhow::Error) -> AnalysisError {
    debug!("statistics for {username} unavailable: {cause:#}");
    AnalysisError::FetchFailed(cause)
}

/// Pure part of the aggregation, given already fetched data.
pub fn summarize(
    repos: &[Repository],
    contributions_by_month: Vec<MonthlyContributions>,
    total_prs: u64,
    total_issues: u64,
) -> Statistics {
    let total_contributions = contributions_by_month
        .iter()
        .map(|m| u64::from(m.contributions))
        .sum();

    Statistics {
        total_contributions,
        total_commits: repos.iter().map(|r| r.size).sum(),
        total_prs,
        total_issues,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        popular_repositories: popular_repositories(repos),
        contributions_by_month,
        language_distribution: language_distribution(repos),
    }
}

/// Share of each language in the total size of language-tagged repositories,
/// highest first. Untagged repositories count neither as a language nor
/// toward the total.
pub fn language_distribution(repos: &[Repository]) -> Vec<LanguageShare> {
    let mut tally: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut total: u64 = 0;

    for repo in repos {
        let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) else {
            continue;
        };
        let slot = *index.entry(language).or_insert_with(|| {
            tally.push((language, 0));
            tally.len() - 1
        });
        tally[slot].1 += repo.size;
        total += repo.size;
    }

    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<LanguageShare> = tally
        .into_iter()
        .map(|(language, size)| LanguageShare {
            language: language.to_string(),
            percentage: size as f64 / total as f64 * 100.0,
        })
        .collect();

    // Stable: equal shares keep first-seen order.
    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}

/// Top repositories by stars. Ties keep fetch order.
pub fn popular_repositories(repos: &[Repository]) -> Vec<PopularRepository> {
    let mut ranked: Vec<&Repository> = repos.iter().collect();
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    ranked
        .into_iter()
        .take(POPULAR_LIMIT)
        .map(|r| PopularRepository {
            name: r.name.clone(),
            stars: r.stargazers_count,
        })
        .collect()
}

/// Seven buckets from `today`'s month minus six through `today`'s month,
/// oldest first, labelled like "Oct 2026".
pub fn monthly_series<C: ContributionSource + ?Sized>(
    today: NaiveDate,
    source: &mut C,
) -> Vec<MonthlyContributions> {
    let current = today.year() * 12 + today.month0() as i32;

    (0..MONTHS_IN_SERIES as i32)
        .rev()
        .map(|back| {
            let point = current - back;
            let year = point.div_euclid(12);
            let month0 = point.rem_euclid(12) as usize;
            MonthlyContributions {
                month: format!("{} {year:04}", MONTH_NAMES[month0]),
                contributions: source.contributions(year, month0 as u32 + 1),
            }
        })
        .collect()
}
