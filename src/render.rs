use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::age::AccountAge;
use crate::models::{Profile, Repository, RepositoryDetails};
use crate::stats::Statistics;

const MIN_ROW_WIDTH: usize = 44;

// Utilities for aligned rows

/// "key: ........ value" padded with dots to `align_width` characters.
pub fn stat_row(key: &str, value: &str, align_width: usize) -> String {
    let key_part = format!("{key}: ");
    let base_len = key_part.chars().count() + value.chars().count();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => String::new(),
        1 => " ".to_string(),
        n => format!("{} ", ".".repeat(n - 1)),
    };

    format!("{key_part}{dots}{value}")
}

fn header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.chars().count());
    format!("{base}{}", "-".repeat(dash_count))
}

/// Width that fits every row, never narrower than `MIN_ROW_WIDTH`.
fn align_width(rows: &[(&str, String)]) -> usize {
    rows.iter()
        .map(|(k, v)| k.chars().count() + 3 + v.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_ROW_WIDTH)
}

fn push_section(out: &mut String, title: &str, rows: &[(&str, String)], width: usize) {
    let _ = writeln!(out, "{}", header_line(title, width));
    for (key, value) in rows {
        let _ = writeln!(out, "{}", stat_row(key, value, width));
    }
}

/// "January 5, 2024"
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

pub fn render_profile(profile: &Profile, age: AccountAge) -> String {
    let mut rows: Vec<(&str, String)> = vec![(
        "Name",
        profile.name.clone().unwrap_or_else(|| profile.login.clone()),
    )];
    let optional = [
        ("Bio", &profile.bio),
        ("Company", &profile.company),
        ("Location", &profile.location),
        ("Blog", &profile.blog),
        ("Twitter", &profile.twitter_username),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter_map(|(k, v)| v.as_deref().filter(|s| !s.is_empty()).map(|s| (k, s.to_string()))),
    );
    rows.extend([
        ("Joined", format_date(profile.created_at)),
        ("Member for", age.to_string()),
        ("Followers", profile.followers.to_string()),
        ("Following", profile.following.to_string()),
        ("Public repos", profile.public_repos.to_string()),
        ("Profile", profile.html_url.clone()),
        ("Avatar", profile.avatar_url.clone()),
    ]);

    let width = align_width(&rows);
    let mut out = String::new();
    push_section(&mut out, &format!("@{}", profile.login), &rows, width);
    out
}

pub fn render_repositories(repos: &[&Repository], term: Option<&str>) -> String {
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    if repos.is_empty() {
        return match term {
            Some(t) => format!("No repositories match \"{t}\"\n"),
            None => "No repositories found\n".to_string(),
        };
    }

    let mut out = String::new();
    for repo in repos {
        let _ = writeln!(out, "{}", repo.name);
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  {description}");
        }
        let mut facts = Vec::new();
        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            facts.push(language.to_string());
        }
        facts.push(format!("★ {}", repo.stargazers_count));
        facts.push(format!("forks {}", repo.forks_count));
        facts.push(format!("Updated on {}", format_date(repo.updated_at)));
        let _ = writeln!(out, "  {}", facts.join(" · "));
        if !repo.html_url.is_empty() {
            let _ = writeln!(out, "  {}", repo.html_url);
        }
    }
    out
}

pub fn render_repository(details: &RepositoryDetails) -> String {
    let mut rows: Vec<(&str, String)> = Vec::new();
    if let Some(description) = details.description.as_deref().filter(|d| !d.is_empty()) {
        rows.push(("Description", description.to_string()));
    }
    if let Some(language) = details.language.as_deref().filter(|l| !l.is_empty()) {
        rows.push(("Language", language.to_string()));
    }
    rows.extend([
        ("Stars", details.stargazers_count.to_string()),
        ("Forks", details.forks_count.to_string()),
        ("Watchers", details.watchers_count.to_string()),
        ("Open issues", details.open_issues_count.to_string()),
    ]);
    if let Some(license) = &details.license {
        rows.push(("License", license.name.clone()));
    }
    if !details.topics.is_empty() {
        rows.push(("Topics", details.topics.join(", ")));
    }
    rows.push(("Updated on", format_date(details.updated_at)));
    rows.push(("URL", details.html_url.clone()));

    let width = align_width(&rows);
    let mut out = String::new();
    push_section(
        &mut out,
        &format!("{}/{}", details.owner.login, details.name),
        &rows,
        width,
    );
    out
}

pub fn render_statistics(username: &str, stats: &Statistics) -> String {
    let totals: Vec<(&str, String)> = vec![
        ("Contributions", stats.total_contributions.to_string()),
        ("Commits (size proxy)", stats.total_commits.to_string()),
        ("Pull requests", stats.total_prs.to_string()),
        ("Issues", stats.total_issues.to_string()),
        ("Stars", stats.total_stars.to_string()),
    ];
    let languages: Vec<(&str, String)> = stats
        .language_distribution
        .iter()
        .map(|l| (l.language.as_str(), format!("{:.2}%", l.percentage)))
        .collect();
    let months: Vec<(&str, String)> = stats
        .contributions_by_month
        .iter()
        .map(|m| (m.month.as_str(), m.contributions.to_string()))
        .collect();
    let popular: Vec<(&str, String)> = stats
        .popular_repositories
        .iter()
        .map(|p| (p.name.as_str(), format!("★ {}", p.stars)))
        .collect();

    let all: Vec<(&str, String)> = totals
        .iter()
        .chain(&languages)
        .chain(&months)
        .chain(&popular)
        .cloned()
        .collect();
    let width = align_width(&all);

    let mut out = String::new();
    push_section(&mut out, &format!("Contribution analysis for @{username}"), &totals, width);
    out.push('\n');
    if languages.is_empty() {
        let _ = writeln!(out, "{}", header_line("Languages", width));
        out.push_str("No language data\n");
    } else {
        push_section(&mut out, "Languages", &languages, width);
    }
    out.push('\n');
    push_section(&mut out, "Contributions by month", &months, width);
    out.push('\n');
    if popular.is_empty() {
        let _ = writeln!(out, "{}", header_line("Popular repositories", width));
        out.push_str("No repositories\n");
    } else {
        push_section(&mut out, "Popular repositories", &popular, width);
    }
    out
}
