use crate::models::Repository;

/// Repositories whose name or description contains `term`, ignoring case.
///
/// A blank term keeps everything. Fetch order is preserved.
pub fn filter_repositories<'a>(repos: &'a [Repository], term: &str) -> Vec<&'a Repository> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return repos.iter().collect();
    }

    repos
        .iter()
        .filter(|repo| {
            repo.name.to_lowercase().contains(&needle)
                || repo
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn repo(name: &str, description: Option<&str>) -> Repository {
        Repository {
            name: name.to_string(),
            html_url: String::new(),
            description: description.map(str::to_string),
            language: None,
            size: 0,
            stargazers_count: 0,
            forks_count: 0,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn names<'a>(repos: &[&'a Repository]) -> Vec<&'a str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_blank_term_keeps_all() {
        let repos = vec![repo("b", None), repo("a", None)];
        assert_eq!(names(&filter_repositories(&repos, "")), vec!["b", "a"]);
        assert_eq!(names(&filter_repositories(&repos, "   ")), vec!["b", "a"]);
    }

    #[test]
    fn test_matches_name_or_description_case_insensitively() {
        let repos = vec![
            repo("Spoon-Knife", Some("This repo is for demonstration purposes only.")),
            repo("linguist", Some("Language Savant")),
            repo("hello-world", None),
            repo("octocat.github.io", Some("A DEMO page")),
        ];

        assert_eq!(
            names(&filter_repositories(&repos, "demo")),
            vec!["Spoon-Knife", "octocat.github.io"]
        );
        assert_eq!(names(&filter_repositories(&repos, "  HELLO ")), vec!["hello-world"]);
        assert!(filter_repositories(&repos, "kubernetes").is_empty());
    }
}
