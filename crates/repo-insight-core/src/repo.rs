//! GitHub repository URL parsing.

use std::fmt;

use anyhow::{bail, Result};
use serde::Serialize;

const PREFIX: &str = "https://github.com/";

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
}

impl RepoRef {
    /// Parse `https://github.com/{owner}/{repo}` with an optional trailing `/`.
    ///
    /// Owners may contain ASCII letters, digits and `-`; repository names
    /// may also contain `_` and `.`, but cannot be only dots.
    pub fn parse(url: &str) -> Result<Self> {
        let Some(rest) = url.strip_prefix(PREFIX) else {
            bail!("Invalid GitHub URL");
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let Some((owner, repo)) = rest.split_once('/') else {
            bail!("Invalid GitHub URL");
        };

        let owner_ok = !owner.is_empty() && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        let repo_ok = !repo.is_empty()
            && repo
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !repo.chars().all(|c| c == '.');
        if !owner_ok || !repo_ok {
            bail!("Invalid GitHub URL");
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            full_name: format!("{}/{}", owner, repo),
        })
    }

    pub fn is_valid(url: &str) -> bool {
        Self::parse(url).is_ok()
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_urls() {
        let r = RepoRef::parse("https://github.com/octo-org/my_repo.rs").unwrap();
        assert_eq!(r.owner, "octo-org");
        assert_eq!(r.repo, "my_repo.rs");
        assert_eq!(r.full_name, "octo-org/my_repo.rs");

        let r = RepoRef::parse("https://github.com/octo/demo/").unwrap();
        assert_eq!(r.full_name, "octo/demo");
    }

    #[test]
    fn test_parse_rejects_invalid_urls() {
        for url in [
            "http://github.com/octo/demo",
            "https://gitlab.com/octo/demo",
            "https://github.com/octo",
            "https://github.com/octo/demo/tree/main",
            "https://github.com/octo_org/demo",
            "https://github.com//demo",
            "https://github.com/octo/demo//",
            "https://github.com/octo/..",
            "https://github.com/octo/.",
            "https://github.com/octo/../",
            "",
        ] {
            assert!(!RepoRef::is_valid(url), "accepted {}", url);
        }
    }
}
