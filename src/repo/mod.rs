//! Repository and issue-tracker URL resolution for module paths.
//!
//! Layered strategy, first success wins: fixed sentinels (the reserved
//! test domain and the standard library), the static hosting pattern
//! table, live go-get metadata, and finally the golang.org mirror
//! override. Each step is an independently testable fallible stage.

pub mod error;
pub mod meta;
pub mod patterns;

pub use error::ResolveError;

use crate::repo::meta::fetch_meta;
use crate::repo::patterns::{match_static, remove_http_scheme, trim_vcs_suffix};

/// Source browser for the Go standard library.
const GO_SOURCE_REPO_URL: &str = "https://cs.opensource.google/go/go";
/// Issue tracker for the Go project.
const GO_ISSUES_URL: &str = "https://github.com/golang/go/issues";

/// Module path under which the standard library is reported.
const STD_MODULE: &str = "std";

/// Resolved repository and issue-tracker URLs for a module path.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoResolution {
    pub repo_url: String,
    pub issues_url: String,
}

/// Resolves the source repository and issue tracker for `module`.
///
/// The network is touched only when no static rule covers the path.
pub async fn resolve(
    client: &reqwest::Client,
    module: &str,
) -> Result<RepoResolution, ResolveError> {
    // example.com can never be real; it is reserved for testing.
    // Treat it as directly usable.
    if module.starts_with("example.com/") {
        let repo = trim_vcs_suffix(&format!("https://{module}")).to_string();
        return Ok(RepoResolution {
            issues_url: repo.clone(),
            repo_url: repo,
        });
    }

    if module == STD_MODULE {
        return Ok(RepoResolution {
            repo_url: GO_SOURCE_REPO_URL.to_string(),
            issues_url: GO_ISSUES_URL.to_string(),
        });
    }

    let (repo, issues): (String, Option<fn(&str) -> String>) = match match_static(module) {
        Some(m) => {
            let repo = trim_vcs_suffix(&format!("https://{}", m.repo)).to_string();
            (repo, Some(m.issues))
        }
        None => {
            let found = fetch_meta(client, module).await?;
            let repo = found.repo_url.trim_end_matches('/').to_string();
            // Re-match the bare repo URL to pick an issues transform;
            // with no match the issues link falls back to the repo.
            let issues = match_static(remove_http_scheme(&repo)).map(|m| m.issues);
            (repo, issues)
        }
    };

    if module.starts_with("golang.org/") {
        return Ok(adjust_go_repo_info(&repo, module));
    }

    let issues_url = match issues {
        Some(f) => f(&repo),
        None => repo.clone(),
    };
    Ok(RepoResolution {
        repo_url: repo,
        issues_url,
    })
}

/// Repos hosted at <https://cs.opensource.google/go> without an x/
/// prefix.
const CS_NON_X_REPOS: &[&str] = &["dl", "proposal", "vscode-go"];

/// x/-prefixed repos hosted at <https://cs.opensource.google/go>.
///
/// x/scratch is not included.
const CS_X_REPOS: &[&str] = &[
    "x/arch",
    "x/benchmarks",
    "x/blog",
    "x/build",
    "x/crypto",
    "x/debug",
    "x/example",
    "x/exp",
    "x/image",
    "x/mobile",
    "x/mod",
    "x/net",
    "x/oauth2",
    "x/perf",
    "x/pkgsite",
    "x/playground",
    "x/review",
    "x/sync",
    "x/sys",
    "x/talks",
    "x/term",
    "x/text",
    "x/time",
    "x/tools",
    "x/tour",
    "x/vgo",
    "x/website",
    "x/xerrors",
];

/// golang.org modules browsable on the open-source mirror get pointed
/// there; anything else keeps what resolution already found.
fn adjust_go_repo_info(repo: &str, module: &str) -> RepoResolution {
    let suffix = module.strip_prefix("golang.org/").unwrap_or(module);

    let parts: Vec<&str> = suffix.split('/').collect();
    let suffix = if parts.len() >= 2 {
        format!("{}/{}", parts[0], parts[1])
    } else {
        suffix.to_string()
    };

    let known = if suffix.starts_with("x/") {
        CS_X_REPOS.contains(&suffix.as_str())
    } else {
        CS_NON_X_REPOS.contains(&suffix.as_str())
    };
    if !known {
        return RepoResolution {
            repo_url: repo.to_string(),
            issues_url: repo.to_string(),
        };
    }

    RepoResolution {
        repo_url: format!("https://cs.opensource.google/go/{suffix}"),
        issues_url: GO_ISSUES_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn standard_library_resolves_without_network() {
        let resolution = resolve(&client(), "std").await.unwrap();

        assert_eq!(resolution.repo_url, "https://cs.opensource.google/go/go");
        assert_eq!(resolution.issues_url, "https://github.com/golang/go/issues");
    }

    #[tokio::test]
    async fn reserved_test_domain_is_directly_usable() {
        let resolution = resolve(&client(), "example.com/foo/bar").await.unwrap();

        assert_eq!(resolution.repo_url, "https://example.com/foo/bar");
        assert_eq!(resolution.issues_url, "https://example.com/foo/bar");
    }

    #[tokio::test]
    async fn github_path_resolves_statically() {
        let resolution = resolve(&client(), "github.com/foo/bar").await.unwrap();

        assert_eq!(resolution.repo_url, "https://github.com/foo/bar");
        assert_eq!(resolution.issues_url, "https://github.com/foo/bar/issues");
    }

    #[tokio::test]
    async fn github_vcs_suffix_is_trimmed() {
        let resolution = resolve(&client(), "github.com/foo/bar.git").await.unwrap();

        assert_eq!(resolution.repo_url, "https://github.com/foo/bar");
    }

    #[tokio::test]
    async fn unlisted_provider_keeps_vcs_suffix() {
        let resolution = resolve(&client(), "example.org/git/proj.git").await.unwrap();

        assert_eq!(resolution.repo_url, "https://example.org/git/proj.git");
        assert_eq!(resolution.issues_url, "https://example.org/git/proj.git");
    }

    #[test]
    fn known_x_repo_moves_to_opensource_mirror() {
        let resolution = adjust_go_repo_info("https://github.com/golang/mod", "golang.org/x/mod");

        assert_eq!(resolution.repo_url, "https://cs.opensource.google/go/x/mod");
        assert_eq!(resolution.issues_url, "https://github.com/golang/go/issues");
    }

    #[test]
    fn known_x_repo_subpackage_uses_first_two_segments() {
        let resolution =
            adjust_go_repo_info("https://github.com/golang/tools", "golang.org/x/tools/gopls");

        assert_eq!(
            resolution.repo_url,
            "https://cs.opensource.google/go/x/tools"
        );
    }

    #[test]
    fn unknown_golang_org_repo_passes_through() {
        let resolution = adjust_go_repo_info("https://example.org/somewhere", "golang.org/x/scratch");

        assert_eq!(resolution.repo_url, "https://example.org/somewhere");
        assert_eq!(resolution.issues_url, "https://example.org/somewhere");
    }

    #[test]
    fn non_x_mirror_repo_is_recognized() {
        let resolution = adjust_go_repo_info("https://github.com/golang/dl", "golang.org/dl");

        assert_eq!(resolution.repo_url, "https://cs.opensource.google/go/dl");
        assert_eq!(resolution.issues_url, "https://github.com/golang/go/issues");
    }
}
