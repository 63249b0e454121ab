//! Static hosting-convention pattern table.
//!
//! An ordered list of rules mapping module path (or bare repo URL)
//! prefixes to a repository location and an issue-tracker transform.
//! Rules are tried in declared order: later entries are intentionally
//! more permissive and must not shadow the specific ones above them.

use std::sync::LazyLock;

use regex::Regex;

/// One hosting convention: a regex matching a prefix of a module path
/// or scheme-less repo URL, with a named `repo` capture, and the pure
/// transform from a matched repo to its issue tracker.
pub struct PatternRule {
    re: Regex,
    issues: IssuesFn,
}

/// Pure transform from a final repo URL to its issue-tracker URL.
pub type IssuesFn = fn(&str) -> String;

/// Result of matching a path against the table.
pub struct StaticMatch {
    /// The captured repository path, after vendor-specific rewrites.
    pub repo: String,
    /// Maps the final repo URL to its issue tracker.
    pub issues: IssuesFn,
}

fn issues_at(repo: &str) -> String {
    format!("{repo}/issues")
}

fn gitlab_issues(repo: &str) -> String {
    format!("{repo}/-/issues")
}

fn sourcehut_issues(repo: &str) -> String {
    repo.replacen("git.sr.ht", "todo.sr.ht", 1)
}

fn shuralyov_issues(repo: &str) -> String {
    format!("{repo}$issues")
}

fn blitiri_issues(_repo: &str) -> String {
    "mailto:albertito@blitiri.com.ar".to_string()
}

fn same(repo: &str) -> String {
    repo.to_string()
}

static PATTERNS: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    let table: Vec<(&str, IssuesFn)> = vec![
        (
            r"^(?P<repo>github\.com/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)",
            issues_at,
        ),
        // Any site beginning with "github." is assumed to work like
        // github.com.
        (
            r"^(?P<repo>github\.[a-z0-9A-Z.-]+/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        (
            r"^(?P<repo>bitbucket\.org/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)",
            issues_at,
        ),
        (
            r"^(?P<repo>gitlab\.com/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)",
            gitlab_issues,
        ),
        // Likewise for self-hosted "gitlab." sites.
        (
            r"^(?P<repo>gitlab\.[a-z0-9A-Z.-]+/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            gitlab_issues,
        ),
        (
            r"^(?P<repo>gitee\.com/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        (
            r"^(?P<repo>git\.sr\.ht/~[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)",
            sourcehut_issues,
        ),
        (r"^(?P<repo>git\.fd\.io/[a-z0-9A-Z_.\-]+)", same),
        (
            r"^(?P<repo>git\.pirl\.io/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)",
            same,
        ),
        (
            r"^(?P<repo>gitea\.com/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        // And for self-hosted "gitea." sites.
        (
            r"^(?P<repo>gitea\.[a-z0-9A-Z.-]+/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        (
            r"^(?P<repo>go\.isomorphicgo\.org/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        (
            r"^(?P<repo>git\.openprivacy\.ca/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            issues_at,
        ),
        (
            r"^(?P<repo>gogs\.[a-z0-9A-Z.-]+/[a-z0-9A-Z_.\-]+/[a-z0-9A-Z_.\-]+)(\.git|$)",
            same,
        ),
        (r"^(?P<repo>dmitri\.shuralyov\.com/.+)$", shuralyov_issues),
        (r"^(?P<repo>blitiri\.com\.ar/go/.+)$", blitiri_issues),
        // Hosts following the general go command convention, where the
        // import path carries a ".git" suffix that a meta-tag repo URL
        // would not.
        (r"^(?P<repo>[^.]+\.googlesource\.com/[^.]+)(\.git|$)", same),
        (r"^(?P<repo>git\.apache\.org/[^.]+)(\.git|$)", same),
        // Generic catch-all for any VCS-suffixed host. We can extract
        // the repo but know nothing about its URL layout, so the suffix
        // stays part of the repo. Must be last.
        (
            r"(?P<repo>([a-z0-9.\-]+\.)+[a-z0-9.\-]+(:[0-9]+)?(/~?[A-Za-z0-9_.\-]+)+?\.(bzr|fossil|git|hg|svn))",
            same,
        ),
    ];

    table
        .into_iter()
        .map(|(pattern, issues)| {
            let re = Regex::new(pattern).expect("pattern must compile");
            // Every rule must expose the repo it matched.
            assert!(
                re.capture_names().flatten().any(|name| name == "repo"),
                "pattern {pattern} missing <repo> group"
            );
            PatternRule { re, issues }
        })
        .collect()
});

/// Matches a module path or scheme-less repo URL against the table and
/// returns the first rule's captured repo and issues transform.
pub fn match_static(module_or_repo_path: &str) -> Option<StaticMatch> {
    for rule in PATTERNS.iter() {
        let Some(caps) = rule.re.captures(module_or_repo_path) else {
            continue;
        };
        let mut repo = caps
            .name("repo")
            .map_or_else(String::new, |m| m.as_str().to_string());

        // git.apache.org declares a go-import pointing at
        // github.com/apache with the ".git" repo prefix missing;
        // rewrite to the real home.
        const APACHE_DOMAIN: &str = "git.apache.org/";
        if repo.starts_with(APACHE_DOMAIN) {
            repo = repo.replacen(APACHE_DOMAIN, "github.com/apache/", 1);
        }
        // blitiri.com.ar module paths are /go/..., but the repos live
        // under /git/r/...
        if repo.starts_with("blitiri.com.ar/") {
            repo = repo.replacen("/go/", "/git/r/", 1);
        }
        return Some(StaticMatch {
            repo,
            issues: rule.issues,
        });
    }
    None
}

/// Strips a trailing VCS suffix only for hosts known to redirect the
/// suffixed URL cleanly. GitHub serves github.com/foo/bar.git but 404s
/// on any path beneath it; for other hosts stripping is unsafe.
pub fn trim_vcs_suffix(repo_url: &str) -> &str {
    match repo_url.strip_suffix(".git") {
        Some(trimmed)
            if repo_url.starts_with("https://github.com/")
                || repo_url.starts_with("https://gitlab.com/") =>
        {
            trimmed
        }
        _ => repo_url,
    }
}

/// Removes a leading `http://` or `https://` so a repo URL can be
/// re-matched against the table. Other schemes stay intact and simply
/// match nothing, as intended.
pub fn remove_http_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn table_initializes_with_repo_groups() {
        assert!(!PATTERNS.is_empty());
    }

    #[rstest]
    #[case("github.com/foo/bar", "github.com/foo/bar")]
    #[case("github.com/foo/bar/sub/pkg", "github.com/foo/bar")]
    #[case("bitbucket.org/foo/bar", "bitbucket.org/foo/bar")]
    #[case("gitlab.com/foo/bar", "gitlab.com/foo/bar")]
    #[case("gitea.com/foo/bar.git", "gitea.com/foo/bar")]
    #[case("git.sr.ht/~foo/bar", "git.sr.ht/~foo/bar")]
    #[case("code.googlesource.com/gocloud", "code.googlesource.com/gocloud")]
    // The VCS catch-all keeps the suffix as part of the repo.
    #[case("example.org/git/proj.git", "example.org/git/proj.git")]
    #[case("example.org:8080/proj.git/sub", "example.org:8080/proj.git")]
    fn match_static_captures_repo(#[case] path: &str, #[case] repo: &str) {
        let m = match_static(path).unwrap();
        assert_eq!(m.repo, repo);
    }

    #[rstest]
    #[case("git.apache.org/thrift.git", "github.com/apache/thrift")]
    #[case("blitiri.com.ar/go/chasquid", "blitiri.com.ar/git/r/chasquid")]
    fn match_static_applies_vendor_rewrites(#[case] path: &str, #[case] repo: &str) {
        let m = match_static(path).unwrap();
        assert_eq!(m.repo, repo);
    }

    #[test]
    fn match_static_returns_none_for_unknown_paths() {
        assert!(match_static("some.random.host/pkg").is_none());
    }

    #[rstest]
    #[case("github.com/foo/bar", "https://github.com/foo/bar/issues")]
    #[case("gitlab.com/foo/bar", "https://gitlab.com/foo/bar/-/issues")]
    #[case("git.sr.ht/~foo/bar", "https://todo.sr.ht/~foo/bar")]
    #[case("dmitri.shuralyov.com/gpu/mtl", "https://dmitri.shuralyov.com/gpu/mtl$issues")]
    #[case("blitiri.com.ar/go/chasquid", "mailto:albertito@blitiri.com.ar")]
    fn issues_transform_builds_tracker_url(#[case] path: &str, #[case] issues: &str) {
        let m = match_static(path).unwrap();
        let repo_url = format!("https://{}", m.repo);
        assert_eq!((m.issues)(&repo_url), issues);
    }

    #[test]
    fn github_rule_preempts_vcs_catch_all() {
        // The path matches both the github.com rule and the generic
        // VCS-suffix catch-all; the earlier rule must win.
        let m = match_static("github.com/foo/bar.git").unwrap();
        assert_eq!(m.repo, "github.com/foo/bar.git");
        assert_eq!(
            (m.issues)("https://github.com/foo/bar"),
            "https://github.com/foo/bar/issues"
        );
    }

    #[rstest]
    #[case("https://github.com/foo/bar.git", "https://github.com/foo/bar")]
    #[case("https://gitlab.com/foo/bar.git", "https://gitlab.com/foo/bar")]
    // Unlisted hosts keep the suffix; stripping is unsafe in general.
    #[case("https://example.org/git/proj.git", "https://example.org/git/proj.git")]
    #[case("https://gitea.com/foo/bar.git", "https://gitea.com/foo/bar.git")]
    #[case("https://github.com/foo/bar", "https://github.com/foo/bar")]
    fn trim_vcs_suffix_is_provider_specific(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(trim_vcs_suffix(url), expected);
    }

    #[rstest]
    #[case("https://github.com/foo/bar", "github.com/foo/bar")]
    #[case("http://github.com/foo/bar", "github.com/foo/bar")]
    #[case("ssh://github.com/foo/bar", "ssh://github.com/foo/bar")]
    #[case("github.com/foo/bar", "github.com/foo/bar")]
    fn remove_http_scheme_strips_web_schemes_only(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(remove_http_scheme(url), expected);
    }
}
