//! go-import / go-source metadata discovery.
//!
//! When no static pattern covers a module path, its hosting site is
//! asked directly: `GET https://<path>?go-get=1` returns an HTML page
//! whose head declares the repository in `go-import` and `go-source`
//! meta tags. The two declarations are merged, preferring `go-source`,
//! following the go command's discovery rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::fetch::{self, FetchError};
use crate::repo::error::ResolveError;

/// A repository declaration assembled from go-import and go-source
/// meta tags.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMeta {
    /// Import path prefix corresponding to the repo root.
    pub root_prefix: String,
    /// URL of the repo root.
    pub repo_url: String,
}

/// Fetches and parses the meta declarations for `import_path`.
///
/// The secure transport is tried first and must answer 200; on any
/// failure the insecure transport is tried once and its body is parsed
/// regardless of status, matching the go command's behavior.
pub async fn fetch_meta(
    client: &reqwest::Client,
    import_path: &str,
) -> Result<SourceMeta, ResolveError> {
    let mut uri = import_path.to_string();
    if !uri.contains('/') {
        // Root of a domain.
        uri.push('/');
    }
    let uri = format!("{uri}?go-get=1");

    let body = match fetch::get_body(client, &format!("https://{uri}")).await {
        Ok(body) => body,
        Err(err) => {
            warn!("secure fetch failed ({err}); retrying over http");
            fetch_any_status(client, &format!("http://{uri}")).await?
        }
    };
    parse_meta(import_path, &body)
}

/// GET that tolerates any response status, returning whatever body the
/// server produced.
async fn fetch_any_status(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network {
            url: url.to_string(),
            source: e,
        })?;
    response.text().await.map_err(|e| FetchError::Network {
        url: url.to_string(),
        source: e,
    })
}

/// Parses the head of a go-get document, returning the merged
/// declaration for `import_path` or why none was usable.
///
/// A `go-import` tag contributes a candidate repo unless its vcs kind
/// is the content-addressed `mod` type; a later `go-source` tag for the
/// same prefix supersedes it, with the placeholder repo `_` inheriting
/// the already-found URL. Conflicting declarations are ambiguous rather
/// than resolved arbitrarily.
pub fn parse_meta(import_path: &str, body: &str) -> Result<SourceMeta, ResolveError> {
    let mut found: Option<SourceMeta> = None;
    let mut failure = "go-import and go-source meta tags not found".to_string();

    for tag in Tags::new(body) {
        match tag {
            Tag::Close(name) if name.eq_ignore_ascii_case("head") => break,
            Tag::Open(name, _) if name.eq_ignore_ascii_case("body") => break,
            Tag::Open(name, attrs) if name.eq_ignore_ascii_case("meta") => {
                let kind = attr_value(&attrs, "name");
                if kind != "go-import" && kind != "go-source" {
                    continue;
                }
                let content = attr_value(&attrs, "content");
                let fields: Vec<&str> = content.split_whitespace().collect();
                let Some(&prefix) = fields.first() else {
                    continue;
                };
                // A root that is not a prefix of the path is ignored;
                // sites serve a single error page for many repos.
                if !is_path_prefix(import_path, prefix) {
                    continue;
                }
                match kind {
                    "go-import" => {
                        if fields.len() != 3 {
                            failure = "go-import meta tag content attribute does not have \
                                       three fields"
                                .to_string();
                            continue;
                        }
                        if fields[1] == "mod" {
                            // No browsable source follows from a
                            // content-addressed declaration.
                            continue;
                        }
                        if found.is_some() {
                            return Err(ResolveError::AmbiguousMetadata {
                                reason: "more than one go-import meta tag found".to_string(),
                            });
                        }
                        found = Some(SourceMeta {
                            root_prefix: prefix.to_string(),
                            repo_url: fields[2].to_string(),
                        });
                        // Keep scanning in the hope of a go-source tag.
                    }
                    "go-source" => {
                        if fields.len() != 4 {
                            failure = "go-source meta tag content attribute does not have \
                                       four fields"
                                .to_string();
                            continue;
                        }
                        if let Some(sm) = &found
                            && sm.root_prefix != prefix
                        {
                            return Err(ResolveError::AmbiguousMetadata {
                                reason: format!(
                                    "import path prefixes {:?} for go-import and {:?} for \
                                     go-source disagree",
                                    sm.root_prefix, prefix
                                ),
                            });
                        }
                        let repo_url = if fields[1] == "_" {
                            match &found {
                                Some(sm) => sm.repo_url.clone(),
                                None => {
                                    return Err(ResolveError::NotFound {
                                        reason: "go-source repo is \"_\", but no previous \
                                                 go-import tag"
                                            .to_string(),
                                    });
                                }
                            }
                        } else {
                            fields[1].to_string()
                        };
                        return Ok(SourceMeta {
                            root_prefix: prefix.to_string(),
                            repo_url,
                        });
                    }
                    _ => unreachable!(),
                }
            }
            _ => {}
        }
    }

    found.ok_or(ResolveError::NotFound { reason: failure })
}

fn is_path_prefix(import_path: &str, prefix: &str) -> bool {
    match import_path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

enum Tag {
    Open(String, Vec<(String, String)>),
    Close(String),
}

/// Tolerant tag scanner. Real go-get pages are frequently not valid
/// XML, so this walks `<...>` runs directly, skipping comments and
/// respecting quoted attribute values.
struct Tags<'a> {
    rest: &'a str,
}

impl<'a> Tags<'a> {
    fn new(body: &'a str) -> Self {
        Self { rest: body }
    }
}

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern must compile")
});

impl Iterator for Tags<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        loop {
            let start = self.rest.find('<')?;
            let after = &self.rest[start + 1..];

            if let Some(comment) = after.strip_prefix("!--") {
                match comment.find("-->") {
                    Some(end) => {
                        self.rest = &comment[end + 3..];
                        continue;
                    }
                    None => {
                        self.rest = "";
                        return None;
                    }
                }
            }

            // Find the closing '>' outside quoted attribute values.
            let mut quote: Option<char> = None;
            let mut close = None;
            for (i, ch) in after.char_indices() {
                match quote {
                    Some(q) => {
                        if ch == q {
                            quote = None;
                        }
                    }
                    None => match ch {
                        '"' | '\'' => quote = Some(ch),
                        '>' => {
                            close = Some(i);
                            break;
                        }
                        _ => {}
                    },
                }
            }
            let Some(close) = close else {
                self.rest = "";
                return None;
            };
            let inner = &after[..close];
            self.rest = &after[close + 1..];

            if inner.starts_with('!') || inner.starts_with('?') {
                // Doctype or processing instruction.
                continue;
            }
            if let Some(name_rest) = inner.strip_prefix('/') {
                let name = name_rest.split_whitespace().next().unwrap_or("");
                return Some(Tag::Close(name.to_string()));
            }

            let inner = inner.trim_start();
            let name = inner
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches('/');
            if name.is_empty() {
                continue;
            }
            let attrs = ATTR_RE
                .captures_iter(&inner[name.len()..])
                .map(|caps| {
                    let key = caps[1].to_ascii_lowercase();
                    let value = caps
                        .get(2)
                        .or_else(|| caps.get(3))
                        .or_else(|| caps.get(4))
                        .map_or(String::new(), |m| m.as_str().to_string());
                    (key, value)
                })
                .collect();
            return Some(Tag::Open(name.to_string(), attrs));
        }
    }
}

fn attr_value<'a>(attrs: &'a [(String, String)], name: &str) -> &'a str {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map_or("", |(_, value)| value.as_str())
}
