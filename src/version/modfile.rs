//! Retraction directives from `go.mod` manifests.
//!
//! A manifest may declare that published versions should no longer be
//! used:
//!
//! ```text
//! retract v1.0.5 // CVE-2023-1234
//! retract [v1.1.0, v1.1.9]
//! retract (
//!     // Published accidentally.
//!     v0.9.0
//!     [v0.1.0, v0.2.0] // API misdesign
//! )
//! ```
//!
//! Only the `retract` directive is interpreted here; everything else in
//! the manifest is ignored.

use thiserror::Error;

/// A closed inclusive interval of retracted versions. A single-version
/// directive is the degenerate range `[v, v]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetractionRange {
    pub low: String,
    pub high: String,
    /// Rationale from the comment on or above the directive; empty when
    /// the publisher gave none.
    pub rationale: String,
}

#[derive(Debug, Error)]
pub enum ModfileError {
    #[error("malformed retract directive on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("unterminated retract block starting on line {line}")]
    UnterminatedBlock { line: usize },
}

/// Extracts all retraction ranges declared in `text`.
pub fn parse_retractions(text: &str) -> Result<Vec<RetractionRange>, ModfileError> {
    let mut ranges = Vec::new();
    let mut pending_comment: Vec<String> = Vec::new();
    let mut block_start: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let lineno = idx + 1;

        if block_start.is_some() {
            if line == ")" {
                block_start = None;
                pending_comment.clear();
            } else if line.is_empty() {
                pending_comment.clear();
            } else if let Some(comment) = line.strip_prefix("//") {
                pending_comment.push(comment.trim().to_string());
            } else {
                let (entry, suffix) = split_comment(line);
                let rationale = rationale_from(suffix, &pending_comment);
                ranges.push(parse_entry(entry.trim(), rationale, lineno)?);
                pending_comment.clear();
            }
            continue;
        }

        if let Some(rest) = strip_directive(line) {
            let (body, suffix) = split_comment(rest);
            let body = body.trim();
            if body == "(" {
                block_start = Some(lineno);
            } else {
                let rationale = rationale_from(suffix, &pending_comment);
                ranges.push(parse_entry(body, rationale, lineno)?);
            }
            pending_comment.clear();
        } else if let Some(comment) = line.strip_prefix("//") {
            pending_comment.push(comment.trim().to_string());
        } else {
            pending_comment.clear();
        }
    }

    if let Some(line) = block_start {
        return Err(ModfileError::UnterminatedBlock { line });
    }
    Ok(ranges)
}

/// Returns the remainder of a `retract` directive line, or None if the
/// line is something else.
fn strip_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("retract")?;
    if rest.starts_with([' ', '\t', '(']) {
        Some(rest)
    } else {
        None
    }
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once("//") {
        Some((before, comment)) => (before, Some(comment.trim())),
        None => (line, None),
    }
}

fn rationale_from(suffix: Option<&str>, preceding: &[String]) -> String {
    match suffix {
        Some(comment) if !comment.is_empty() => comment.to_string(),
        _ => preceding.join(" "),
    }
}

fn parse_entry(
    entry: &str,
    rationale: String,
    line: usize,
) -> Result<RetractionRange, ModfileError> {
    if let Some(interval) = entry.strip_prefix('[') {
        let interval = interval
            .strip_suffix(']')
            .ok_or_else(|| ModfileError::Malformed {
                line,
                reason: "unterminated version interval".to_string(),
            })?;
        let (low, high) = interval
            .split_once(',')
            .ok_or_else(|| ModfileError::Malformed {
                line,
                reason: "interval must contain two versions".to_string(),
            })?;
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() || high.is_empty() {
            return Err(ModfileError::Malformed {
                line,
                reason: "interval must contain two versions".to_string(),
            });
        }
        return Ok(RetractionRange {
            low: low.to_string(),
            high: high.to_string(),
            rationale,
        });
    }

    if entry.is_empty() || entry.contains(char::is_whitespace) {
        return Err(ModfileError::Malformed {
            line,
            reason: "expected a single version or an interval".to_string(),
        });
    }
    Ok(RetractionRange {
        low: entry.to_string(),
        high: entry.to_string(),
        rationale,
    })
}
