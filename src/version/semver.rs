//! Go-flavored semantic version comparison.
//!
//! Mirrors the leniency of the Go module system: versions carry a
//! leading `v`, minor and patch may be omitted, build metadata is
//! ignored, and a string that does not parse sorts below every valid
//! version. Toolchain releases use a literal `go` prefix (`go1.21.0`)
//! which [`compare_toolchain`] treats as the generic `v`.

use std::cmp::Ordering;

use semver::Version;

/// Compares two version strings under Go module precedence rules.
///
/// An invalid version sorts below any valid one; two invalid versions
/// compare equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (canonical(a), canonical(b)) {
        (Some(x), Some(y)) => x.cmp_precedence(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Compares two version strings, treating a literal `go` prefix as the
/// generic `v` prefix so toolchain releases order correctly
/// (`go1.21.0` above `go1.9.0`).
pub fn compare_toolchain(a: &str, b: &str) -> Ordering {
    compare(&normalize_toolchain(a), &normalize_toolchain(b))
}

/// Returns the pre-release component of a version, hyphen included
/// (`"-beta.1"`), or an empty string if the version is invalid or has
/// none.
pub fn prerelease(v: &str) -> String {
    match canonical(v) {
        Some(ver) if !ver.pre.is_empty() => format!("-{}", ver.pre),
        _ => String::new(),
    }
}

fn normalize_toolchain(v: &str) -> String {
    match v.strip_prefix("go") {
        Some(rest) => format!("v{rest}"),
        None => v.to_string(),
    }
}

/// Parses a Go-style version into a `semver::Version`, padding omitted
/// minor/patch with zeros and dropping build metadata. The leading `v`
/// is mandatory.
fn canonical(v: &str) -> Option<Version> {
    let rest = v.strip_prefix('v')?;
    let rest = rest.split('+').next().unwrap_or(rest);
    let (core, pre) = match rest.find('-') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    let padded = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        3 => core.to_string(),
        _ => return None,
    };

    let full = match pre {
        Some(p) => format!("{padded}-{p}"),
        None => padded,
    };
    Version::parse(&full).ok()
}
