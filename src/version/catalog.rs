//! Version catalog aggregation across proxy mirrors.
//!
//! Collects every version each configured mirror knows, merges the
//! results into one deduplicated descending list, and annotates entries
//! that fall inside a published retraction range. Mirrors are queried
//! sequentially and completely: a partial catalog could hide a
//! retraction, so any failure aborts the whole call.

use std::cmp::Ordering;

use tracing::debug;

use crate::version::dl;
use crate::version::error::CatalogError;
use crate::version::modfile::RetractionRange;
use crate::version::proxy::ProxyClient;
use crate::version::semver::{compare, compare_toolchain};
use crate::version::types::VersionRecord;

/// Module path under which the standard library is reported.
pub const STD_MODULE: &str = "std";

/// Returns the released versions of `module` known to the given proxy
/// mirrors, newest first, deduplicated, with retraction annotations.
///
/// Versions older than `current` are dropped unless `all` is set; the
/// comparison tolerates toolchain-style `go` prefixes in `current`.
/// The standard-library pseudo-module is served from the distribution
/// index instead of the mirrors.
pub async fn available_versions(
    client: &reqwest::Client,
    proxies: &[String],
    module: &str,
    current: &str,
    all: bool,
) -> Result<Vec<VersionRecord>, CatalogError> {
    if module == STD_MODULE {
        return dl::releases(client, dl::DEFAULT_INDEX_URL).await;
    }

    let mut records = Vec::new();
    let mut retractions = Vec::new();
    for base_url in proxies {
        let proxy = ProxyClient::new(client.clone(), base_url);
        let list = proxy.versions(module).await?;
        debug!("{}: {} versions listed by {}", module, list.len(), base_url);
        for version in &list {
            if !all && compare_toolchain(version, current) == Ordering::Less {
                continue;
            }
            records.push(proxy.info(module, version).await?);
            retractions.extend(proxy.retractions(module, version).await?);
        }
    }

    let mut records = dedupe(records);
    annotate_retractions(&mut records, &retractions);
    Ok(records)
}

/// Sorts records descending by semantic version and keeps one record
/// per distinct version. The earliest-seen record wins a tie, so the
/// first configured mirror takes precedence.
pub fn dedupe(mut records: Vec<VersionRecord>) -> Vec<VersionRecord> {
    records.sort_by(|a, b| compare(&b.version, &a.version));
    records.dedup_by(|a, b| compare(&a.version, &b.version) == Ordering::Equal);
    records
}

/// Marks every record whose version falls inside one of `ranges` as
/// retracted. Both bounds are inclusive; discovery order of ranges and
/// versions does not matter.
pub fn annotate_retractions(records: &mut [VersionRecord], ranges: &[RetractionRange]) {
    for record in records.iter_mut() {
        for range in ranges {
            if compare(&record.version, &range.low) != Ordering::Less
                && compare(&record.version, &range.high) != Ordering::Greater
            {
                record.retracted = true;
                record.rationale = if range.rationale.is_empty() {
                    None
                } else {
                    Some(range.rationale.clone())
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(version: &str) -> VersionRecord {
        VersionRecord {
            version: version.to_string(),
            time: None,
            retracted: false,
            rationale: None,
        }
    }

    fn range(low: &str, high: &str, rationale: &str) -> RetractionRange {
        RetractionRange {
            low: low.to_string(),
            high: high.to_string(),
            rationale: rationale.to_string(),
        }
    }

    #[test]
    fn dedupe_sorts_descending_without_duplicates() {
        let records = vec![
            record("v1.0.0"),
            record("v1.2.0"),
            record("v1.0.0"),
            record("v1.1.0"),
            record("v1.2.0"),
        ];

        let deduped = dedupe(records);

        let versions: Vec<&str> = deduped.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["v1.2.0", "v1.1.0", "v1.0.0"]);
    }

    #[test]
    fn dedupe_keeps_first_seen_record_for_equal_versions() {
        let mut first = record("v1.0.0");
        first.rationale = Some("from mirror a".to_string());
        let second = record("v1.0.0");

        let deduped = dedupe(vec![first, second]);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].rationale.as_deref(), Some("from mirror a"));
    }

    #[rstest]
    // Bounds are inclusive on both ends.
    #[case("v1.1.0", true)]
    #[case("v1.3.0", true)]
    #[case("v1.2.0", true)]
    // Just outside either bound is untouched.
    #[case("v1.0.9", false)]
    #[case("v1.3.1", false)]
    fn annotate_respects_inclusive_bounds(#[case] version: &str, #[case] retracted: bool) {
        let mut records = vec![record(version)];
        annotate_retractions(&mut records, &[range("v1.1.0", "v1.3.0", "bad batch")]);

        assert_eq!(records[0].retracted, retracted);
        if retracted {
            assert_eq!(records[0].rationale.as_deref(), Some("bad batch"));
        } else {
            assert_eq!(records[0].rationale, None);
        }
    }

    #[test]
    fn annotate_with_empty_rationale_leaves_reason_unset() {
        let mut records = vec![record("v1.0.0")];
        annotate_retractions(&mut records, &[range("v1.0.0", "v1.0.0", "")]);

        assert!(records[0].retracted);
        assert_eq!(records[0].rationale, None);
    }

    #[test]
    fn annotate_is_independent_of_range_discovery_order() {
        let ranges_forward = [range("v1.0.0", "v1.1.0", "a"), range("v2.0.0", "v2.0.0", "b")];
        let ranges_reverse = [range("v2.0.0", "v2.0.0", "b"), range("v1.0.0", "v1.1.0", "a")];

        let mut left = vec![record("v1.0.5"), record("v2.0.0"), record("v3.0.0")];
        let mut right = left.clone();
        annotate_retractions(&mut left, &ranges_forward);
        annotate_retractions(&mut right, &ranges_reverse);

        assert_eq!(left, right);
        assert!(left[0].retracted && left[1].retracted && !left[2].retracted);
    }

    #[test]
    fn annotate_single_version_range_hits_exactly_one_version() {
        let mut records = vec![record("v1.0.0"), record("v1.0.1"), record("v1.0.2")];
        annotate_retractions(&mut records, &[range("v1.0.1", "v1.0.1", "oops")]);

        assert!(!records[0].retracted);
        assert!(records[1].retracted);
        assert!(!records[2].retracted);
    }
}
