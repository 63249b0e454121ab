//! Core types for the version catalog.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A released version of a module as reported by a proxy mirror or the
/// Go distribution index.
///
/// Proxy `.info` documents spell their fields `Version`/`Time`; the
/// distribution index uses lowercase. Both spellings are accepted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VersionRecord {
    #[serde(rename = "Version", alias = "version")]
    pub version: String,

    /// Publication timestamp, when the source reports one.
    #[serde(rename = "Time", alias = "time", default)]
    pub time: Option<DateTime<Utc>>,

    /// Whether the version falls inside a published retraction range.
    #[serde(skip)]
    pub retracted: bool,

    /// The retraction rationale, if the publisher gave one.
    #[serde(skip)]
    pub rationale: Option<String>,
}
