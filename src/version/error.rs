use thiserror::Error;

use crate::fetch::FetchError;

/// Errors from version catalog aggregation.
///
/// Any failure aborts the whole call; a silently dropped mirror or
/// document could hide a retraction.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid version information from {url}: {reason}")]
    Decode { url: String, reason: String },
}
