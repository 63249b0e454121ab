use thiserror::Error;

use crate::fetch::FetchError;

/// Errors from repository URL resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Transport-level failure talking to the module's landing page.
    /// Retrying may help.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No repository declaration exists for the path. A normal outcome
    /// for obscure or self-hosted modules; retrying will not help.
    #[error("repository not found: {reason}")]
    NotFound { reason: String },

    /// The landing page carried conflicting declarations. Retrying will
    /// not help either.
    #[error("ambiguous repository metadata: {reason}")]
    AmbiguousMetadata { reason: String },
}

impl ResolveError {
    /// Whether the failure could be transient and worth a caller retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ResolveError::Fetch(_))
    }
}
