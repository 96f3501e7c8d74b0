//! Error types for the matching engine and its collaborators.

/// Errors produced by the engine itself, before any scoring happens.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid search criteria: {0}")]
    InvalidCriteria(String),
}

/// Errors surfaced by the persistence collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile not found: {id}")]
    NotFound { id: String },
    #[error("store unavailable")]
    Unavailable {
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    /// Whether retrying the same request can reasonably succeed.
    ///
    /// Pool fetch failures are infrastructure trouble and worth a retry;
    /// a missing profile is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Combined error type for the orchestrated search path.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Criteria(#[from] MatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SearchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Criteria(_) => false,
            Self::Store(err) => err.is_retryable(),
        }
    }
}
