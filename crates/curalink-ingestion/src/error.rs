use curalink_common::CuralinkError;
use thiserror::Error;

/// The only error an adapter call surfaces.
///
/// The underlying cause is kept for logging through `source()`, but callers
/// are expected to treat every variant as "source unavailable".
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to search {origin}")]
    SearchFailed {
        origin: &'static str,
        #[source]
        cause: CuralinkError,
    },

    #[error("Failed to fetch details from {origin}")]
    FetchFailed {
        origin: &'static str,
        #[source]
        cause: CuralinkError,
    },
}

impl SearchError {
    pub(crate) fn search(origin: &'static str) -> impl FnOnce(CuralinkError) -> Self {
        move |cause| {
            tracing::error!(origin, error = %cause, "External search failed");
            SearchError::SearchFailed { origin, cause }
        }
    }

    pub(crate) fn fetch(origin: &'static str) -> impl FnOnce(CuralinkError) -> Self {
        move |cause| {
            tracing::error!(origin, error = %cause, "External fetch failed");
            SearchError::FetchFailed { origin, cause }
        }
    }
}
