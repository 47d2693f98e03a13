//! External source clients.

pub mod clinicaltrials;
pub mod pubmed;

use async_trait::async_trait;
use curalink_common::{CanonicalPublication, CanonicalTrial};

use crate::error::SearchError;
use self::clinicaltrials::TrialFilter;

/// Default number of results requested from either source.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// A literature index that can be searched for publications.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Search for publications matching a free-text query, in source relevance order.
    async fn search_publications(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CanonicalPublication>, SearchError>;
}

/// A clinical-trial registry that can be searched with a structured filter.
#[async_trait]
pub trait TrialSource: Send + Sync {
    async fn search_trials(&self, filter: &TrialFilter) -> Result<Vec<CanonicalTrial>, SearchError>;
}

/// A string leaf, treating JSON `""` the same as a missing field.
pub(crate) fn non_empty_str(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}
