//! curalink-ingestion: External source adapters.
//!
//! - PubMed (two-phase esearch → esummary, plus efetch detail lookup)
//! - ClinicalTrials.gov v2 (single parameterised study search, plus study lookup)
//!
//! Both adapters emit the canonical records from `curalink-common` and
//! collapse every transport failure into a single [`SearchError`].

pub mod error;
pub mod sources;

pub use error::SearchError;
pub use sources::clinicaltrials::{ClinicalTrialsClient, TrialFilter};
pub use sources::pubmed::{PubMedClient, PublicationDetails};
pub use sources::{PublicationSource, TrialSource};
