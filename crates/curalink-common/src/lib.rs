//! curalink-common: Shared record types, errors, and the HTTP client used across all CuraLink crates.

pub mod error;
pub mod records;
pub mod profile;
pub mod sandbox;

// Re-export commonly used types
pub use error::{CuralinkError, Result};
pub use profile::UserProfile;
pub use records::{
    CanonicalPublication, CanonicalTrial, Eligibility, PublicationOrigin, RecordKind, Sex,
    TrialLocation, TrialOrigin, TrialPhase, TrialStatus,
};
pub use sandbox::SandboxClient;
