//! Canonical record shapes produced by the source adapters.
//!
//! These are the contract surface handed to the persistence layer. Every field
//! that a source may omit is an `Option` or an empty collection; nothing here
//! requires a source to be complete.

use serde::{Deserialize, Serialize};

/// Which canonical record family an operation is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Trial,
    Publication,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Trial       => "trial",
            RecordKind::Publication => "publication",
        }
    }
}

// ── Trial ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialPhase {
    #[serde(rename = "Early Phase 1")]
    EarlyPhase1,
    #[serde(rename = "Phase 1")]
    Phase1,
    #[serde(rename = "Phase 2")]
    Phase2,
    #[serde(rename = "Phase 3")]
    Phase3,
    #[serde(rename = "Phase 4")]
    Phase4,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl TrialPhase {
    /// Map a ClinicalTrials.gov v2 phase token (`PHASE2`, `NA`, …).
    pub fn from_registry(token: &str) -> Option<Self> {
        match token {
            "EARLY_PHASE1" => Some(TrialPhase::EarlyPhase1),
            "PHASE1"       => Some(TrialPhase::Phase1),
            "PHASE2"       => Some(TrialPhase::Phase2),
            "PHASE3"       => Some(TrialPhase::Phase3),
            "PHASE4"       => Some(TrialPhase::Phase4),
            "NA"           => Some(TrialPhase::NotApplicable),
            _              => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialPhase::EarlyPhase1   => "Early Phase 1",
            TrialPhase::Phase1        => "Phase 1",
            TrialPhase::Phase2        => "Phase 2",
            TrialPhase::Phase3        => "Phase 3",
            TrialPhase::Phase4        => "Phase 4",
            TrialPhase::NotApplicable => "Not Applicable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    #[serde(rename = "recruiting")]
    Recruiting,
    #[serde(rename = "not recruiting")]
    NotRecruiting,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "suspended")]
    Suspended,
    #[serde(rename = "terminated")]
    Terminated,
    #[serde(rename = "withdrawn")]
    Withdrawn,
}

impl TrialStatus {
    /// Map a ClinicalTrials.gov v2 `overallStatus` token.
    pub fn from_registry(token: &str) -> Option<Self> {
        match token {
            "RECRUITING" | "ENROLLING_BY_INVITATION"          => Some(TrialStatus::Recruiting),
            "NOT_YET_RECRUITING" | "ACTIVE_NOT_RECRUITING"    => Some(TrialStatus::NotRecruiting),
            "COMPLETED"                                       => Some(TrialStatus::Completed),
            "SUSPENDED"                                       => Some(TrialStatus::Suspended),
            "TERMINATED"                                      => Some(TrialStatus::Terminated),
            "WITHDRAWN"                                       => Some(TrialStatus::Withdrawn),
            _                                                 => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialStatus::Recruiting    => "recruiting",
            TrialStatus::NotRecruiting => "not recruiting",
            TrialStatus::Completed     => "completed",
            TrialStatus::Suspended     => "suspended",
            TrialStatus::Terminated    => "terminated",
            TrialStatus::Withdrawn     => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    All,
    Male,
    Female,
}

impl Sex {
    pub fn from_registry(token: &str) -> Option<Self> {
        match token {
            "ALL"    => Some(Sex::All),
            "MALE"   => Some(Sex::Male),
            "FEMALE" => Some(Sex::Female),
            _        => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::All    => "All",
            Sex::Male   => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub criteria: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub sex: Option<Sex>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialLocation {
    /// Human-readable `"<facility>, <city>, <country>"` strings.
    #[serde(default)]
    pub facilities: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialOrigin {
    #[serde(rename = "clinicaltrials.gov")]
    Registry,
    #[default]
    #[serde(rename = "manual")]
    Manual,
}

/// A clinical trial in canonical form.
///
/// `nct_id` is unique only when present; manually entered trials carry none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTrial {
    pub nct_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub phase: Option<TrialPhase>,
    pub status: Option<TrialStatus>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub eligibility: Eligibility,
    #[serde(default)]
    pub location: TrialLocation,
    pub contact_email: Option<String>,
    pub sponsor: Option<String>,
    #[serde(default)]
    pub origin: TrialOrigin,
    pub ai_summary: Option<String>,
}

// ── Publication ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationOrigin {
    Pubmed,
    #[default]
    Manual,
}

/// A publication in canonical form.
///
/// `published_date` is kept exactly as the source wrote it (`"2023 Jan 5"`,
/// `"2021"`, …) and is not normalised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPublication {
    pub pmid: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub published_date: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_conditions: Vec<String>,
    #[serde(default)]
    pub origin: PublicationOrigin,
    pub ai_summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_phase_tokens() {
        assert_eq!(TrialPhase::from_registry("PHASE2"), Some(TrialPhase::Phase2));
        assert_eq!(TrialPhase::from_registry("NA"), Some(TrialPhase::NotApplicable));
        assert_eq!(TrialPhase::from_registry("PHASE9"), None);
    }

    #[test]
    fn test_status_tokens_fold_into_model_vocabulary() {
        assert_eq!(TrialStatus::from_registry("ACTIVE_NOT_RECRUITING"), Some(TrialStatus::NotRecruiting));
        assert_eq!(TrialStatus::from_registry("ENROLLING_BY_INVITATION"), Some(TrialStatus::Recruiting));
        assert_eq!(TrialStatus::from_registry("UNKNOWN"), None);
    }

    #[test]
    fn test_trial_serialises_display_labels() {
        let trial = CanonicalTrial {
            nct_id: Some("NCT01234567".into()),
            phase: Some(TrialPhase::Phase3),
            status: Some(TrialStatus::NotRecruiting),
            origin: TrialOrigin::Registry,
            ..Default::default()
        };
        let json = serde_json::to_value(&trial).unwrap();
        assert_eq!(json["phase"], "Phase 3");
        assert_eq!(json["status"], "not recruiting");
        assert_eq!(json["origin"], "clinicaltrials.gov");
        assert_eq!(json["conditions"], serde_json::json!([]));
        assert_eq!(json["nctId"], "NCT01234567");
        assert!(json.get("contactEmail").is_some());
        assert!(json.get("nct_id").is_none());
    }

    #[test]
    fn test_publication_json_uses_camel_case() {
        let publication = CanonicalPublication {
            abstract_text: Some("Background".into()),
            published_date: Some("2021".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&publication).unwrap();
        assert_eq!(json["abstract"], "Background");
        assert_eq!(json["publishedDate"], "2021");
        assert_eq!(json["title"], serde_json::Value::Null);
        assert!(json.get("relatedConditions").is_some());
        assert!(json.get("aiSummary").is_some());
    }

    #[test]
    fn test_untitled_publication_deserialises() {
        let publication: CanonicalPublication =
            serde_json::from_str(r#"{"pmid": "1", "publishedDate": "2019"}"#).unwrap();
        assert_eq!(publication.title, None);
        assert_eq!(publication.published_date.as_deref(), Some("2019"));
        assert_eq!(publication.origin, PublicationOrigin::Manual);
    }

    #[test]
    fn test_manual_trial_deserialises_with_defaults() {
        let trial: CanonicalTrial =
            serde_json::from_str(r#"{"title": "Manual entry", "description": "x"}"#).unwrap();
        assert_eq!(trial.nct_id, None);
        assert_eq!(trial.origin, TrialOrigin::Manual);
        assert!(trial.location.facilities.is_empty());
    }
}
