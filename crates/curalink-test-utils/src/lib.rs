//! Fixtures shared by the CuraLink test suites.

use curalink_common::{
    CanonicalPublication, CanonicalTrial, PublicationOrigin, TrialOrigin, UserProfile,
};
use serde_json::{json, Value};

/// A base URL nothing listens on; requests fail fast with a connection error.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

pub fn trial(nct_id: &str, title: &str, conditions: &[&str]) -> CanonicalTrial {
    CanonicalTrial {
        nct_id: Some(nct_id.to_string()),
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        origin: TrialOrigin::Registry,
        ..Default::default()
    }
}

pub fn manual_trial(title: &str, description: &str) -> CanonicalTrial {
    CanonicalTrial {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        ..Default::default()
    }
}

pub fn publication(pmid: &str, title: &str, abstract_text: Option<&str>) -> CanonicalPublication {
    CanonicalPublication {
        pmid: Some(pmid.to_string()),
        title: Some(title.to_string()),
        abstract_text: abstract_text.map(String::from),
        url: Some(format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/")),
        origin: PublicationOrigin::Pubmed,
        ..Default::default()
    }
}

/// `n` trials titled `Trial 0` .. `Trial n-1` with no conditions.
pub fn numbered_trials(n: usize) -> Vec<CanonicalTrial> {
    (0..n)
        .map(|i| trial(&format!("NCT{i:08}"), &format!("Trial {i}"), &[]))
        .collect()
}

pub fn patient(conditions: &[&str]) -> UserProfile {
    UserProfile::patient(conditions.iter().copied())
}

pub fn researcher(interests: &[&str], specialties: &[&str]) -> UserProfile {
    UserProfile::researcher(interests.iter().copied(), specialties.iter().copied())
}

/// An esummary `result` object for PMIDs 101 and 303 (202 is missing).
pub fn esummary_result() -> Value {
    json!({
        "uids": ["101", "303"],
        "303": {
            "uid": "303",
            "title": "Checkpoint inhibitors in melanoma",
            "authors": [{"name": "Garcia M"}],
            "source": "J Clin Oncol",
            "pubdate": "2022 Mar",
            "elocationid": "doi:10.1200/JCO.22.00001"
        },
        "101": {
            "uid": "101",
            "title": "Asthma biologics review",
            "authors": [{"name": "Chen L"}, {"name": "Okafor A"}],
            "fulljournalname": "The Lancet. Respiratory medicine",
            "source": "Lancet Respir Med",
            "pubdate": "2020",
            "elocationid": "doi:10.1016/S2213-2600(20)30001-1 pii:S2213"
        }
    })
}

/// A v2 `studies` search response: one complete study, one with only an ID.
pub fn studies_response() -> Value {
    json!({
        "studies": [
            {
                "protocolSection": {
                    "identificationModule": {"nctId": "NCT05000001", "briefTitle": "Asthma Inhaler Study"},
                    "statusModule": {"overallStatus": "COMPLETED"},
                    "descriptionModule": {"briefSummary": "Compares two inhalers."},
                    "designModule": {"phases": ["PHASE3"]},
                    "conditionsModule": {"conditions": ["Asthma"]},
                    "eligibilityModule": {"sex": "FEMALE", "minimumAge": "12 Years"},
                    "contactsLocationsModule": {
                        "locations": [{"facility": "St Mary's", "city": "London", "country": "United Kingdom"}]
                    },
                    "sponsorCollaboratorsModule": {"leadSponsor": {"name": "NHS Trust"}}
                }
            },
            {
                "protocolSection": {
                    "identificationModule": {"nctId": "NCT05000002"}
                }
            }
        ],
        "nextPageToken": "abc"
    })
}
