//! ClinicalTrials.gov v2 API client.
//!
//! API docs: https://clinicaltrials.gov/data-api/api
//! Endpoint: https://clinicaltrials.gov/api/v2/studies
//!
//! Every section of a study (`identificationModule`, `statusModule`, …) is
//! optional in practice, and so is every leaf inside it. Mapping never fails:
//! a missing section just leaves the corresponding canonical fields empty.

use async_trait::async_trait;
use curalink_common::{
    CanonicalTrial, CuralinkError, Eligibility, SandboxClient, Sex, TrialLocation, TrialOrigin,
    TrialPhase, TrialStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::SearchError;
use super::{non_empty_str, TrialSource, DEFAULT_MAX_RESULTS};

pub const DEFAULT_CT_API_URL: &str = "https://clinicaltrials.gov/api/v2/studies";
const ORIGIN: &str = "ClinicalTrials.gov";

/// Search parameters. Any field left `None` (or blank) is omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialFilter {
    pub condition: Option<String>,
    pub location: Option<String>,
    /// Registry status token(s), e.g. `RECRUITING` or `RECRUITING,COMPLETED`.
    pub status: Option<String>,
    pub max_results: Option<usize>,
}

pub struct ClinicalTrialsClient {
    client: SandboxClient,
    base_url: String,
    default_page_size: usize,
}

impl ClinicalTrialsClient {
    pub fn new(client: SandboxClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_page_size: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    async fn get_json(&self, url: &str, params: &[(&'static str, String)]) -> Result<Value, CuralinkError> {
        Ok(self.client
            .get(url)?
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?)
    }

    /// Look up a single study by NCT ID.
    #[instrument(skip(self))]
    pub async fn fetch_trial(&self, nct_id: &str) -> Result<CanonicalTrial, SearchError> {
        let url = format!("{}/{}", self.base_url, nct_id);
        let study = self.get_json(&url, &[("format", "json".to_string())])
            .await
            .map_err(SearchError::fetch(ORIGIN))?;
        Ok(map_study(&study))
    }
}

#[async_trait]
impl TrialSource for ClinicalTrialsClient {
    #[instrument(skip(self))]
    async fn search_trials(&self, filter: &TrialFilter) -> Result<Vec<CanonicalTrial>, SearchError> {
        let params = query_params(filter, self.default_page_size);
        let resp = self.get_json(&self.base_url, &params)
            .await
            .map_err(SearchError::search(ORIGIN))?;

        let trials = map_studies(&resp);
        debug!(n = trials.len(), "ClinicalTrials.gov studies retrieved");
        Ok(trials)
    }
}

/// Build the query string, leaving out every absent filter field.
pub fn query_params(filter: &TrialFilter, default_page_size: usize) -> Vec<(&'static str, String)> {
    let present = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut params = Vec::new();
    if let Some(condition) = present(&filter.condition) {
        params.push(("query.cond", condition));
    }
    if let Some(location) = present(&filter.location) {
        params.push(("query.locn", location));
    }
    if let Some(status) = present(&filter.status) {
        params.push(("filter.overallStatus", status));
    }
    params.push(("pageSize", filter.max_results.unwrap_or(default_page_size).to_string()));
    params.push(("format", "json".to_string()));
    params
}

/// Map a search response. A missing `studies` list means no results.
pub fn map_studies(resp: &Value) -> Vec<CanonicalTrial> {
    resp["studies"]
        .as_array()
        .map(|studies| studies.iter().map(map_study).collect())
        .unwrap_or_default()
}

/// Map one v2 study object to a canonical trial.
pub fn map_study(study: &Value) -> CanonicalTrial {
    let proto       = &study["protocolSection"];
    let id_mod      = &proto["identificationModule"];
    let status_mod  = &proto["statusModule"];
    let desc_mod    = &proto["descriptionModule"];
    let design_mod  = &proto["designModule"];
    let cond_mod    = &proto["conditionsModule"];
    let elig_mod    = &proto["eligibilityModule"];
    let contact_mod = &proto["contactsLocationsModule"];
    let sponsor_mod = &proto["sponsorCollaboratorsModule"];

    let phase = design_mod["phases"]
        .as_array()
        .and_then(|phases| phases.first())
        .and_then(|p| p.as_str())
        .and_then(|token| {
            let phase = TrialPhase::from_registry(token);
            if phase.is_none() {
                debug!(token, "Unrecognised trial phase");
            }
            phase
        });

    let status = status_mod["overallStatus"].as_str().and_then(|token| {
        let status = TrialStatus::from_registry(token);
        if status.is_none() {
            debug!(token, "Unrecognised trial status");
        }
        status
    });

    let conditions = cond_mod["conditions"]
        .as_array()
        .map(|c| c.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let facilities = contact_mod["locations"]
        .as_array()
        .map(|locs| locs.iter().filter_map(format_facility).collect())
        .unwrap_or_default();

    CanonicalTrial {
        nct_id:        non_empty_str(&id_mod["nctId"]),
        title:         non_empty_str(&id_mod["officialTitle"])
                           .or_else(|| non_empty_str(&id_mod["briefTitle"])),
        description:   non_empty_str(&desc_mod["briefSummary"]),
        phase,
        status,
        conditions,
        eligibility:   Eligibility {
            criteria: non_empty_str(&elig_mod["eligibilityCriteria"]),
            min_age:  non_empty_str(&elig_mod["minimumAge"]),
            max_age:  non_empty_str(&elig_mod["maximumAge"]),
            sex:      elig_mod["sex"].as_str().and_then(Sex::from_registry),
        },
        location:      TrialLocation { facilities },
        contact_email: non_empty_str(&contact_mod["centralContacts"][0]["email"]),
        sponsor:       non_empty_str(&sponsor_mod["leadSponsor"]["name"]),
        origin:        TrialOrigin::Registry,
        ai_summary:    None,
    }
}

/// `"<facility>, <city>, <country>"`, leaving out whichever parts are missing.
fn format_facility(location: &Value) -> Option<String> {
    let parts: Vec<&str> = ["facility", "city", "country"]
        .iter()
        .filter_map(|key| location[*key].as_str())
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
