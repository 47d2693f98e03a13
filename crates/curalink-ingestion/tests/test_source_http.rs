//! Adapter request protocol against a local mock server.

use std::time::Duration;

use curalink_common::SandboxClient;
use curalink_ingestion::{
    ClinicalTrialsClient, PubMedClient, PublicationSource, SearchError, TrialFilter, TrialSource,
};
use curalink_test_utils::{esummary_result, studies_response};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sandbox() -> SandboxClient {
    SandboxClient::new(Duration::from_secs(5)).unwrap()
}

async fn mount_esearch(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": ids.len().to_string(), "idlist": ids}
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── PubMed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pubmed_two_calls_keep_search_order() {
    let server = MockServer::start().await;
    mount_esearch(&server, &["303", "202", "101"]).await;
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("id", "303,202,101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": esummary_result()})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::new(sandbox(), server.uri(), None);
    let pubs = client.search_publications("melanoma", 3).await.unwrap();

    let ids: Vec<_> = pubs.iter().filter_map(|p| p.pmid.as_deref()).collect();
    assert_eq!(ids, vec!["303", "101"]);
}

#[tokio::test]
async fn test_pubmed_empty_idlist_skips_esummary() {
    let server = MockServer::start().await;
    mount_esearch(&server, &[]).await;
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let client = PubMedClient::new(sandbox(), server.uri(), None);
    let pubs = client.search_publications("nothing matches this", 5).await.unwrap();

    assert!(pubs.is_empty());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/esearch.fcgi");
}

#[tokio::test]
async fn test_pubmed_esummary_error_status_fails_whole_search() {
    let server = MockServer::start().await;
    mount_esearch(&server, &["101"]).await;
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::new(sandbox(), server.uri(), None);
    let err = client.search_publications("asthma", 5).await.unwrap_err();
    assert!(matches!(err, SearchError::SearchFailed { origin: "PubMed", .. }));
}

#[tokio::test]
async fn test_pubmed_malformed_esummary_fails_whole_search() {
    let server = MockServer::start().await;
    mount_esearch(&server, &["101"]).await;
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::new(sandbox(), server.uri(), None);
    let err = client.search_publications("asthma", 5).await.unwrap_err();
    assert!(matches!(err, SearchError::SearchFailed { .. }));
}

#[tokio::test]
async fn test_pubmed_api_key_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("api_key", "ncbi-key"))
        .and(query_param("retmax", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"esearchresult": {"idlist": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::new(sandbox(), server.uri(), Some("ncbi-key".into()));
    assert!(client.search_publications("asthma", 7).await.unwrap().is_empty());
}

// ── ClinicalTrials.gov ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_trials_search_maps_studies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/studies"))
        .and(query_param("query.cond", "asthma"))
        .and(query_param("pageSize", "20"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(studies_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClinicalTrialsClient::new(sandbox(), format!("{}/api/v2/studies", server.uri()));
    let filter = TrialFilter { condition: Some("asthma".into()), ..Default::default() };
    let trials = client.search_trials(&filter).await.unwrap();

    assert_eq!(trials.len(), 2);
}

#[tokio::test]
async fn test_trials_empty_studies_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/studies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"studies": []})))
        .mount(&server)
        .await;

    let client = ClinicalTrialsClient::new(sandbox(), format!("{}/api/v2/studies", server.uri()));
    let trials = client.search_trials(&TrialFilter::default()).await.unwrap();
    assert!(trials.is_empty());
}

#[tokio::test]
async fn test_trials_error_status_is_search_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/studies"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ClinicalTrialsClient::new(sandbox(), format!("{}/api/v2/studies", server.uri()));
    let err = client.search_trials(&TrialFilter::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::SearchFailed { origin: "ClinicalTrials.gov", .. }));
}

#[tokio::test]
async fn test_trial_lookup_uses_nct_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/studies/NCT01234567"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "protocolSection": {
                "identificationModule": {"nctId": "NCT01234567", "briefTitle": "Brief"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClinicalTrialsClient::new(sandbox(), format!("{}/api/v2/studies", server.uri()));
    let trial = client.fetch_trial("NCT01234567").await.unwrap();
    assert_eq!(trial.nct_id.as_deref(), Some("NCT01234567"));
    assert_eq!(trial.title.as_deref(), Some("Brief"));
}
