//! PubMed E-utilities client.
//!
//! Endpoints used (relative to the configured base URL):
//!   esearch.fcgi:  query → ordered PMID list
//!   esummary.fcgi: PMID list → map of PMID → document summary
//!   efetch.fcgi:   single PMID → PubMed XML (abstract lookup)
//!
//! A search is always esearch followed by esummary. The summary map is
//! unordered, so results follow the esearch order; PMIDs missing from the
//! summary map are skipped.

use async_trait::async_trait;
use curalink_common::{CanonicalPublication, CuralinkError, PublicationOrigin, SandboxClient};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::SearchError;
use super::{non_empty_str, PublicationSource};

pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const ORIGIN: &str = "PubMed";

pub struct PubMedClient {
    client: SandboxClient,
    base_url: String,
    api_key: Option<String>,
}

/// Result of an efetch lookup for a single PMID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDetails {
    pub pmid: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub xml: String,
}

impl PubMedClient {
    pub fn new(client: SandboxClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("db", "pubmed".to_string())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Search PubMed and return PMIDs in relevance order.
    #[instrument(skip(self))]
    async fn esearch(&self, query: &str, max: usize) -> Result<Vec<String>, CuralinkError> {
        let mut params = self.base_params();
        params.push(("term", query.to_string()));
        params.push(("retmax", max.to_string()));
        params.push(("retmode", "json".to_string()));

        let resp: Value = self.client
            .get(&self.endpoint("esearch.fcgi"))?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids = parse_esearch(&resp)?;
        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch document summaries for all PMIDs in one call; returns the `result` map.
    #[instrument(skip(self), fields(n = pmids.len()))]
    async fn esummary(&self, pmids: &[String]) -> Result<Value, CuralinkError> {
        let mut params = self.base_params();
        params.push(("id", pmids.join(",")));
        params.push(("retmode", "json".to_string()));

        let mut resp: Value = self.client
            .get(&self.endpoint("esummary.fcgi"))?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match resp.get_mut("result") {
            Some(result) if result.is_object() => Ok(result.take()),
            _ => Err(CuralinkError::MalformedResponse(
                "esummary response has no result object".to_string(),
            )),
        }
    }

    /// Fetch the PubMed XML record for one PMID and pull out its abstract.
    #[instrument(skip(self))]
    pub async fn fetch_publication_details(&self, pmid: &str) -> Result<PublicationDetails, SearchError> {
        let fetch = async {
            let mut params = self.base_params();
            params.push(("id", pmid.to_string()));
            params.push(("retmode", "xml".to_string()));

            let xml = self.client
                .get(&self.endpoint("efetch.fcgi"))?
                .query(&params)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            let abstract_text = parse_abstract_xml(&xml)?;
            Ok::<_, CuralinkError>(PublicationDetails { pmid: pmid.to_string(), abstract_text, xml })
        };

        fetch.await.map_err(SearchError::fetch(ORIGIN))
    }
}

#[async_trait]
impl PublicationSource for PubMedClient {
    #[instrument(skip(self))]
    async fn search_publications(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CanonicalPublication>, SearchError> {
        let pmids = self.esearch(query, max_results)
            .await
            .map_err(SearchError::search(ORIGIN))?;
        if pmids.is_empty() {
            return Ok(vec![]);
        }

        let summaries = self.esummary(&pmids)
            .await
            .map_err(SearchError::search(ORIGIN))?;

        let publications = map_summaries(&pmids, &summaries);
        debug!(requested = pmids.len(), mapped = publications.len(), "PubMed search complete");
        Ok(publications)
    }
}

fn parse_esearch(resp: &Value) -> Result<Vec<String>, CuralinkError> {
    let result = resp
        .get("esearchresult")
        .filter(|r| r.is_object())
        .ok_or_else(|| CuralinkError::MalformedResponse("esearch response has no esearchresult".to_string()))?;

    Ok(result["idlist"]
        .as_array()
        .map(|ids| ids.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default())
}

/// Map an esummary `result` object to publications, in `pmids` order.
pub fn map_summaries(pmids: &[String], summaries: &Value) -> Vec<CanonicalPublication> {
    pmids
        .iter()
        .filter_map(|pmid| {
            let doc = summaries.get(pmid).filter(|d| d.is_object() && d.get("error").is_none());
            if doc.is_none() {
                warn!(pmid = %pmid, "No esummary document for PMID, skipping");
            }
            doc.map(|d| map_summary(pmid, d))
        })
        .collect()
}

/// Map one esummary document to a canonical publication.
pub fn map_summary(pmid: &str, doc: &Value) -> CanonicalPublication {
    let pmid = non_empty_str(&doc["uid"]).unwrap_or_else(|| pmid.to_string());

    let authors = doc["authors"]
        .as_array()
        .map(|a| a.iter().filter_map(|author| author["name"].as_str().map(String::from)).collect())
        .unwrap_or_default();

    CanonicalPublication {
        title:          non_empty_str(&doc["title"]),
        abstract_text:  None,
        authors,
        journal:        non_empty_str(&doc["fulljournalname"]).or_else(|| non_empty_str(&doc["source"])),
        published_date: non_empty_str(&doc["pubdate"]),
        doi:            doc["elocationid"].as_str().and_then(parse_doi),
        url:            Some(pubmed_url(&pmid)),
        keywords:       vec![],
        related_conditions: vec![],
        origin:         PublicationOrigin::Pubmed,
        ai_summary:     None,
        pmid:           Some(pmid),
    }
}

/// Extract a DOI from an esummary `elocationid` such as `"doi:10.1000/xyz123 extra"`.
///
/// Takes the first whitespace-delimited token and strips a `doi:` prefix. When
/// the prefix stands alone (`"doi: 10.1000/xyz"`), the following token is used.
pub fn parse_doi(elocation_id: &str) -> Option<String> {
    let mut tokens = elocation_id.split_whitespace();
    let first = tokens.next()?;
    let doi = match first.strip_prefix("doi:") {
        Some("")   => tokens.next()?,
        Some(rest) => rest,
        None       => first,
    };
    (!doi.is_empty()).then(|| doi.to_string())
}

pub fn pubmed_url(pmid: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid)
}

/// Collect every `<AbstractText>` segment of a PubMed XML record.
/// Labelled segments (`Label="METHODS"`) are prefixed with their label.
fn parse_abstract_xml(xml: &str) -> Result<Option<String>, CuralinkError> {
    let mut reader = Reader::from_str(xml);
    let mut segments: Vec<String> = Vec::new();
    let mut in_abstract = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"AbstractText" => {
                in_abstract = true;
                current.clear();
                if let Ok(Some(label)) = e.try_get_attribute("Label") {
                    if let Ok(label) = label.unescape_value() {
                        current.push_str(&label);
                        current.push_str(": ");
                    }
                }
            }
            Ok(Event::Text(ref e)) if in_abstract => {
                let text = e.unescape().map_err(|err| CuralinkError::Xml(err.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"AbstractText" => {
                in_abstract = false;
                let segment = current.trim();
                if !segment.is_empty() {
                    segments.push(segment.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CuralinkError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok((!segments.is_empty()).then(|| segments.join("\n")))
}
