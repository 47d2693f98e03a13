use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::CuralinkError;

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client capped to an allow-list of hosts, with a bounded per-request timeout.
///
/// Every remote call in CuraLink goes through one of these. A request to a host
/// outside the allow-list fails before anything leaves the process.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allow-list of literature, registry and LLM hosts.
    pub fn new(timeout: Duration) -> Result<Self, CuralinkError> {
        Self::with_user_agent(timeout, concat!("curalink/", env!("CARGO_PKG_VERSION")))
    }

    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self, CuralinkError> {
        let allowlist = [
            "eutils.ncbi.nlm.nih.gov", // PubMed
            "pubmed.ncbi.nlm.nih.gov", // PubMed article pages
            "clinicaltrials.gov",      // ClinicalTrials.gov v2
            "api.openai.com",          // OpenAI completions
            "localhost",
            "127.0.0.1",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CuralinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allow-list.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_ascii_lowercase());
    }

    /// Allows the host of a configured base URL (e.g. a self-hosted proxy).
    pub fn allow_base_url(&mut self, base_url: &str) -> Result<(), CuralinkError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| CuralinkError::Config(format!("Invalid base URL {base_url}: {e}")))?;
        match parsed.host_str() {
            Some(host) => {
                self.allow_domain(host);
                Ok(())
            }
            None => Err(CuralinkError::Config(format!("Base URL has no host: {base_url}"))),
        }
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, CuralinkError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, CuralinkError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }

    fn check(&self, url: &str) -> Result<(), CuralinkError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            tracing::warn!(url, "Outbound request blocked by allow-list");
            Err(CuralinkError::Blocked(format!("domain not in allowlist for URL {}", url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SandboxClient {
        SandboxClient::new(DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn test_default_hosts_allowed() {
        let c = client();
        assert!(c.is_allowed("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"));
        assert!(c.is_allowed("https://clinicaltrials.gov/api/v2/studies"));
        assert!(c.is_allowed("http://127.0.0.1:9/studies"));
    }

    #[test]
    fn test_subdomain_allowed_but_lookalike_blocked() {
        let c = client();
        assert!(c.is_allowed("https://www.clinicaltrials.gov/api/v2/studies"));
        assert!(!c.is_allowed("https://evilclinicaltrials.gov/api"));
        assert!(!c.is_allowed("not a url"));
    }

    #[test]
    fn test_blocked_request_errors() {
        let c = client();
        let err = c.get("https://example.com/").unwrap_err();
        assert!(matches!(err, CuralinkError::Blocked(_)));
    }

    #[test]
    fn test_allow_base_url() {
        let mut c = client();
        c.allow_base_url("https://llm-proxy.internal.example/v1").unwrap();
        assert!(c.is_allowed("https://llm-proxy.internal.example/v1/chat/completions"));
        assert!(c.allow_base_url("no-scheme").is_err());
    }
}
