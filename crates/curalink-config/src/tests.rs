#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.pubmed.max_results, 20);
        assert_eq!(config.clinical_trials.base_url, "https://clinicaltrials.gov/api/v2/studies");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.summary_max_tokens, 150);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [pubmed]
            api_key = "ncbi-key"

            [llm]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.pubmed.api_key.as_deref(), Some("ncbi-key"));
        assert_eq!(config.pubmed.base_url, "https://eutils.ncbi.nlm.nih.gov/entrez/eutils");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml("[http]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from("/nonexistent/curalink.toml").unwrap();
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_api_key_prefers_config_value() {
        let llm = LlmConfig { api_key: "sk-config".into(), ..Default::default() };
        let key = llm.resolve_api_key_with(|_| Some("sk-env".into()));
        assert_eq!(key.as_deref(), Some("sk-config"));
    }

    #[test]
    fn test_api_key_falls_back_to_env() {
        let llm = LlmConfig::default();
        let key = llm.resolve_api_key_with(|name| {
            assert_eq!(name, OPENAI_KEY_ENV);
            Some("sk-env".into())
        });
        assert_eq!(key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_blank_api_key_disables_text_assist() {
        let llm = LlmConfig { api_key: "   ".into(), ..Default::default() };
        assert_eq!(llm.resolve_api_key_with(|_| None), None);
        assert_eq!(llm.resolve_api_key_with(|_| Some(String::new())), None);
    }
}
