//! Snapshot tests for the Gemini client

#[cfg(test)]
mod snapshot_tests {
    use crate::{GeminiClient, GeminiConfig, LLMProvider};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = GeminiConfig::new("test_api_key_redacted".to_string());

        assert_yaml_snapshot!(config, @r###"
        api_key: test_api_key_redacted
        model: gemini-2.5-flash
        api_url: "https://generativelanguage.googleapis.com"
        temperature: 0.1
        timeout_secs: 60
        "###);
    }

    #[test]
    fn test_default_generation_config() {
        let client = GeminiClient::new(GeminiConfig::new("test_key".to_string())).unwrap();
        let config = client.default_generation_config();

        assert_eq!(client.model_id(), "gemini-2.5-flash");
        assert_eq!(config.model_id, "gemini-2.5-flash");
        assert_eq!(config.temperature, Some(0.1));
        assert_eq!(config.max_output_tokens, None);
        assert_eq!(config.timeout.as_secs(), 60);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        assert!(GeminiClient::new(GeminiConfig::new(String::new())).is_err());
    }
}
