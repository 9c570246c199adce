//! Adapter Factory
//!
//! Creates LLM adapter instances from configuration.

use crate::config::{resolve_env_var, ConfigError, LlmConfig, LlmProvider};
use crate::llm::adapters::openai::OpenAiAdapter;
use crate::llm::adapters::stub::StubAdapter;
use crate::llm::adapters::{Adapter, ModelError};
use crate::transport::Transport;

/// Create adapter from the `[llm]` config section
pub fn create_adapter(config: &LlmConfig) -> Result<Adapter, ModelError> {
    match config.provider {
        LlmProvider::Stub => Ok(Adapter::Stub(match &config.stub_response {
            Some(response) => StubAdapter::with_response(response.clone()),
            None => StubAdapter::new(),
        })),
        LlmProvider::OpenAi => {
            if config.base_url.trim().is_empty() {
                return Err(ConfigError::Missing("llm.base_url".to_string()).into());
            }
            if config.model.trim().is_empty() {
                return Err(ConfigError::Missing("llm.model".to_string()).into());
            }

            let api_key = resolve_env_var(&config.api_key)?;
            if api_key.trim().is_empty() {
                return Err(ConfigError::Missing("llm.api_key".to_string()).into());
            }

            Ok(Adapter::OpenAi(OpenAiAdapter::with_transport(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                Transport::real(config.timeout_secs),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::LlmAdapter;

    #[test]
    fn test_factory_openai_config() {
        let config = LlmConfig {
            api_key: "sk-test".to_string(),
            ..LlmConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "openai");
    }

    #[test]
    fn test_factory_stub_config() {
        let config = LlmConfig {
            provider: LlmProvider::Stub,
            stub_response: Some("SELECT 42".to_string()),
            ..LlmConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "stub");
        assert_eq!(adapter.complete("s", Some("q")).unwrap(), "SELECT 42");
    }

    #[test]
    fn test_factory_missing_env_key_is_configuration_error() {
        let config = LlmConfig {
            api_key: "env:NOODLE_FACTORY_TEST_UNSET_KEY".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            create_adapter(&config),
            Err(ModelError::Configuration(_))
        ));
    }

    #[test]
    fn test_factory_empty_model_rejected() {
        let config = LlmConfig {
            api_key: "sk-test".to_string(),
            model: String::new(),
            ..LlmConfig::default()
        };
        assert_eq!(
            create_adapter(&config).unwrap_err(),
            ModelError::Configuration("Missing config value: llm.model".to_string())
        );
    }

    #[test]
    fn test_factory_empty_api_key_rejected() {
        let config = LlmConfig {
            api_key: "  ".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(
            create_adapter(&config).unwrap_err(),
            ModelError::Configuration("Missing config value: llm.api_key".to_string())
        );
    }
}
