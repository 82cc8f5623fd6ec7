use crate::config::types::{Config, DiscoveryConfig};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_discovery_config(&config.discovery)?;
    Ok(())
}

/// Validates plugin lookup settings
fn validate_discovery_config(config: &DiscoveryConfig) -> ConfigResult<()> {
    validate_namespace(&config.namespace)?;

    if config.plugin_roots().is_empty() {
        return Err(ConfigError::Validation(
            "at least one plugin root must be configured".to_string(),
        ));
    }

    if config.roots.iter().any(|root| root.as_os_str().is_empty()) {
        return Err(ConfigError::Validation(
            "plugin roots cannot be empty paths".to_string(),
        ));
    }

    Ok(())
}

/// Namespace must be a plain name: it is joined onto every plugin root
fn validate_namespace(namespace: &str) -> ConfigResult<()> {
    if namespace.is_empty() {
        return Err(ConfigError::Validation(
            "namespace cannot be empty".to_string(),
        ));
    }

    if !namespace
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "namespace must contain only alphanumeric characters, '_' and '-', got '{}'",
            namespace
        )));
    }

    Ok(())
}
