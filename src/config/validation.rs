use crate::config::types::{Config, DispatchSettings, FormConfig, UserAgentConfig};
use crate::schema::canonical_form_url;
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent workers
const MAX_WORKERS: u32 = 500;

/// Upper bound on retries per submission
const MAX_RETRIES: u32 = 100;

/// Validates the entire configuration
///
/// Also called after CLI flags are applied, so the final values are checked too.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_form_config(&config.form)?;
    validate_dispatch_settings(&config.dispatch)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

fn validate_form_config(config: &FormConfig) -> Result<(), ConfigError> {
    canonical_form_url(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid form url '{}': {}", config.url, e)))?;
    Ok(())
}

/// Validates dispatch settings
fn validate_dispatch_settings(config: &DispatchSettings) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client_name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
