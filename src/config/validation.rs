use crate::config::types::{Config, OutputConfig, ScraperConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for in-flight fetches within a single group
const MAX_CONCURRENT_FETCHES_LIMIT: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates a group size and converts it to a usable count
pub fn validate_group_size(group_size: i64) -> Result<usize, ConfigError> {
    if group_size <= 0 {
        return Err(ConfigError::InvalidGroupSize(group_size));
    }
    usize::try_from(group_size).map_err(|_| ConfigError::InvalidGroupSize(group_size))
}

/// Validates batching and extraction settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_group_size(config.group_size)?;

    if config.max_concurrent_fetches < 1
        || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES_LIMIT
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES_LIMIT, config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.log_enabled && config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty when logging is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if !config.contact_url.is_empty() {
        Url::parse(&config.contact_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;
    }

    if !config.contact_email.is_empty() {
        validate_email(&config.contact_email)?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    // Must contain a single @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
