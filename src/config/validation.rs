use crate::config::types::CrawlConfig;
use crate::ConfigError;
use chrono::Datelike;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_date_range(config)?;
    validate_limits(config)?;
    validate_endpoint(&config.endpoint)?;
    validate_database_path(config)?;
    Ok(())
}

fn validate_date_range(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.start_date > config.end_date {
        return Err(ConfigError::Validation(format!(
            "start_date {} must not be after end_date {}",
            config.start_date, config.end_date
        )));
    }

    // The endpoint's query format counts years from the ROC epoch.
    if config.start_date.year() < 1912 {
        return Err(ConfigError::Validation(format!(
            "dates before 1912 cannot be expressed in the ROC calendar, got {}",
            config.start_date
        )));
    }

    Ok(())
}

fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_tasks < 1 || config.max_tasks > 100 {
        return Err(ConfigError::Validation(format!(
            "max_tasks must be between 1 and 100, got {}",
            config.max_tasks
        )));
    }

    if config.max_tries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_tries must be >= 1, got {}",
            config.max_tries
        )));
    }

    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("invalid endpoint '{}': {}", endpoint, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "endpoint must be http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_database_path(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.database_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
