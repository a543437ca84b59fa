//! Configuration validation framework

use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Get URL validation regex - returns None if regex compilation fails
fn get_url_regex() -> Option<&'static Regex> {
    static URL_REGEX: std::sync::OnceLock<Option<Regex>> = std::sync::OnceLock::new();
    URL_REGEX
        .get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").ok())
        .as_ref()
}

/// Trait for validating configuration values
pub trait Validate {
    /// Validate this configuration object
    ///
    /// # Errors
    /// Returns validation errors if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Validate a URL string
///
/// # Errors
/// Returns `ConfigError::InvalidUrl` if the URL format is invalid
pub fn validate_url(url: &str, field_name: &str) -> ConfigResult<()> {
    let valid = get_url_regex().map_or_else(
        || url.starts_with("http://") || url.starts_with("https://"),
        |regex| regex.is_match(url),
    );

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field: field_name.to_string(),
            url: url.to_string(),
        })
    }
}

/// Validate a value is within a range
///
/// # Errors
/// Returns `ConfigError::OutOfRange` if value is outside the specified range
pub fn validate_range(value: u64, min: u64, max: u64, field_name: &str) -> ConfigResult<()> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange {
            field: field_name.to_string(),
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

/// Validate a score lies in `[0.0, 1.0]`
///
/// Checked at a resolution of 1/1000, reported in thousandths.
///
/// # Errors
/// Returns `ConfigError::OutOfRange` if the value is negative, above one or NaN
pub fn validate_unit_interval(value: f32, field_name: &str) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (value.max(0.0) * 1000.0) as u64;
    Err(ConfigError::OutOfRange {
        field: field_name.to_string(),
        value: scaled,
        min: 0,
        max: 1000,
    })
}

/// Validate a string is not empty
///
/// # Errors
/// Returns `ConfigError::MissingField` if the string is empty or whitespace-only
pub fn validate_non_empty(value: &str, field_name: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField {
            field: field_name.to_string(),
        })
    } else {
        Ok(())
    }
}
