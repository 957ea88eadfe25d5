//! Error types for glance
//!
//! Only a handful of conditions ever reach the caller. Individual source
//! failures never show up here: a fact that cannot be read is simply left
//! empty and dropped from the report.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, GlanceError>;

/// Errors that abort building or printing a report
#[derive(Debug, Error)]
pub enum GlanceError {
    /// A requested field key is not in the registry
    #[error("Invalid field: {key}{}", suggestion_hint(.suggestion))]
    InvalidField {
        key: String,
        suggestion: Option<&'static str>,
    },

    /// A style token is not part of the palette
    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    /// The interface exclusion pattern does not compile
    #[error("Invalid interface pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The rc file exists but could not be parsed
    #[error("Failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error outside of fact collection (config handling)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlanceError {
    /// Invalid field error with an optional "did you mean" hint
    pub fn invalid_field(key: impl Into<String>, suggestion: Option<&'static str>) -> Self {
        Self::InvalidField {
            key: key.into(),
            suggestion,
        }
    }

    /// Whether the error was caused by bad user input rather than the environment
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            GlanceError::InvalidField { .. }
                | GlanceError::InvalidStyle(_)
                | GlanceError::InvalidPattern(_)
        )
    }
}

fn suggestion_hint(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_names_key() {
        let err = GlanceError::invalid_field("bogus", None);
        assert_eq!(err.to_string(), "Invalid field: bogus");
    }

    #[test]
    fn test_invalid_field_with_suggestion() {
        let err = GlanceError::invalid_field("hots", Some("host"));
        assert_eq!(err.to_string(), "Invalid field: hots (did you mean 'host'?)");
    }

    #[test]
    fn test_usage_error_classification() {
        assert!(GlanceError::invalid_field("x", None).is_usage_error());
        assert!(GlanceError::InvalidStyle("neon".into()).is_usage_error());
        let io = GlanceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!io.is_usage_error());
    }
}
