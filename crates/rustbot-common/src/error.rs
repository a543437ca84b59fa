//! Common error handling utilities and patterns
//!
//! Per-crate error enums implement [`CommonError`] so that io, config, parse
//! and catch-all failures are constructed the same way everywhere.

/// Common error variants that appear across multiple crates
pub trait CommonError: std::error::Error + Send + Sync + 'static {
    /// Create an I/O error variant
    fn io_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a configuration error variant
    fn config_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a parsing error variant
    fn parse_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a generic "other" error variant
    fn other_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    enum TestError {
        #[error("IO error: {0}")]
        Io(String),
        #[error("Configuration error: {0}")]
        Configuration(String),
        #[error("Parse error: {0}")]
        Parse(String),
        #[error("Other error: {0}")]
        Other(String),
    }

    impl CommonError for TestError {
        fn io_error(msg: impl Into<String>) -> Self {
            Self::Io(msg.into())
        }

        fn config_error(msg: impl Into<String>) -> Self {
            Self::Configuration(msg.into())
        }

        fn parse_error(msg: impl Into<String>) -> Self {
            Self::Parse(msg.into())
        }

        fn other_error(msg: impl Into<String>) -> Self {
            Self::Other(msg.into())
        }
    }

    #[test]
    fn test_common_error_trait() {
        let io_err = TestError::io_error("file not found");
        assert_eq!(io_err.to_string(), "IO error: file not found");

        let config_err = TestError::config_error("missing model");
        assert_eq!(config_err.to_string(), "Configuration error: missing model");

        assert!(matches!(TestError::parse_error("bad"), TestError::Parse(_)));
        assert!(matches!(TestError::other_error("odd"), TestError::Other(_)));
    }
}
