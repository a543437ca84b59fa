//! Common utilities and patterns shared across rustbot crates
//!
//! Correlation ids for tracing a request through ingestion, retrieval and chat,
//! shared error traits, user-facing error sanitizing and environment bootstrap.

pub mod error;
pub mod error_sanitizer;
pub mod init;

pub use error::CommonError;
pub use error_sanitizer::sanitize_with_message;
pub use init::initialize_environment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID type for tracking operations across service boundaries
///
/// Uses UUID v4 for guaranteed uniqueness
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Uuid::try_parse(id).map_or_else(|_| Self(Uuid::new_v4()), Self)
    }
}
