//! Global initialization utilities for the application

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the application environment
///
/// Loads a `.env` file from the current directory (or any parent) so that
/// `RUSTBOT_*` settings can live next to the knowledge base.
///
/// Safe to call multiple times - will only run once
pub fn initialize_environment() {
    INIT.call_once(|| {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded environment file");
        }
    });
}

/// Initialize environment for tests
///
/// Tries `.env.test` first, then `.env`
#[cfg(test)]
pub fn initialize_test_environment() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test")
            .or_else(|_| dotenvy::dotenv())
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        initialize_test_environment();
        initialize_environment();
        initialize_environment();
        assert!(INIT.is_completed());
    }
}
