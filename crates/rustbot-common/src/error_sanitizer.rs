//! Error sanitization for messages shown to the person at the terminal
//!
//! The detailed error is logged with a correlation id; the user only sees a
//! short message carrying that id.

use tracing::error;

/// Sanitize an error with a user-friendly message
///
/// Logs the detailed error internally and returns a safe user message
pub fn sanitize_with_message<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> String {
    let correlation_id = uuid::Uuid::new_v4();
    error!(
        correlation_id = %correlation_id,
        error = %error,
        context = %context,
        "Internal error occurred"
    );

    format!("{user_message} (ref: {correlation_id})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_with_message() {
        let error = "embedding model 'embeddinggemma' not found";
        let result = sanitize_with_message(
            error,
            "chat_turn",
            "Something went wrong while answering your question. Maybe try again?",
        );
        assert!(result.starts_with("Something went wrong while answering your question."));
        assert!(!result.contains("embeddinggemma"));
    }
}
