//! `rustbot ask`: answer one question without entering the loop

use std::io::Write;

use rustbot_chat::Assistant;

use super::chat::{Outcome, ask_question};

/// Answer `question` once
///
/// No transcript is saved.
///
/// # Errors
///
/// Returns error if the answer failed or writing to `out` fails
pub async fn run<W: Write + Send>(
    assistant: &mut Assistant,
    question: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    match ask_question(assistant, question, out).await? {
        Outcome::Failed => anyhow::bail!("Failed to answer the question"),
        Outcome::Answered | Outcome::Declined | Outcome::NoKnowledge => Ok(()),
    }
}
