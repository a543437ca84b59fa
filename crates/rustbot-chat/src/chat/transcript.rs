//! Conversation transcripts
//!
//! A transcript is named after a short model-written summary of the
//! conversation plus the local time, e.g.
//! `TraitObjectsAndGenerics_2025-03-14T09:26:53.md`, and holds one
//! `Role: content` line per message.

use super::prompts::SUMMARY_PROMPT;
use super::traits::ChatClient;
use super::ChatMessage;
use crate::{ChatError, ChatResult};
use chrono::{Local, NaiveDateTime};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Capitalise the first letter of every word and lowercase the rest
fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;
    text.chars()
        .flat_map(|c| {
            let converted: Vec<char> = if previous_is_letter {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            previous_is_letter = c.is_alphabetic();
            converted
        })
        .collect()
}

/// File name for a transcript summarised as `summary` at `timestamp`
///
/// The summary is title-cased and reduced to its letters and digits.
///
/// # Errors
/// Returns `ChatError::EmptyReply` when nothing usable is left of the summary
pub fn transcript_file_name(summary: &str, timestamp: NaiveDateTime) -> ChatResult<String> {
    let stem: String = title_case(summary.trim())
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    if stem.is_empty() {
        return Err(ChatError::EmptyReply);
    }

    Ok(format!("{stem}_{}.md", timestamp.format("%Y-%m-%dT%H:%M:%S")))
}

/// Render messages as transcript lines
fn render(messages: &[ChatMessage]) -> String {
    messages.iter().fold(String::new(), |mut out, message| {
        let _ = writeln!(out, "{message}");
        out
    })
}

/// Ask the model to summarise `history`, then write it to a transcript in
/// `chats_dir`
///
/// The summary exchange itself is not part of the transcript. Returns the
/// path written.
///
/// # Errors
/// - `ChatError::EmptyReply` if the summary is empty
/// - `ChatError::Io` if the directory or file cannot be written
/// - client errors from the chat model
#[tracing::instrument(skip(client, history), fields(messages = history.len()))]
pub async fn dump_chat(
    client: &dyn ChatClient,
    history: &[ChatMessage],
    chats_dir: &Path,
) -> ChatResult<PathBuf> {
    let mut request = history.to_vec();
    request.push(ChatMessage::user(SUMMARY_PROMPT));
    let summary = client.chat(&request).await?;

    let file_name = transcript_file_name(&summary, Local::now().naive_local())?;

    std::fs::create_dir_all(chats_dir).map_err(|e| {
        ChatError::io(format!("Failed to create {}", chats_dir.display()), e)
    })?;

    let path = chats_dir.join(file_name);
    std::fs::write(&path, render(history))
        .map_err(|e| ChatError::io(format!("Failed to write {}", path.display()), e))?;

    tracing::info!(path = %path.display(), "Saved chat transcript");
    Ok(path)
}
