//! `rustbot chat`: the interactive question loop

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use rustbot_chat::{Assistant, ChatError, ERROR_RESPONSE, Turn, dump_chat, is_exit_command};
use rustbot_common::sanitize_with_message;
use rustbot_search::SearchError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// How a question ended, as far as the terminal is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Answered,
    Declined,
    NoKnowledge,
    Failed,
}

/// Ask one question, streaming the answer to `out` as it arrives
///
/// Turn failures are reported on `out` rather than returned; only write
/// errors are.
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub async fn ask_question<W: Write + Send>(
    assistant: &mut Assistant,
    question: &str,
    out: &mut W,
) -> std::io::Result<Outcome> {
    let mut write_error = None;
    let result = assistant
        .respond(question, |fragment| {
            if write_error.is_some() {
                return;
            }
            if let Err(e) = write!(out, "{fragment}").and_then(|()| out.flush()) {
                write_error = Some(e);
            }
        })
        .await;
    if let Some(e) = write_error {
        return Err(e);
    }

    let outcome = match result {
        Ok(Turn::Answered(_)) => {
            writeln!(out, "\n")?;
            Outcome::Answered
        }
        Ok(Turn::Declined(reply)) => {
            writeln!(out, "{reply}\n")?;
            Outcome::Declined
        }
        Err(ChatError::Search(error @ SearchError::NoMatchingKnowledge { .. })) => {
            writeln!(out, "{error}\n")?;
            Outcome::NoKnowledge
        }
        Err(error) => {
            writeln!(
                out,
                "{}\n",
                sanitize_with_message(&error, "chat_turn", ERROR_RESPONSE)
            )?;
            Outcome::Failed
        }
    };
    Ok(outcome)
}

/// Summarise the conversation into a transcript under `chats_dir`
///
/// Nothing is written for a conversation without messages.
async fn save_transcript<W: Write>(
    assistant: &Assistant,
    chats_dir: &Path,
    out: &mut W,
) -> anyhow::Result<()> {
    if assistant.history().is_empty() {
        return Ok(());
    }

    let client = assistant.client();
    let path = dump_chat(client.as_ref(), assistant.history(), chats_dir)
        .await
        .context("Failed to save chat")?;
    writeln!(out, "Chat saved to {}", path.display())?;
    Ok(())
}

/// Run the question loop until an exit word, end of input or Ctrl-C, then
/// save the transcript
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns error if reading input, writing output or saving the transcript
/// fails
pub async fn run<R, W>(
    assistant: &mut Assistant,
    input: R,
    out: &mut W,
    chats_dir: &Path,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    let greeting = format!("Ask {} anything!", assistant.client().model_name());
    writeln!(out, "{greeting}\n{}\n", "=".repeat(greeting.len()))?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => {
                writeln!(out, "\nChat exited. Goodbye!\n")?;
                break;
            }
        };

        let Some(line) = line else {
            writeln!(out)?;
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            writeln!(out)?;
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        writeln!(out)?;
        let outcome = ask_question(assistant, question, out).await?;
        tracing::debug!(?outcome, "Finished turn");
    }

    save_transcript(assistant, chats_dir, out).await
}
