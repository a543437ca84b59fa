//! `rustbot chunk`: show how a document would be split

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use rustbot_chunking::{MarkdownChunker, word_count};
use rustbot_config::{ChunkingConfig, Validate};

/// Write each chunk under a header carrying its 1-based position and word count
fn render_chunks<W: Write>(chunks: &[String], out: &mut W) -> std::io::Result<()> {
    let mut total_words = 0usize;
    for (index, chunk) in chunks.iter().enumerate() {
        let words = word_count(chunk);
        total_words = total_words.saturating_add(words);
        writeln!(
            out,
            "--- chunk {} ({words} words) ---",
            index.saturating_add(1)
        )?;
        writeln!(out, "{}", chunk.trim_matches('\n'))?;
    }
    writeln!(out, "=== {} chunks, {total_words} words ===", chunks.len())
}

/// Chunk `file` with `config` and print the result
///
/// Needs no running services.
///
/// # Errors
///
/// Returns error if the budget is invalid, the file cannot be read, or the
/// document has an empty heading section
pub fn run<W: Write>(file: &Path, config: ChunkingConfig, out: &mut W) -> anyhow::Result<()> {
    config.validate().context("Invalid chunking budget")?;

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let chunks = MarkdownChunker::new(config)
        .chunk_document(&text)
        .with_context(|| format!("Failed to chunk '{}'", file.display()))?;

    render_chunks(&chunks, out)?;
    Ok(())
}
