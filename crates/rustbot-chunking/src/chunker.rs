//! Markdown chunker
//!
//! Documents are cut along their heading structure first. Sections that are
//! still over budget after descending through all six heading levels are cut
//! greedily at sentence ends, keeping markdown tables whole.

use crate::boundary::{
    is_end_of_sentence, split_words, strip_line_artifacts, table_end, word_count,
};
use crate::error::{ChunkingError, ChunkingResult};
use rustbot_config::{ChunkingConfig, SiblingPolicy};

/// Deepest markdown heading level; blocks still too large below it are split
/// by sentences
pub const MAX_HEADING_LEVEL: usize = 6;

/// Splits markdown documents into chunks sized for embedding
#[derive(Debug, Clone, Default)]
pub struct MarkdownChunker {
    config: ChunkingConfig,
}

impl MarkdownChunker {
    pub const fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk a whole document, starting at top-level headings
    ///
    /// Chunks hold document text as written, without word-stream artifacts.
    ///
    /// # Errors
    /// Returns `ChunkingError::EmptyBlock` when a heading split yields an
    /// empty section
    pub fn chunk_document(&self, text: &str) -> ChunkingResult<Vec<String>> {
        let chunks = self.split_by_headings(text, 1)?;
        tracing::debug!(
            chunks = chunks.len(),
            words = word_count(text),
            "Chunked markdown document"
        );
        Ok(chunks)
    }

    /// Split `text` at headings of `level`, descending into deeper levels for
    /// oversized sections
    ///
    /// Every chunk that followed a heading of `level` starts with
    /// `"\n" + "#" * level + " "`. An opening heading at the very start of
    /// `text` counts as such a delimiter. Sections cut by sentences are
    /// narrowed back to the document text.
    ///
    /// # Errors
    /// Returns `ChunkingError::EmptyBlock` when a heading split yields an
    /// empty section. No partial result is returned.
    pub fn split_by_headings(&self, text: &str, level: usize) -> ChunkingResult<Vec<String>> {
        let marker = format!("{} ", "#".repeat(level));
        let delimiter = format!("\n{marker}");

        let (body, opens_with_heading) = match text
            .strip_prefix(delimiter.as_str())
            .or_else(|| text.strip_prefix(marker.as_str()))
        {
            Some(rest) => (rest, true),
            None => (text, false),
        };

        let mut chunks = Vec::new();

        for (index, block) in body.split(delimiter.as_str()).enumerate() {
            if block.is_empty() {
                return Err(ChunkingError::EmptyBlock { level });
            }

            let section = if index > 0 || opens_with_heading {
                format!("{delimiter}{block}")
            } else {
                block.to_string()
            };

            if word_count(block) <= self.config.token_target {
                chunks.push(section);
                continue;
            }

            if level <= MAX_HEADING_LEVEL {
                chunks.extend(self.split_by_headings(&section, level.saturating_add(1))?);
            } else {
                chunks.extend(
                    self.split_preserving_sentences(&section)
                        .iter()
                        .map(|chunk| strip_line_artifacts(chunk)),
                );
            }

            if self.config.sibling_policy == SiblingPolicy::ShortCircuit {
                let skipped = body
                    .split(delimiter.as_str())
                    .count()
                    .saturating_sub(index.saturating_add(1));
                if skipped > 0 {
                    tracing::warn!(
                        level,
                        skipped,
                        "Oversized section split, dropping the sections that follow it"
                    );
                }
                return Ok(chunks);
            }
        }

        Ok(chunks)
    }

    /// Greedily pack words into chunks, closing a chunk at the first sentence
    /// end past `token_target` and forcing a cut at `max_tokens`
    ///
    /// Chunks carry the `"\n "` artifacts of the word stream; see
    /// [`crate::strip_line_artifacts`]. The last chunk is always emitted, even
    /// when empty. A table open at a sentence cut is carried to its end, so
    /// such a chunk may exceed `max_tokens`.
    pub fn split_preserving_sentences(&self, text: &str) -> Vec<String> {
        let words = split_words(text);
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut count = 0_usize;
        let mut next = 0_usize;

        while let Some(word) = words.get(next) {
            buffer.push_str(word);
            count = count.saturating_add(1);
            next = next.saturating_add(1);

            if count > self.config.token_target && is_end_of_sentence(word) {
                let remaining = words.get(next..).unwrap_or_default();
                if let Some(pulled) = table_end(&buffer, remaining) {
                    for extra in remaining.iter().take(pulled) {
                        buffer.push_str(extra);
                    }
                    next = next.saturating_add(pulled);
                    tracing::debug!(pulled, "Extended chunk to close a table");
                }
                chunks.push(std::mem::take(&mut buffer));
                count = 0;
            } else if count >= self.config.max_tokens {
                tracing::debug!(max_tokens = self.config.max_tokens, "Forced chunk cut");
                chunks.push(std::mem::take(&mut buffer));
                count = 0;
            }
        }

        chunks.push(buffer);
        chunks
    }
}
