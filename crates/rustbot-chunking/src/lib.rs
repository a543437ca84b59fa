//! Rustbot markdown chunking crate
//!
//! Splits knowledge-base documents into word-budgeted chunks for embedding:
//! first along markdown headings, then greedily at sentence ends with tables
//! kept whole.

pub mod boundary;
pub mod chunker;
pub mod error;

// Re-export main types
pub use boundary::{
    SENTENCE_ENDERS, has_open_table, is_end_of_sentence, split_words, strip_line_artifacts,
    table_end, word_count,
};
pub use chunker::{MAX_HEADING_LEVEL, MarkdownChunker};
pub use error::{ChunkingError, ChunkingResult};
