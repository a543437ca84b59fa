//! Behavioural tests for the markdown chunker on larger documents

use rustbot_chunking::{
    ChunkingError, MarkdownChunker, is_end_of_sentence, strip_line_artifacts, word_count,
};
use rustbot_config::{ChunkingConfig, SiblingPolicy};

fn chunker(token_target: usize, max_tokens: usize) -> MarkdownChunker {
    MarkdownChunker::new(
        ChunkingConfig::new(token_target, max_tokens).expect("Should build budget"),
    )
}

/// Prose without headings or tables; sentences run 3 to 9 words
fn prose(sentences: usize) -> String {
    let mut text = String::new();
    for index in 0..sentences {
        let length = 3 + index % 7;
        let words: Vec<String> = (0..length).map(|w| format!("w{index}x{w}")).collect();
        text.push_str(&words.join(" "));
        text.push_str(if index % 5 == 4 { ".\n" } else { ". " });
    }
    text
}

#[test]
fn heading_free_text_is_fully_covered() {
    let text = prose(200);
    let chunks = chunker(20, 40).chunk_document(&text).expect("Should chunk");

    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn chunks_never_exceed_max_tokens() {
    let mut text = prose(100);
    // a long run without sentence ends forces failsafe cuts
    text.push_str(&"filler ".repeat(130));
    text.push_str(&prose(50));

    let chunks = chunker(20, 40).chunk_document(&text).expect("Should chunk");
    for chunk in &chunks {
        assert!(word_count(chunk) <= 40, "chunk too large: {}", word_count(chunk));
    }
}

#[test]
fn tab_and_nbsp_separated_words_respect_the_ceiling() {
    let mut text = String::new();
    for index in 0..120 {
        text.push_str(&format!("t{index}\tu{index}\u{a0}v{index} "));
    }

    let chunks = chunker(20, 40).chunk_document(&text).expect("Should chunk");

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(word_count(chunk) <= 40, "chunk too large: {}", word_count(chunk));
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn code_blocks_under_headings_are_kept_verbatim() {
    let code = "```rust\nfn main() {\n    let v = vec![1, 2, 3];\n    for x in &v {\n        println!(\"{x}\");\n    }\n}\n```";
    let text = format!("# Loops\nIterate with `for`.\n{code}\n# Notes\n  Two-space indented note.");

    let chunks = MarkdownChunker::default()
        .chunk_document(&text)
        .expect("Should chunk");

    assert_eq!(
        chunks,
        vec![
            format!("\n# Loops\nIterate with `for`.\n{code}"),
            "\n# Notes\n  Two-space indented note.".to_string(),
        ]
    );
}

#[test]
fn indentation_survives_sentence_splitting() {
    let mut text = prose(30);
    text.push_str("\n    indented code line;\n        deeper line;\n");
    text.push_str(&prose(30));

    let chunks = chunker(20, 40).chunk_document(&text).expect("Should chunk");

    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn primary_cuts_land_on_sentence_ends() {
    let text = prose(120);
    let chunks = chunker(20, 40).split_preserving_sentences(&text);

    let (last, cut) = chunks.split_last().expect("Should produce chunks");
    for chunk in cut {
        assert!(
            is_end_of_sentence(chunk),
            "chunk does not end a sentence: {chunk:?}"
        );
        assert!(word_count(chunk) > 20);
    }
    assert!(word_count(last) <= 40);
}

#[test]
fn tables_are_never_split() {
    let mut table = String::from("| key | value |\n|-----|-------|\n");
    for row in 0..30 {
        table.push_str(&format!("| k{row}. | v{row}. |\n"));
    }
    let text = format!("{}\n{table}\n{}", prose(10), prose(10));

    let chunks = chunker(15, 500).split_preserving_sentences(&text);
    let narrowed: Vec<String> = chunks.iter().map(|c| strip_line_artifacts(c)).collect();

    let holder = narrowed
        .iter()
        .find(|chunk| chunk.contains("| key | value |"))
        .expect("Should contain the table header");
    assert!(holder.contains(&table), "table was split: {holder:?}");
}

#[test]
fn recursion_stops_below_level_six() {
    let mut text = String::from("# One\n## Two\n### Three\n#### Four\n##### Five\n###### Six\n");
    text.push_str("####### Not a heading\n");
    text.push_str(&prose(40));

    let chunks = chunker(10, 30).chunk_document(&text).expect("Should chunk");

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|chunk| word_count(chunk) <= 30));
    assert!(chunks.concat().contains("####### Not a heading"));
}

#[test]
fn sections_keep_their_headings() {
    let text = format!(
        "# Ownership\n{}\n# Borrowing\nShort section.\n# Lifetimes\nAlso short.",
        prose(6)
    );

    let chunks = MarkdownChunker::default()
        .chunk_document(&text)
        .expect("Should chunk");

    assert_eq!(chunks.len(), 3);
    assert!(chunks[0].starts_with("\n# Ownership\n"));
    assert_eq!(chunks[1], "\n# Borrowing\nShort section.");
    assert_eq!(chunks[2], "\n# Lifetimes\nAlso short.");
}

#[test]
fn nested_sections_split_under_exhaustive_policy() {
    let text = format!(
        "# Guide\n## Intro\n{}\n## Usage\n{}\n# Appendix\nThe end.",
        prose(8),
        prose(8)
    );
    let chunker = MarkdownChunker::new(
        ChunkingConfig::new(30, 100)
            .expect("Should build budget")
            .with_sibling_policy(SiblingPolicy::Exhaustive),
    );

    let chunks = chunker.chunk_document(&text).expect("Should chunk");

    assert!(chunks.iter().any(|chunk| chunk.starts_with("\n## Intro")));
    assert!(chunks.iter().any(|chunk| chunk.starts_with("\n## Usage")));
    assert_eq!(chunks.last().map(String::as_str), Some("\n# Appendix\nThe end."));
}

#[test]
fn back_to_back_headings_reject_document() {
    let result = MarkdownChunker::default().chunk_document("# Title\n## A\ntext\n# \n# B\nmore");
    assert!(matches!(result, Err(ChunkingError::EmptyBlock { level: 1 })));
}
