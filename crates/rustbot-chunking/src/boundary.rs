//! Word stream and boundary predicates shared by the splitters
//!
//! The greedy splitter works on "words": the text with every `"\n"` widened to
//! `"\n "`, cut after each space or other non-newline whitespace character,
//! each piece keeping the character it was cut at. Every piece holds at most
//! one whitespace-delimited word. Concatenating the words gives back the
//! widened text exactly, and [`strip_line_artifacts`] narrows it back to the
//! input.

/// Suffixes that mark a word as closing a sentence
pub const SENTENCE_ENDERS: [&str; 12] = [
    ". ", "? ", "! ", ".\n", "?\n", "!\n", ".\n ", "?\n ", "!\n ", ". \n", "? \n", "! \n",
];

/// Cut `text` into the word stream described in the module docs
pub fn split_words(text: &str) -> Vec<String> {
    let widened = text.replace('\n', "\n ");
    let mut words = Vec::new();
    let mut current = String::new();

    for c in widened.chars() {
        current.push(c);
        if c != '\n' && c.is_whitespace() {
            words.push(std::mem::take(&mut current));
        }
    }
    words.push(current);

    words
}

/// Undo the newline widening done by [`split_words`]
pub fn strip_line_artifacts(chunk: &str) -> String {
    chunk.replace("\n ", "\n")
}

/// Whether `word` closes a sentence
///
/// This is a suffix heuristic; numbered items such as `"3. "` count as
/// sentence ends too.
pub fn is_end_of_sentence(word: &str) -> bool {
    SENTENCE_ENDERS.iter().any(|ender| word.ends_with(ender))
}

/// Whitespace-delimited word count, the budget unit of the chunker
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether the narrowed `buffer` ends inside a markdown table
///
/// A table is open when its last row end (`"|\n"`) is not followed by a
/// blank line.
pub fn has_open_table(buffer: &str) -> bool {
    let narrowed = strip_line_artifacts(buffer);
    narrowed
        .rfind("|\n")
        .and_then(|index| narrowed.get(index..))
        .is_some_and(|tail| !tail.starts_with("|\n\n"))
}

/// Number of words from `remaining` needed to close a table left open in
/// `buffer`
///
/// The table ends at a row end followed by a blank line. The count includes
/// the blank-line word. Returns `None` when no table is open or when the
/// table never ends.
pub fn table_end(buffer: &str, remaining: &[String]) -> Option<usize> {
    if !has_open_table(buffer) {
        return None;
    }

    remaining
        .windows(2)
        .position(|pair| match pair {
            [row, blank] => {
                strip_line_artifacts(row).ends_with("|\n") && strip_line_artifacts(blank) == "\n"
            }
            _ => false,
        })
        .map(|index| index.saturating_add(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_concatenate_to_widened_text() {
        let text = "First line.\nSecond  line with  gaps\n\nEnd";
        let words = split_words(text);

        assert_eq!(words.concat(), text.replace('\n', "\n "));
        assert_eq!(strip_line_artifacts(&words.concat()), text);
    }

    #[test]
    fn test_words_keep_their_trailing_space() {
        let words = split_words("one two.\nthree");
        assert_eq!(words, vec!["one ", "two.\n ", "three"]);
    }

    #[test]
    fn test_other_whitespace_separates_words() {
        let text = "a\tb\u{a0}c d";
        let words = split_words(text);

        assert_eq!(words, vec!["a\t", "b\u{a0}", "c ", "d"]);
        assert!(words.iter().all(|word| word_count(word) <= 1));
        assert_eq!(words.concat(), text);
    }

    #[test]
    fn test_strip_line_artifacts_keeps_real_indentation() {
        let text = "list:\n  - item";
        assert_eq!(strip_line_artifacts(&split_words(text).concat()), text);
    }

    #[test]
    fn test_sentence_enders() {
        for word in ["end. ", "why? ", "wow! ", "end.\n ", "why?\n", "wow! \n"] {
            assert!(is_end_of_sentence(word), "{word:?} should end a sentence");
        }
        for word in ["word ", "e.g.", "|\n ", "\n ", ""] {
            assert!(!is_end_of_sentence(word), "{word:?} should not end a sentence");
        }
        // numbered headings are accepted false positives
        assert!(is_end_of_sentence("3. "));
    }

    #[test]
    fn test_word_count_ignores_whitespace_runs() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  \n "), 0);
        assert_eq!(word_count("a  b\n\nc"), 3);
    }

    #[test]
    fn test_open_table_detection() {
        assert!(!has_open_table("plain text. "));
        assert!(has_open_table("| a | b |\n | 1 | 2 |\n "));
        assert!(!has_open_table("| a | b |\n \n after"));
    }

    #[test]
    fn test_table_end_finds_blank_line() {
        let buffer = split_words("Intro.\n| a | b |\n|---|---|\n").concat();
        let remaining = split_words("| 1 | 2 |\n| 3 | 4 |\n\nAfter the table.");

        let pulled = table_end(&buffer, &remaining).expect("Should find table end");
        let closed = remaining[..pulled].concat();
        assert_eq!(strip_line_artifacts(&closed), "| 1 | 2 |\n| 3 | 4 |\n\n");
    }

    #[test]
    fn test_table_end_without_open_table() {
        let remaining = split_words("| 1 |\n\nrest");
        assert_eq!(table_end("no table here. ", &remaining), None);
    }

    #[test]
    fn test_table_end_without_terminator() {
        let buffer = split_words("| a |\n").concat();
        let remaining = split_words("| 1 |\n| 2 |");
        assert_eq!(table_end(&buffer, &remaining), None);
    }
}
