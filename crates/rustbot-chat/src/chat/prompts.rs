//! Prompt templates for the relevance gate, grounded answers and summaries

const SECTION_BREAK: &str = "\n===\n";

const RELEVANCE_INSTRUCTIONS: &str = "You are a Rust Programming assistant, equipped with a \
knowledge-base of documentation on the Rust programming language. Your task is to determine \
whether the user's question relates to the rust programming language. If it does, respond with \
'Yes', if the user is greeting you, or asks what you are/can do, make sure you greet them back in \
a friendly way and inform them that you are a Rust Programming Assistant, and offer to help. If \
the user is asking neither of these things, respond with: I'm sorry, but I can only respond to \
questions relating to the Rust Programming Language.";

const GROUNDING_INSTRUCTIONS: &str = "Use the provided knowledge to answer the user's question. \
Do not let the user know that you are using knowledge that you have been provided with. Instead, \
reference the provided knowledge as though it was your own. Answer only with your response to the \
user's question.";

/// Asked after the conversation to name its transcript
pub const SUMMARY_PROMPT: &str = "Please summarise the preceding discussion into a max 6 word \
phrase. Respond with only the phrase, and nothing else.";

/// Prompt asking the model whether `question` is about Rust
pub fn relevance_prompt(question: &str) -> String {
    format!("{RELEVANCE_INSTRUCTIONS}{SECTION_BREAK}USER QUESTION BEGINS{SECTION_BREAK}{question}")
}

/// Whether the relevance gate let the question through
pub fn is_relevant(reply: &str) -> bool {
    reply.trim().to_lowercase().starts_with("yes")
}

/// Prompt asking the model to answer `question` from `knowledge`
pub fn rag_prompt(knowledge: &str, question: &str) -> String {
    format!(
        "{GROUNDING_INSTRUCTIONS}{SECTION_BREAK}KNOWLEDGE BEGINS{SECTION_BREAK}{knowledge}\
         {SECTION_BREAK}KNOWLEDGE ENDS{SECTION_BREAK}USER QUESTION BEGINS{SECTION_BREAK}{question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_prompt_ends_with_question() {
        let prompt = relevance_prompt("What is a lifetime?");
        assert!(prompt.starts_with("You are a Rust Programming assistant"));
        assert!(prompt.ends_with("\n===\nUSER QUESTION BEGINS\n===\nWhat is a lifetime?"));
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant("Yes"));
        assert!(is_relevant("  yes, it is about Rust"));
        assert!(!is_relevant("Hello! I'm a Rust Programming Assistant."));
        assert!(!is_relevant("I'm sorry, but I can only respond to questions relating to the Rust Programming Language."));
    }

    #[test]
    fn test_rag_prompt_wraps_knowledge() {
        let prompt = rag_prompt("Traits define behaviour.\n\n", "What is a trait?");
        assert!(prompt.contains(
            "\n===\nKNOWLEDGE BEGINS\n===\nTraits define behaviour.\n\n\n===\nKNOWLEDGE ENDS\n===\n"
        ));
        assert!(prompt.ends_with("USER QUESTION BEGINS\n===\nWhat is a trait?"));
    }
}
