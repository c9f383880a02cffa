//! Prompt construction for the generation step.
//!
//! Pure string assembly, kept separate from the engine so the exact prompt
//! shapes are unit-testable. A configured custom prompt is used verbatim;
//! retrieved context and web results are never interpolated into it. Web
//! results are a textual splice in front of the literal `Question:` marker,
//! which silently no-ops when a custom prompt lacks that marker.

use crate::domain::search::SearchHit;

const ASSISTANT_PREAMBLE: &str = "You are a helpful AI assistant. ";
const QUESTION_MARKER: &str = "Question:";

/// Build the base prompt, before any web-result splice
pub fn build_prompt(
    query: &str,
    context: &str,
    custom_prompt: Option<&str>,
    use_web_search: bool,
) -> String {
    if let Some(custom) = custom_prompt
        && !custom.is_empty()
    {
        return custom.to_string();
    }

    let mut prompt = String::from(ASSISTANT_PREAMBLE);

    if !context.is_empty() {
        prompt.push_str(&format!(
            "Use the following context to answer the question:\n\nContext: {}\n\n",
            context
        ));
    }

    if use_web_search {
        prompt.push_str("You can also use web search results if needed.\n\n");
    }

    prompt.push_str(&format!("Question: {}\n\nAnswer:", query));
    prompt
}

/// Splice formatted web results in front of the question marker.
///
/// Zero hits leave the prompt untouched, so no empty results block is ever
/// inserted.
pub fn splice_web_results(prompt: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return prompt.to_string();
    }

    let mut block = String::from("\n\nWeb Search Results:\n");
    for (index, hit) in hits.iter().enumerate() {
        block.push_str(&format!(
            "{}. {}\n{}\n{}\n\n",
            index + 1,
            hit.title,
            hit.snippet,
            hit.link
        ));
    }

    prompt.replace(QUESTION_MARKER, &format!("{}\n{}", block, QUESTION_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(rank: u32) -> SearchHit {
        SearchHit {
            title: format!("Result {}", rank),
            snippet: format!("Snippet {}", rank),
            link: format!("https://example.com/{}", rank),
            rank,
        }
    }

    #[test]
    fn test_plain_prompt() {
        let prompt = build_prompt("What is Rust?", "", None, false);
        assert_eq!(
            prompt,
            "You are a helpful AI assistant. Question: What is Rust?\n\nAnswer:"
        );
    }

    #[test]
    fn test_prompt_with_context_block() {
        let prompt = build_prompt("capital?", "Paris is the capital of France.", None, false);
        assert!(prompt.contains(
            "Use the following context to answer the question:\n\nContext: Paris is the capital of France.\n\n"
        ));
        assert!(prompt.ends_with("Question: capital?\n\nAnswer:"));
    }

    #[test]
    fn test_prompt_with_search_notice() {
        let with_search = build_prompt("q", "", None, true);
        let without_search = build_prompt("q", "", None, false);
        assert!(with_search.contains("You can also use web search results if needed.\n\n"));
        assert_ne!(with_search, without_search);
    }

    #[test]
    fn test_custom_prompt_used_verbatim() {
        let prompt = build_prompt("ignored", "ignored context", Some("Answer in French."), true);
        assert_eq!(prompt, "Answer in French.");
    }

    #[test]
    fn test_empty_custom_prompt_falls_back_to_synthesis() {
        let prompt = build_prompt("q", "", Some(""), false);
        assert!(prompt.starts_with("You are a helpful AI assistant."));
    }

    #[test]
    fn test_splice_with_no_hits_is_identity() {
        let prompt = build_prompt("q", "", None, true);
        assert_eq!(splice_web_results(&prompt, &[]), prompt);
    }

    #[test]
    fn test_splice_inserts_before_question() {
        let prompt = build_prompt("q", "", None, true);
        let spliced = splice_web_results(&prompt, &[hit(1), hit(2)]);

        let results_at = spliced.find("Web Search Results:").unwrap();
        let question_at = spliced.find("Question:").unwrap();
        assert!(results_at < question_at);
        assert!(spliced.contains("1. Result 1\nSnippet 1\nhttps://example.com/1\n\n"));
        assert!(spliced.contains("2. Result 2\nSnippet 2\nhttps://example.com/2\n\n"));
    }

    #[test]
    fn test_splice_noops_without_question_marker() {
        let custom = "Translate the following text.";
        assert_eq!(splice_web_results(custom, &[hit(1)]), custom);
    }
}
