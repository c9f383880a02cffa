use serde::{Deserialize, Serialize};

/// How a [`TokenUsage`] was measured.
///
/// The OpenAI backend reports exact token counts; the Gemini backend has no
/// usage API and counts whitespace-separated words instead. The two are not
/// comparable quantities and are never unified, so the basis travels with
/// the counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageBasis {
    /// Token counts reported by the provider
    Reported,
    /// Whitespace word counts of prompt and response
    Approximate,
}

/// Token usage for one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub basis: UsageBasis,
}

impl TokenUsage {
    /// Usage from provider-reported token counts
    pub fn reported(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            basis: UsageBasis::Reported,
        }
    }

    /// Usage approximated as whitespace word counts
    pub fn approximated(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = word_count(prompt);
        let completion_tokens = word_count(completion);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            basis: UsageBasis::Approximate,
        }
    }
}

/// Whitespace word count used for approximate usage accounting
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// A completed generation from an LLM backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
}

impl Generation {
    pub fn new(text: impl Into<String>, model: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_usage_totals() {
        let usage = TokenUsage::reported(10, 20);
        assert_eq!(usage.total_tokens, 30);
        assert_eq!(usage.basis, UsageBasis::Reported);
    }

    #[test]
    fn test_approximated_usage_counts_words() {
        let usage = TokenUsage::approximated("What is the capital of France?", "Paris.");
        assert_eq!(usage.prompt_tokens, 6);
        assert_eq!(usage.completion_tokens, 1);
        assert_eq!(usage.total_tokens, 7);
        assert_eq!(usage.basis, UsageBasis::Approximate);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  a\tb\n c  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_basis_serialization() {
        let usage = TokenUsage::reported(1, 1);
        let json = serde_json::to_string(&usage).unwrap();
        assert!(json.contains("\"basis\":\"reported\""));
    }
}
