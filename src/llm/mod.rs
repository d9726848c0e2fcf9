pub mod gemini;
pub mod noop;
pub mod ollama;
pub mod openai;
pub mod prompt_builder;
mod prompts;

use anyhow::Result;

pub use prompt_builder::GenerationRequest;

/// Trait for talking to a text-generation backend.
pub trait LlmClient: Send + Sync {
    /// Send the request and return the generated text, untrimmed.
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((cut, _)) => format!(
            "{}...\n[truncated {} chars]",
            &s[..cut],
            s[cut..].chars().count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("⚔️⚔️⚔️", 2), "⚔️...\n[truncated 4 chars]");
    }
}
