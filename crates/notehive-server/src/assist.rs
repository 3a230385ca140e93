//! Text-assist provider seam. The server owns prompt construction; the
//! provider only completes a prompt, so swapping backends never touches the
//! handlers.

use async_trait::async_trait;
use notehive_core::{Error, Result};

#[async_trait]
pub trait AssistProvider: Send + Sync {
    /// Completes a fully rendered prompt and returns the model text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[must_use]
pub fn summarize_prompt(content: &str) -> String {
    format!(
        "Summarize the following note in 2-3 concise sentences. \
         Keep the original tone and key facts.\n\n{content}"
    )
}

#[must_use]
pub fn rewrite_prompt(content: &str, instruction: &str) -> String {
    format!(
        "Rewrite the following note according to this instruction: {instruction}\n\
         Return only the rewritten text.\n\n{content}"
    )
}

#[must_use]
pub fn question_prompt(content: &str, question: &str) -> String {
    format!(
        "Answer the question using only the note below. If the note does not \
         contain the answer, say so.\n\nQuestion: {question}\n\nNote:\n{content}"
    )
}

#[must_use]
pub fn suggestions_prompt(content: &str) -> String {
    format!(
        "Suggest 3-5 concrete improvements to the following note, as a short \
         bulleted list.\n\n{content}"
    )
}

/// Error returned by every assist endpoint when no provider is configured.
#[must_use]
pub fn provider_missing() -> Error {
    Error::unavailable("assist provider is not configured")
}

/// Deterministic provider for tests and local development: echoes a tagged
/// slice of the prompt instead of calling a real model.
#[derive(Debug, Clone, Default)]
pub struct CannedAssist;

#[async_trait]
impl AssistProvider for CannedAssist {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let head: String = prompt.chars().take(80).collect();
        Ok(format!("[canned] {head}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn canned_provider_echoes_prompt_head() {
        let out = CannedAssist.complete("hello world").await.expect("complete");
        assert!(out.starts_with("[canned] hello"));
    }

    #[test]
    fn prompts_embed_the_inputs() {
        assert!(summarize_prompt("body text").contains("body text"));
        let rewrite = rewrite_prompt("body", "make it formal");
        assert!(rewrite.contains("make it formal"));
        assert!(rewrite.contains("body"));
        let q = question_prompt("body", "who wrote this?");
        assert!(q.contains("who wrote this?"));
    }
}
