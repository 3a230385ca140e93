use notehive_api::{
    AssistAnswerResponse, AssistQueryRequest, AssistRequest, AssistRewriteRequest,
    AssistRewriteResponse, AssistSuggestionsResponse, AssistSummaryResponse,
    ASSIST_CONTENT_MAX_LEN,
};
use notehive_core::{Error, Result};

use crate::assist::{
    provider_missing, question_prompt, rewrite_prompt, suggestions_prompt, summarize_prompt,
};
use crate::AppState;

fn validated_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("content is required"));
    }
    if trimmed.chars().count() > ASSIST_CONTENT_MAX_LEN {
        return Err(Error::invalid_argument(format!(
            "content cannot exceed {ASSIST_CONTENT_MAX_LEN} characters"
        )));
    }
    Ok(trimmed)
}

fn required_field<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument(format!("{name} is required")));
    }
    Ok(trimmed)
}

async fn complete(state: &AppState, prompt: String) -> Result<String> {
    let provider = state.assist.as_ref().ok_or_else(provider_missing)?;
    provider.complete(&prompt).await
}

pub async fn summarize(state: &AppState, req: AssistRequest) -> Result<AssistSummaryResponse> {
    let content = validated_content(&req.content)?;
    let summary = complete(state, summarize_prompt(content)).await?;
    Ok(AssistSummaryResponse {
        success: true,
        summary,
    })
}

pub async fn rewrite(
    state: &AppState,
    req: AssistRewriteRequest,
) -> Result<AssistRewriteResponse> {
    let content = validated_content(&req.content)?;
    let instruction = required_field(&req.instruction, "instruction")?;
    let rewritten = complete(state, rewrite_prompt(content, instruction)).await?;
    Ok(AssistRewriteResponse {
        success: true,
        rewritten,
    })
}

pub async fn query(state: &AppState, req: AssistQueryRequest) -> Result<AssistAnswerResponse> {
    let content = validated_content(&req.content)?;
    let question = required_field(&req.question, "question")?;
    let answer = complete(state, question_prompt(content, question)).await?;
    Ok(AssistAnswerResponse {
        success: true,
        answer,
    })
}

pub async fn suggestions(
    state: &AppState,
    req: AssistRequest,
) -> Result<AssistSuggestionsResponse> {
    let content = validated_content(&req.content)?;
    let suggestions = complete(state, suggestions_prompt(content)).await?;
    Ok(AssistSuggestionsResponse {
        success: true,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_bounds_are_enforced() {
        assert!(validated_content("   ").is_err());
        assert!(validated_content(&"x".repeat(ASSIST_CONTENT_MAX_LEN + 1)).is_err());
        assert_eq!(validated_content("  note  ").expect("valid"), "note");
    }

    #[test]
    fn companion_fields_must_be_present() {
        assert!(required_field("", "instruction").is_err());
        assert_eq!(
            required_field(" shorten ", "instruction").expect("valid"),
            "shorten"
        );
    }
}
