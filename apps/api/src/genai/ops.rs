//! Typed generation operations for the resume editor.
//!
//! Every operation follows the same contract: validate its input before any
//! network call, build the prompt, send it through the [`TextGenerator`], and
//! post-process the raw response into the shape the editor writes back.
//! Transport failures are logged in full and re-signaled as the generic
//! [`GenAiError::Generation`].

use tracing::error;

use crate::genai::prompts::{
    ACHIEVEMENTS_PROMPT_TEMPLATE, IMPROVE_DESCRIPTION_PROMPT_TEMPLATE, NO_EXPERIENCE_PLACEHOLDER,
    NO_SKILLS_PLACEHOLDER, SUGGEST_SKILLS_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::genai::{GenAiError, TextGenerator};

/// Generates a professional summary from concatenated experience lines and a
/// flat skill list. Requires experience text OR at least one skill.
pub async fn generate_summary(
    gen: &dyn TextGenerator,
    experience: &str,
    skills: &[String],
) -> Result<String, GenAiError> {
    if experience.is_empty() && skills.is_empty() {
        return Err(GenAiError::Validation(
            "Please add some experience or skills first".to_string(),
        ));
    }

    let experience_block = if experience.is_empty() {
        NO_EXPERIENCE_PLACEHOLDER
    } else {
        experience
    };
    let skills_block = if skills.is_empty() {
        NO_SKILLS_PLACEHOLDER.to_string()
    } else {
        skills.join(", ")
    };

    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{experience}", experience_block)
        .replace("{skills}", &skills_block);

    safe_generate(gen, &prompt).await
}

/// Rewrites a single experience description to be more impactful.
pub async fn improve_description(
    gen: &dyn TextGenerator,
    description: &str,
) -> Result<String, GenAiError> {
    if description.is_empty() {
        return Err(GenAiError::Validation(
            "Please provide a description to improve".to_string(),
        ));
    }

    let prompt = IMPROVE_DESCRIPTION_PROMPT_TEMPLATE.replace("{description}", description);
    safe_generate(gen, &prompt).await
}

/// Suggests skills from experience text. The response is expected to be a
/// comma-separated list; it is split, trimmed and empty fragments dropped.
pub async fn suggest_skills(
    gen: &dyn TextGenerator,
    experience: &str,
) -> Result<Vec<String>, GenAiError> {
    if experience.is_empty() {
        return Err(GenAiError::Validation(
            "Please add some experience first".to_string(),
        ));
    }

    let prompt = SUGGEST_SKILLS_PROMPT_TEMPLATE.replace("{experience}", experience);
    let raw = safe_generate(gen, &prompt).await?;
    Ok(split_skill_list(&raw))
}

/// Generates achievement bullets from an experience description. The response
/// is split on newlines with leading bullet markers stripped, order preserved.
pub async fn generate_achievements(
    gen: &dyn TextGenerator,
    description: &str,
) -> Result<Vec<String>, GenAiError> {
    if description.is_empty() {
        return Err(GenAiError::Validation(
            "Please provide a job description first".to_string(),
        ));
    }

    let prompt = ACHIEVEMENTS_PROMPT_TEMPLATE.replace("{description}", description);
    let raw = safe_generate(gen, &prompt).await?;
    Ok(split_achievement_lines(&raw))
}

/// Runs one generation call, collapsing any transport failure into the
/// generic user-facing error after logging the detail.
async fn safe_generate(gen: &dyn TextGenerator, prompt: &str) -> Result<String, GenAiError> {
    match gen.generate(prompt).await {
        Ok(text) => Ok(text),
        Err(e) => {
            error!("AI generation error: {e}");
            Err(GenAiError::Generation)
        }
    }
}

/// Splits a comma-separated skill response: trim each fragment, drop empties.
pub fn split_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Splits a bullet-list response into one achievement per line: trim, drop
/// empty lines, strip a single leading `•`, `-` or `*` marker.
pub fn split_achievement_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(strip_bullet_marker)
        .map(|line| line.to_string())
        .collect()
}

fn strip_bullet_marker(line: &str) -> &str {
    for marker in ["•", "-", "*"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::genai::TransportError;

    /// Canned generator: returns a fixed response and counts calls.
    struct FixedGenerator {
        response: String,
        calls: AtomicUsize,
    }

    impl FixedGenerator {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Generator that always fails at the transport level.
    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            Err(TransportError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_generate_summary_empty_input_is_validation_error_no_call() {
        let gen = FixedGenerator::new("unused");
        let err = generate_summary(&gen, "", &[]).await.unwrap_err();
        assert!(matches!(err, GenAiError::Validation(_)));
        assert_eq!(gen.call_count(), 0, "must not issue a network call");
    }

    #[tokio::test]
    async fn test_generate_summary_skills_only_is_accepted() {
        let gen = FixedGenerator::new("A driven engineer.");
        let skills = vec!["Rust".to_string()];
        let summary = generate_summary(&gen, "", &skills).await.unwrap();
        assert_eq!(summary, "A driven engineer.");
        assert_eq!(gen.call_count(), 1);
    }

    #[tokio::test]
    async fn test_improve_description_empty_is_validation_error() {
        let gen = FixedGenerator::new("unused");
        let err = improve_description(&gen, "").await.unwrap_err();
        assert!(matches!(err, GenAiError::Validation(_)));
        assert_eq!(gen.call_count(), 0);
    }

    #[tokio::test]
    async fn test_suggest_skills_splits_comma_list() {
        let gen = FixedGenerator::new("Python, REST APIs, , Teamwork");
        let skills = suggest_skills(&gen, "Backend engineer at Acme: built APIs")
            .await
            .unwrap();
        assert_eq!(skills, vec!["Python", "REST APIs", "Teamwork"]);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_generic_error() {
        let err = improve_description(&FailingGenerator, "some text")
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::Generation));
        assert_eq!(
            err.to_string(),
            "Failed to generate content. Please try again."
        );
    }

    #[test]
    fn test_split_achievement_lines_strips_bullets_and_keeps_order() {
        let raw = "• Shipped the thing\n- Cut costs by 20%\n\n* Mentored 3 engineers\nNo marker line";
        let lines = split_achievement_lines(raw);
        assert_eq!(
            lines,
            vec![
                "Shipped the thing",
                "Cut costs by 20%",
                "Mentored 3 engineers",
                "No marker line",
            ]
        );
    }

    #[test]
    fn test_split_skill_list_all_empty_fragments() {
        assert!(split_skill_list(", ,  ,").is_empty());
    }
}
