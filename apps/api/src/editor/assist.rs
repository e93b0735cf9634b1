//! AI-assisted editor operations.
//!
//! Every operation follows the same protocol:
//! 1. derive a textual fragment from the current document,
//! 2. call the content-generation client (session lock released while the
//!    call is pending so plain edits stay responsive),
//! 3. on success write the result back atomically,
//! 4. on failure leave the document unchanged and surface the error.
//!
//! Operations are serialized per session through an in-flight guard; a second
//! AI request while one is pending fails with a conflict. The guard releases
//! on drop, so an abandoned request cannot leave the session stuck.

use tracing::info;

use crate::editor::document::PersonalField;
use crate::editor::session::SharedSession;
use crate::errors::AppError;
use crate::genai::{ops, TextGenerator};

/// Generates a professional summary from all experience entries and all skill
/// items, writing it into `personal_info.summary`. Returns the summary.
pub async fn generate_summary(
    session: &SharedSession,
    gen: &dyn TextGenerator,
) -> Result<String, AppError> {
    let (_guard, experience, skills) = {
        let s = session.lock().await;
        let guard = s.begin_assist()?;
        (guard, s.document.experience_fragment(), s.document.all_skill_items())
    };

    let result = ops::generate_summary(gen, &experience, &skills).await;

    let mut s = session.lock().await;
    let summary = result?;
    s.mutate(|d| d.set_personal_field(PersonalField::Summary, &summary));
    info!("Summary generated for session {}", s.id);
    Ok(summary)
}

/// Improves one experience entry's description in place. Returns the
/// improved text. Unknown index fails up front with not-found.
pub async fn improve_description(
    session: &SharedSession,
    gen: &dyn TextGenerator,
    index: usize,
) -> Result<String, AppError> {
    let (_guard, description) = {
        let s = session.lock().await;
        let description = s
            .document
            .experience
            .get(index)
            .map(|e| e.description.clone())
            .ok_or_else(|| AppError::NotFound(format!("No experience entry at index {index}")))?;
        (s.begin_assist()?, description)
    };

    let result = ops::improve_description(gen, &description).await;

    let mut s = session.lock().await;
    let improved = result?;
    s.mutate(|d| {
        d.update_experience(index, crate::editor::document::ExperienceField::Description, &improved)
    });
    Ok(improved)
}

/// Suggests skills from all experience entries and unions them into the
/// "Technical Skills" group. Returns the suggested list.
pub async fn suggest_skills(
    session: &SharedSession,
    gen: &dyn TextGenerator,
) -> Result<Vec<String>, AppError> {
    let (_guard, experience) = {
        let s = session.lock().await;
        (s.begin_assist()?, s.document.experience_fragment())
    };

    let result = ops::suggest_skills(gen, &experience).await;

    let mut s = session.lock().await;
    let suggestions = result?;
    s.mutate(|d| d.merge_technical_skills(suggestions.clone()));
    info!("{} skills suggested for session {}", suggestions.len(), s.id);
    Ok(suggestions)
}

/// Generates achievement bullets from one experience entry's description and
/// replaces that entry's achievement list wholesale (never merged).
pub async fn generate_achievements(
    session: &SharedSession,
    gen: &dyn TextGenerator,
    index: usize,
) -> Result<Vec<String>, AppError> {
    let (_guard, description) = {
        let s = session.lock().await;
        let description = s
            .document
            .experience
            .get(index)
            .map(|e| e.description.clone())
            .ok_or_else(|| AppError::NotFound(format!("No experience entry at index {index}")))?;
        (s.begin_assist()?, description)
    };

    let result = ops::generate_achievements(gen, &description).await;

    let mut s = session.lock().await;
    let achievements = result?;
    s.mutate(|d| d.set_experience_achievements(index, achievements.clone()));
    Ok(achievements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::editor::document::{ExperienceField, ResumeDocument, SectionKind, TECHNICAL_SKILLS};
    use crate::editor::session::SessionRegistry;
    use crate::genai::TransportError;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            Err(TransportError::EmptyContent)
        }
    }

    /// Never resolves; stands in for a generation call still on the wire.
    struct StalledGenerator;

    #[async_trait]
    impl TextGenerator for StalledGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            std::future::pending().await
        }
    }

    async fn session_with_experience() -> crate::editor::session::SharedSession {
        let registry = SessionRegistry::new();
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        doc.update_experience(0, ExperienceField::Position, "Backend engineer");
        doc.update_experience(0, ExperienceField::Company, "Acme");
        doc.update_experience(0, ExperienceField::Description, "built APIs");
        let id = registry.open(Uuid::new_v4(), None, doc).await;
        registry.get(id).await.unwrap()
    }

    #[tokio::test]
    async fn test_generate_summary_writes_back() {
        let session = session_with_experience().await;
        let gen = FixedGenerator("Seasoned backend engineer.");
        let summary = generate_summary(&session, &gen).await.unwrap();
        assert_eq!(summary, "Seasoned backend engineer.");
        let s = session.lock().await;
        assert_eq!(s.document.personal_info.summary, "Seasoned backend engineer.");
        assert_eq!(s.revision, 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_document_unchanged_and_clears_flag() {
        let session = session_with_experience().await;
        let before = session.lock().await.document.clone();

        let err = generate_summary(&session, &FailingGenerator).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));

        let s = session.lock().await;
        assert_eq!(s.document, before);
        assert_eq!(s.revision, 0);
        // The in-flight flag must be released on failure.
        assert!(s.begin_assist().is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_request_releases_in_flight_flag() {
        let session = session_with_experience().await;

        // Dropping the operation mid-generation (client disconnect) must not
        // leave the session permanently conflicted.
        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            generate_summary(&session, &StalledGenerator),
        )
        .await;
        assert!(cancelled.is_err());

        let s = session.lock().await;
        assert!(s.begin_assist().is_ok());
        assert_eq!(s.revision, 0);
    }

    #[tokio::test]
    async fn test_suggest_skills_merges_into_technical_group() {
        let session = session_with_experience().await;
        {
            let mut s = session.lock().await;
            s.mutate(|d| {
                d.add_skill(TECHNICAL_SKILLS);
                d.update_skill(TECHNICAL_SKILLS, 0, "Python");
            });
        }

        let gen = FixedGenerator("Python, REST APIs, Teamwork");
        let suggested = suggest_skills(&session, &gen).await.unwrap();
        assert_eq!(suggested, vec!["Python", "REST APIs", "Teamwork"]);

        let s = session.lock().await;
        assert_eq!(s.document.skills[0].items, vec!["Python", "REST APIs", "Teamwork"]);
    }

    #[tokio::test]
    async fn test_generate_achievements_replaces_wholesale() {
        let session = session_with_experience().await;
        {
            let mut s = session.lock().await;
            s.mutate(|d| d.set_experience_achievements(0, vec!["Old bullet".to_string()]));
        }

        let gen = FixedGenerator("• Cut latency by 40%\n• Shipped v2");
        let achievements = generate_achievements(&session, &gen, 0).await.unwrap();
        assert_eq!(achievements, vec!["Cut latency by 40%", "Shipped v2"]);

        let s = session.lock().await;
        assert_eq!(s.document.experience[0].achievements, achievements);
    }

    #[tokio::test]
    async fn test_unknown_index_is_not_found() {
        let session = session_with_experience().await;
        let err = improve_description(&session, &FixedGenerator("x"), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // Not-found must not leave the in-flight flag set.
        assert!(session.lock().await.begin_assist().is_ok());
    }
}
