//! Preview rendering — a pure, total function from document to visual tree.
//!
//! A section is included iff its emptiness predicate fails: the four entry
//! sections need at least one entry (an all-empty entry counts), the skills
//! section needs at least one group with at least one item.

use chrono::NaiveDate;
use serde::Serialize;

use crate::editor::document::ResumeDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub header: Header,
    pub sections: Vec<RenderedSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub name: String,
    /// One line each for non-empty email, phone, location, in that order.
    pub contact_lines: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "camelCase")]
pub enum RenderedSection {
    Experience(Vec<ExperienceItem>),
    Education(Vec<EducationItem>),
    Skills(Vec<SkillGroupItem>),
    Certifications(Vec<CertificationItem>),
    Languages(Vec<String>),
}

impl RenderedSection {
    pub fn title(&self) -> &'static str {
        match self {
            RenderedSection::Experience(_) => "Professional Experience",
            RenderedSection::Education(_) => "Education",
            RenderedSection::Skills(_) => "Skills",
            RenderedSection::Certifications(_) => "Certifications",
            RenderedSection::Languages(_) => "Languages",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub position: String,
    pub company: String,
    /// `"Mar 2024 - Present"` style; absent when the start date is empty.
    pub date_range: Option<String>,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub school: String,
    /// `degree` plus `" in {field}"` when the field is non-empty.
    pub degree_line: String,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroupItem {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationItem {
    pub name: String,
    pub issuer: String,
    pub date: Option<String>,
    pub url: Option<String>,
}

/// Formats an ISO date (`YYYY-MM-DD`) as `"MMM yyyy"`, e.g. `Mar 2024`.
/// Empty or unparseable input renders nothing.
pub fn format_month(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%b %Y").to_string())
}

/// Experience date range: absent when the start date renders nothing; an
/// empty (or unrenderable) end date renders as "Present".
fn experience_date_range(start: &str, end: &str) -> Option<String> {
    let start = format_month(start)?;
    let end = format_month(end).unwrap_or_else(|| "Present".to_string());
    Some(format!("{start} - {end}"))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Renders the document into the preview tree. Pure and total.
pub fn render(doc: &ResumeDocument) -> RenderedResume {
    let info = &doc.personal_info;
    let header = Header {
        name: if info.name.is_empty() {
            "Your Name".to_string()
        } else {
            info.name.clone()
        },
        contact_lines: [&info.email, &info.phone, &info.location]
            .into_iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect(),
        summary: non_empty(&info.summary),
    };

    let mut sections = Vec::new();

    if !doc.experience.is_empty() {
        sections.push(RenderedSection::Experience(
            doc.experience
                .iter()
                .map(|exp| ExperienceItem {
                    position: exp.position.clone(),
                    company: exp.company.clone(),
                    date_range: experience_date_range(&exp.start_date, &exp.end_date),
                    description: exp.description.clone(),
                    achievements: exp.achievements.clone(),
                })
                .collect(),
        ));
    }

    if !doc.education.is_empty() {
        sections.push(RenderedSection::Education(
            doc.education
                .iter()
                .map(|edu| EducationItem {
                    school: edu.school.clone(),
                    degree_line: if edu.field.is_empty() {
                        edu.degree.clone()
                    } else {
                        format!("{} in {}", edu.degree, edu.field)
                    },
                    graduation_date: format_month(&edu.graduation_date),
                    gpa: non_empty(&edu.gpa),
                    achievements: edu.achievements.clone(),
                })
                .collect(),
        ));
    }

    if doc.skills.iter().any(|g| !g.items.is_empty()) {
        sections.push(RenderedSection::Skills(
            doc.skills
                .iter()
                .filter(|g| !g.items.is_empty())
                .map(|g| SkillGroupItem {
                    category: g.category.clone(),
                    items: g.items.clone(),
                })
                .collect(),
        ));
    }

    if !doc.certifications.is_empty() {
        sections.push(RenderedSection::Certifications(
            doc.certifications
                .iter()
                .map(|cert| CertificationItem {
                    name: cert.name.clone(),
                    issuer: cert.issuer.clone(),
                    date: format_month(&cert.date),
                    url: non_empty(&cert.url),
                })
                .collect(),
        ));
    }

    if !doc.languages.is_empty() {
        sections.push(RenderedSection::Languages(
            doc.languages
                .iter()
                .map(|lang| format!("{} - {}", lang.language, lang.proficiency))
                .collect(),
        ));
    }

    RenderedResume { header, sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::{
        EducationField, ExperienceField, PersonalField, SectionKind, TECHNICAL_SKILLS,
    };

    #[test]
    fn test_format_month() {
        assert_eq!(format_month("2024-03-15").as_deref(), Some("Mar 2024"));
        assert_eq!(format_month(""), None);
        assert_eq!(format_month("not-a-date"), None);
    }

    #[test]
    fn test_empty_document_renders_no_sections() {
        let rendered = render(&ResumeDocument::default());
        assert!(rendered.sections.is_empty());
        assert_eq!(rendered.header.name, "Your Name");
        assert!(rendered.header.contact_lines.is_empty());
        assert!(rendered.header.summary.is_none());
    }

    #[test]
    fn test_all_empty_experience_entry_still_renders_section() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        let rendered = render(&doc);
        assert_eq!(rendered.sections.len(), 1);
        match &rendered.sections[0] {
            RenderedSection::Experience(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].date_range.is_none());
            }
            other => panic!("expected experience section, got {other:?}"),
        }
    }

    #[test]
    fn test_skills_section_needs_at_least_one_item() {
        // The two fixed (empty) groups alone must not render a skills section.
        let mut doc = ResumeDocument::default();
        assert!(render(&doc).sections.is_empty());

        doc.add_skill(TECHNICAL_SKILLS);
        doc.update_skill(TECHNICAL_SKILLS, 0, "Rust");
        let rendered = render(&doc);
        match &rendered.sections[0] {
            RenderedSection::Skills(groups) => {
                // Only non-empty groups render.
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].category, TECHNICAL_SKILLS);
            }
            other => panic!("expected skills section, got {other:?}"),
        }
    }

    #[test]
    fn test_experience_date_range_present_for_empty_end_date() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        doc.update_experience(0, ExperienceField::StartDate, "2024-03-15");
        let rendered = render(&doc);
        match &rendered.sections[0] {
            RenderedSection::Experience(items) => {
                assert_eq!(items[0].date_range.as_deref(), Some("Mar 2024 - Present"));
            }
            other => panic!("expected experience section, got {other:?}"),
        }
    }

    #[test]
    fn test_experience_date_range_full() {
        assert_eq!(
            experience_date_range("2022-01-01", "2024-03-15").as_deref(),
            Some("Jan 2022 - Mar 2024")
        );
        assert_eq!(experience_date_range("", "2024-03-15"), None);
    }

    #[test]
    fn test_education_degree_line_and_gpa() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Education);
        doc.update_education(0, EducationField::Degree, "BSc");
        doc.update_education(0, EducationField::Field, "Computer Science");
        let rendered = render(&doc);
        match &rendered.sections[0] {
            RenderedSection::Education(items) => {
                assert_eq!(items[0].degree_line, "BSc in Computer Science");
                assert!(items[0].gpa.is_none());
            }
            other => panic!("expected education section, got {other:?}"),
        }
    }

    #[test]
    fn test_header_contact_lines_skip_empty_fields() {
        let mut doc = ResumeDocument::default();
        doc.set_personal_field(PersonalField::Name, "Ada Lovelace");
        doc.set_personal_field(PersonalField::Email, "ada@example.com");
        doc.set_personal_field(PersonalField::Location, "London");
        let rendered = render(&doc);
        assert_eq!(rendered.header.name, "Ada Lovelace");
        assert_eq!(rendered.header.contact_lines, vec!["ada@example.com", "London"]);
    }

    #[test]
    fn test_language_lines() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Languages);
        doc.update_language(0, crate::editor::document::LanguageField::Language, "Spanish");
        doc.update_language(0, crate::editor::document::LanguageField::Proficiency, "Fluent");
        let rendered = render(&doc);
        match &rendered.sections[0] {
            RenderedSection::Languages(lines) => assert_eq!(lines, &vec!["Spanish - Fluent".to_string()]),
            other => panic!("expected languages section, got {other:?}"),
        }
    }

    #[test]
    fn test_render_is_pure() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        let before = doc.clone();
        let first = render(&doc);
        let second = render(&doc);
        assert_eq!(first, second);
        assert_eq!(doc, before);
    }
}
