//! Resume document model — the in-memory nested record one editing session owns.
//!
//! # Mutation contract
//! Every mutator is total: an out-of-range index or an unknown skill category
//! is a silent no-op, never a panic or an error. This keeps the editor
//! resilient to stale indices captured before a concurrent removal.
//!
//! The document is always fully defined — empty string/vec is the "unset"
//! sentinel, so rendering never has to distinguish absent from empty.

use serde::{Deserialize, Serialize};

/// Skill group every document starts with; AI-suggested skills merge here.
pub const TECHNICAL_SKILLS: &str = "Technical Skills";
pub const SOFT_SKILLS: &str = "Soft Skills";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    /// ISO date (`YYYY-MM-DD`) or empty.
    pub start_date: String,
    /// ISO date or empty; empty renders as "Present".
    pub end_date: String,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
    pub gpa: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    /// Groups are addressed by category string equality, not by index.
    /// Category values must stay unique for correct addressing.
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    pub language: String,
    /// One of Native / Fluent / Advanced / Intermediate / Basic, or empty.
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillGroup>,
    pub certifications: Vec<CertificationEntry>,
    pub languages: Vec<LanguageEntry>,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: vec![
                SkillGroup {
                    category: TECHNICAL_SKILLS.to_string(),
                    items: Vec::new(),
                },
                SkillGroup {
                    category: SOFT_SKILLS.to_string(),
                    items: Vec::new(),
                },
            ],
            certifications: Vec::new(),
            languages: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field addressing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    Name,
    Email,
    Phone,
    Location,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceField {
    Company,
    Position,
    StartDate,
    EndDate,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationField {
    School,
    Degree,
    Field,
    GraduationDate,
    Gpa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CertificationField {
    Name,
    Issuer,
    Date,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageField {
    Language,
    Proficiency,
}

/// Repeating sections addressable by the generic add/remove operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Experience,
    Education,
    Certifications,
    Languages,
}

// ────────────────────────────────────────────────────────────────────────────
// Mutation operations
// ────────────────────────────────────────────────────────────────────────────

impl ResumeDocument {
    pub fn set_personal_field(&mut self, field: PersonalField, value: &str) {
        let info = &mut self.personal_info;
        let slot = match field {
            PersonalField::Name => &mut info.name,
            PersonalField::Email => &mut info.email,
            PersonalField::Phone => &mut info.phone,
            PersonalField::Location => &mut info.location,
            PersonalField::Summary => &mut info.summary,
        };
        *slot = value.to_string();
    }

    /// Appends an all-empty entry to the named repeating section.
    pub fn add_entry(&mut self, section: SectionKind) {
        match section {
            SectionKind::Experience => self.experience.push(ExperienceEntry::default()),
            SectionKind::Education => self.education.push(EducationEntry::default()),
            SectionKind::Certifications => self.certifications.push(CertificationEntry::default()),
            SectionKind::Languages => self.languages.push(LanguageEntry::default()),
        }
    }

    /// Removes the entry at `index`; subsequent indices shift down.
    pub fn remove_entry(&mut self, section: SectionKind, index: usize) {
        match section {
            SectionKind::Experience => remove_at(&mut self.experience, index),
            SectionKind::Education => remove_at(&mut self.education, index),
            SectionKind::Certifications => remove_at(&mut self.certifications, index),
            SectionKind::Languages => remove_at(&mut self.languages, index),
        }
    }

    pub fn update_experience(&mut self, index: usize, field: ExperienceField, value: &str) {
        if let Some(entry) = self.experience.get_mut(index) {
            let slot = match field {
                ExperienceField::Company => &mut entry.company,
                ExperienceField::Position => &mut entry.position,
                ExperienceField::StartDate => &mut entry.start_date,
                ExperienceField::EndDate => &mut entry.end_date,
                ExperienceField::Description => &mut entry.description,
            };
            *slot = value.to_string();
        }
    }

    /// Replaces the achievement list of one experience entry wholesale.
    pub fn set_experience_achievements(&mut self, index: usize, achievements: Vec<String>) {
        if let Some(entry) = self.experience.get_mut(index) {
            entry.achievements = achievements;
        }
    }

    pub fn update_education(&mut self, index: usize, field: EducationField, value: &str) {
        if let Some(entry) = self.education.get_mut(index) {
            let slot = match field {
                EducationField::School => &mut entry.school,
                EducationField::Degree => &mut entry.degree,
                EducationField::Field => &mut entry.field,
                EducationField::GraduationDate => &mut entry.graduation_date,
                EducationField::Gpa => &mut entry.gpa,
            };
            *slot = value.to_string();
        }
    }

    pub fn set_education_achievements(&mut self, index: usize, achievements: Vec<String>) {
        if let Some(entry) = self.education.get_mut(index) {
            entry.achievements = achievements;
        }
    }

    pub fn update_certification(&mut self, index: usize, field: CertificationField, value: &str) {
        if let Some(entry) = self.certifications.get_mut(index) {
            let slot = match field {
                CertificationField::Name => &mut entry.name,
                CertificationField::Issuer => &mut entry.issuer,
                CertificationField::Date => &mut entry.date,
                CertificationField::Url => &mut entry.url,
            };
            *slot = value.to_string();
        }
    }

    pub fn update_language(&mut self, index: usize, field: LanguageField, value: &str) {
        if let Some(entry) = self.languages.get_mut(index) {
            let slot = match field {
                LanguageField::Language => &mut entry.language,
                LanguageField::Proficiency => &mut entry.proficiency,
            };
            *slot = value.to_string();
        }
    }

    /// Appends an empty skill item to the group matching `category`.
    /// Unknown category: no-op.
    pub fn add_skill(&mut self, category: &str) {
        if let Some(group) = self.skill_group_mut(category) {
            group.items.push(String::new());
        }
    }

    /// Replaces one skill item, addressed by (category, index).
    /// Unknown category or out-of-range index: no-op.
    pub fn update_skill(&mut self, category: &str, index: usize, value: &str) {
        if let Some(group) = self.skill_group_mut(category) {
            if let Some(item) = group.items.get_mut(index) {
                *item = value.to_string();
            }
        }
    }

    pub fn remove_skill(&mut self, category: &str, index: usize) {
        if let Some(group) = self.skill_group_mut(category) {
            remove_at(&mut group.items, index);
        }
    }

    /// Unions suggested skills into the "Technical Skills" group, preserving
    /// existing items and discarding exact-string duplicates. Idempotent.
    pub fn merge_technical_skills(&mut self, suggestions: Vec<String>) {
        if let Some(group) = self.skill_group_mut(TECHNICAL_SKILLS) {
            for skill in suggestions {
                if !group.items.contains(&skill) {
                    group.items.push(skill);
                }
            }
        }
    }

    fn skill_group_mut(&mut self, category: &str) -> Option<&mut SkillGroup> {
        self.skills.iter_mut().find(|g| g.category == category)
    }

    // ── Fragment derivation for AI operations ───────────────────────────────

    /// One line per experience entry: `"{position} at {company}: {description}"`.
    pub fn experience_fragment(&self) -> String {
        self.experience
            .iter()
            .map(|exp| format!("{} at {}: {}", exp.position, exp.company, exp.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every skill item across all groups, in group order.
    pub fn all_skill_items(&self) -> Vec<String> {
        self.skills
            .iter()
            .flat_map(|g| g.items.iter().cloned())
            .collect()
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) {
    if index < items.len() {
        items.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_has_fixed_skill_groups() {
        let doc = ResumeDocument::default();
        let categories: Vec<&str> = doc.skills.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec![TECHNICAL_SKILLS, SOFT_SKILLS]);
        assert!(doc.skills.iter().all(|g| g.items.is_empty()));
    }

    #[test]
    fn test_add_update_remove_preserves_unrelated_entries() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        doc.add_entry(SectionKind::Experience);
        doc.add_entry(SectionKind::Experience);
        assert_eq!(doc.experience.len(), 3);

        doc.update_experience(0, ExperienceField::Company, "Acme");
        doc.update_experience(1, ExperienceField::Company, "Globex");
        doc.update_experience(2, ExperienceField::Company, "Initech");
        doc.update_experience(1, ExperienceField::Position, "Engineer");

        // Removal shifts subsequent indices; survivors keep last-written values.
        doc.remove_entry(SectionKind::Experience, 0);
        assert_eq!(doc.experience.len(), 2);
        assert_eq!(doc.experience[0].company, "Globex");
        assert_eq!(doc.experience[0].position, "Engineer");
        assert_eq!(doc.experience[1].company, "Initech");
        assert_eq!(doc.experience[1].position, "");
    }

    #[test]
    fn test_out_of_range_update_and_remove_are_no_ops() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Education);
        doc.update_education(5, EducationField::School, "MIT");
        doc.remove_entry(SectionKind::Education, 5);
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.education[0].school, "");
    }

    #[test]
    fn test_unknown_skill_category_is_no_op() {
        let mut doc = ResumeDocument::default();
        doc.add_skill("Hobbies");
        doc.update_skill("Hobbies", 0, "juggling");
        doc.remove_skill("Hobbies", 0);
        assert_eq!(doc, ResumeDocument::default());
    }

    #[test]
    fn test_skill_addressing_by_category() {
        let mut doc = ResumeDocument::default();
        doc.add_skill(SOFT_SKILLS);
        doc.update_skill(SOFT_SKILLS, 0, "Communication");
        assert_eq!(doc.skills[1].items, vec!["Communication"]);
        assert!(doc.skills[0].items.is_empty());

        doc.remove_skill(SOFT_SKILLS, 0);
        assert!(doc.skills[1].items.is_empty());
    }

    #[test]
    fn test_merge_technical_skills_is_idempotent_union() {
        let mut doc = ResumeDocument::default();
        doc.add_skill(TECHNICAL_SKILLS);
        doc.update_skill(TECHNICAL_SKILLS, 0, "Rust");

        let suggestions = vec!["Rust".to_string(), "Python".to_string(), "SQL".to_string()];
        doc.merge_technical_skills(suggestions.clone());
        assert_eq!(doc.skills[0].items, vec!["Rust", "Python", "SQL"]);

        // Merging the same list twice yields the same set as merging it once.
        doc.merge_technical_skills(suggestions);
        assert_eq!(doc.skills[0].items, vec!["Rust", "Python", "SQL"]);
    }

    #[test]
    fn test_merge_dedupes_within_one_suggestion_list() {
        let mut doc = ResumeDocument::default();
        doc.merge_technical_skills(vec![
            "Go".to_string(),
            "Go".to_string(),
            "Docker".to_string(),
        ]);
        assert_eq!(doc.skills[0].items, vec!["Go", "Docker"]);
    }

    #[test]
    fn test_achievements_replacement_is_wholesale() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        doc.set_experience_achievements(0, vec!["First pass".to_string()]);
        doc.set_experience_achievements(0, vec!["Second pass".to_string()]);
        assert_eq!(doc.experience[0].achievements, vec!["Second pass"]);
    }

    #[test]
    fn test_experience_fragment_format() {
        let mut doc = ResumeDocument::default();
        doc.add_entry(SectionKind::Experience);
        doc.update_experience(0, ExperienceField::Position, "Backend engineer");
        doc.update_experience(0, ExperienceField::Company, "Acme");
        doc.update_experience(0, ExperienceField::Description, "built APIs");
        assert_eq!(doc.experience_fragment(), "Backend engineer at Acme: built APIs");
    }

    #[test]
    fn test_all_skill_items_flattens_in_group_order() {
        let mut doc = ResumeDocument::default();
        doc.add_skill(TECHNICAL_SKILLS);
        doc.update_skill(TECHNICAL_SKILLS, 0, "Rust");
        doc.add_skill(SOFT_SKILLS);
        doc.update_skill(SOFT_SKILLS, 0, "Teamwork");
        assert_eq!(doc.all_skill_items(), vec!["Rust", "Teamwork"]);
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = ResumeDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert_eq!(json["skills"][0]["category"], TECHNICAL_SKILLS);
    }
}
