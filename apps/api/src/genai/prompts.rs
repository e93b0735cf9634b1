// All prompt constants for the content-generation operations.
// Templates use `{placeholder}` markers replaced before sending.

/// Professional summary prompt. Replace `{experience}` and `{skills}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Create a professional summary for a resume based on the following experience and skills:

Experience:
{experience}

Skills:
{skills}

Write a concise, powerful professional summary that highlights key achievements and skills. Keep it under 3 sentences. Focus on strengths and potential."#;

/// Fallback text when a summary is requested with no experience lines.
pub const NO_EXPERIENCE_PLACEHOLDER: &str = "No experience provided";

/// Fallback text when a summary is requested with no skills.
pub const NO_SKILLS_PLACEHOLDER: &str = "No skills provided";

/// Description improvement prompt. Replace `{description}`.
pub const IMPROVE_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Improve the following job description to be more impactful and professional:

{description}

Guidelines:
1. Use strong action verbs
2. Include specific, quantifiable achievements
3. Highlight key responsibilities
4. Keep it concise and professional
5. Focus on results and impact"#;

/// Skill suggestion prompt. Replace `{experience}`.
/// The closing guideline pins the output format to a bare comma-separated list.
pub const SUGGEST_SKILLS_PROMPT_TEMPLATE: &str = r#"Based on the following professional experience, suggest relevant technical and soft skills:

{experience}

Guidelines:
1. Include both technical and soft skills
2. Be specific and relevant to the industry
3. Focus on in-demand skills
4. Include both hard and soft skills
5. Return only a comma-separated list of skills, no other text"#;

/// Achievement generation prompt. Replace `{description}`.
pub const ACHIEVEMENTS_PROMPT_TEMPLATE: &str = r#"Based on the following job description, generate 3 specific, quantifiable achievements:

{description}

Guidelines:
1. Start each achievement with a strong action verb
2. Include specific numbers and metrics where possible
3. Focus on results and impact
4. Make them measurable and concrete
5. Format as bullet points"#;
