//! PDF export — assembles the rendered preview into a downloadable document.
//!
//! Output parameters are fixed for output-compatible behavior: US-letter
//! pages, 1-inch margins, raster scale 2.0 and image quality 0.98 (the scale
//! and quality apply to the rasterized asset path; the text path here lays
//! out vector text inside the same geometry), file name `resume-<millis>.pdf`.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::render::{RenderedResume, RenderedSection};

pub mod handlers;
pub mod job;

/// US letter: 8.5in x 11in at 72pt/in.
pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
/// 1-inch margin on every side.
pub const MARGIN_PT: f32 = 72.0;
/// Raster scale for image-based assets.
pub const RASTER_SCALE: f32 = 2.0;
/// JPEG quality for image-based assets.
pub const IMAGE_QUALITY: f32 = 0.98;

const TEXT_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
/// Approximate average glyph width in em for Helvetica body text.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;
const LINE_SPACING: f32 = 1.4;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),
    // Document::save_to writes through io::Write.
    #[error("PDF serialization failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The export file name: `resume-<unix-millis>.pdf`.
pub fn export_filename() -> String {
    format!("resume-{}.pdf", Utc::now().timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// One laid-out text line: already wrapped to the text width.
#[derive(Debug)]
struct Line {
    text: String,
    font: Font,
    size: f32,
    /// Extra vertical gap before this line, in points.
    gap_before: f32,
}

/// Assembles the rendered resume into PDF bytes.
pub fn build_pdf(rendered: &RenderedResume) -> Result<Vec<u8>, ExportError> {
    let lines = layout_lines(rendered);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    // Paginate top-down; break to a new page when a line would cross the
    // bottom margin.
    let mut page_ids: Vec<Object> = Vec::new();
    let mut operations: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT_PT - MARGIN_PT;

    let flush_page =
        |doc: &mut Document, operations: &mut Vec<Operation>, page_ids: &mut Vec<Object>| -> Result<(), ExportError> {
            let content = Content {
                operations: std::mem::take(operations),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
            Ok(())
        };

    for line in &lines {
        let leading = line.size * LINE_SPACING;
        y -= line.gap_before + leading;
        if y < MARGIN_PT {
            flush_page(&mut doc, &mut operations, &mut page_ids)?;
            y = PAGE_HEIGHT_PT - MARGIN_PT - leading;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        operations.push(Operation::new("Td", vec![MARGIN_PT.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    flush_page(&mut doc, &mut operations, &mut page_ids)?;

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                PAGE_WIDTH_PT.into(),
                PAGE_HEIGHT_PT.into(),
            ],
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Flattens the rendered tree into wrapped text lines.
fn layout_lines(rendered: &RenderedResume) -> Vec<Line> {
    let mut lines = Vec::new();

    push_wrapped(&mut lines, &rendered.header.name, Font::Bold, 22.0, 0.0);
    for contact in &rendered.header.contact_lines {
        push_wrapped(&mut lines, contact, Font::Regular, 10.0, 0.0);
    }
    if let Some(summary) = &rendered.header.summary {
        push_wrapped(&mut lines, summary, Font::Regular, 10.0, 8.0);
    }

    for section in &rendered.sections {
        push_wrapped(&mut lines, section.title(), Font::Bold, 14.0, 16.0);
        match section {
            RenderedSection::Experience(items) => {
                for item in items {
                    push_wrapped(&mut lines, &item.position, Font::Bold, 11.0, 8.0);
                    push_wrapped(&mut lines, &item.company, Font::Regular, 10.0, 0.0);
                    if let Some(range) = &item.date_range {
                        push_wrapped(&mut lines, range, Font::Regular, 9.0, 0.0);
                    }
                    push_wrapped(&mut lines, &item.description, Font::Regular, 10.0, 2.0);
                    for achievement in &item.achievements {
                        push_wrapped(
                            &mut lines,
                            &format!("• {achievement}"),
                            Font::Regular,
                            10.0,
                            0.0,
                        );
                    }
                }
            }
            RenderedSection::Education(items) => {
                for item in items {
                    push_wrapped(&mut lines, &item.school, Font::Bold, 11.0, 8.0);
                    push_wrapped(&mut lines, &item.degree_line, Font::Regular, 10.0, 0.0);
                    if let Some(date) = &item.graduation_date {
                        push_wrapped(&mut lines, date, Font::Regular, 9.0, 0.0);
                    }
                    if let Some(gpa) = &item.gpa {
                        push_wrapped(&mut lines, &format!("GPA: {gpa}"), Font::Regular, 10.0, 0.0);
                    }
                    for achievement in &item.achievements {
                        push_wrapped(
                            &mut lines,
                            &format!("• {achievement}"),
                            Font::Regular,
                            10.0,
                            0.0,
                        );
                    }
                }
            }
            RenderedSection::Skills(groups) => {
                for group in groups {
                    push_wrapped(&mut lines, &group.category, Font::Bold, 11.0, 8.0);
                    push_wrapped(&mut lines, &group.items.join(", "), Font::Regular, 10.0, 0.0);
                }
            }
            RenderedSection::Certifications(items) => {
                for item in items {
                    push_wrapped(&mut lines, &item.name, Font::Bold, 11.0, 8.0);
                    push_wrapped(&mut lines, &item.issuer, Font::Regular, 10.0, 0.0);
                    if let Some(date) = &item.date {
                        push_wrapped(&mut lines, date, Font::Regular, 9.0, 0.0);
                    }
                    if let Some(url) = &item.url {
                        push_wrapped(&mut lines, url, Font::Regular, 9.0, 0.0);
                    }
                }
            }
            RenderedSection::Languages(entries) => {
                for entry in entries {
                    push_wrapped(&mut lines, entry, Font::Regular, 10.0, 4.0);
                }
            }
        }
    }

    lines
}

/// Greedy word-wrap against the text width using an average glyph width
/// estimate, pushing one `Line` per printed line.
fn push_wrapped(lines: &mut Vec<Line>, text: &str, font: Font, size: f32, gap_before: f32) {
    let max_chars = (TEXT_WIDTH_PT / (size * AVG_CHAR_WIDTH_EM)).max(1.0) as usize;
    let mut gap = gap_before;
    for wrapped in wrap_text(text, max_chars) {
        lines.push(Line {
            text: wrapped,
            font,
            size,
            gap_before: gap,
        });
        gap = 0.0;
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            wrapped.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    wrapped.push(current);
    wrapped
}
