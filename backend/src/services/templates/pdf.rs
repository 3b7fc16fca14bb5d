//! # Row Renderer
//!
//! Turns one CSV row into a one-page PDF for a template.
//!
//! ## Layout
//!
//! - Page size comes from `LayoutOptions::page_format`, with 72pt margins.
//! - Each template field is one line, `"{label}: {value}"`, drawn top to bottom
//!   in Helvetica. The first baseline sits one font size below the top margin
//!   and every following line is `1.5 × font_size` lower.
//! - A line wider than the printable width is cut and ends with `...`
//!   (see [`fonts::fit_line`]); nothing is wrapped.
//!
//! The document has no timestamps or generated IDs, so the same inputs always
//! produce the same bytes.

use crate::error::{MergeError, RenderError};
use crate::services::data_sources::csv::parse::DataRow;
use crate::services::templates::fonts;
use common::model::layout::{LabelStyle, LayoutOptions};
use common::model::mapping::ColumnMapping;
use common::model::template::FieldSpec;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const MARGIN_PT: f32 = 72.0;
const LINE_HEIGHT_FACTOR: f32 = 1.5;
const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = "sheetmerge";

/// A template field together with the value it gets for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub def: &'a FieldSpec,
    pub value: String,
}

/// Looks up every field's value in `row` through `mapping`.
///
/// Unmapped fields and mapped columns missing from the row resolve to `""`.
/// A required field that resolves to `""` fails with `MissingRequiredField`.
pub fn resolve_fields<'a>(
    row_number: usize,
    row: &DataRow,
    fields: &'a [FieldSpec],
    mapping: &ColumnMapping,
) -> Result<Vec<ResolvedField<'a>>, MergeError> {
    fields
        .iter()
        .map(|def| {
            let value = mapping
                .column_for(def.key)
                .and_then(|column| row.get(column))
                .unwrap_or_default()
                .trim()
                .to_string();
            if def.required && value.is_empty() {
                return Err(MergeError::MissingRequiredField {
                    row: row_number,
                    field: def.key.to_string(),
                });
            }
            Ok(ResolvedField { def, value })
        })
        .collect()
}

/// Text of one output line before width fitting.
pub fn line_text(field: &ResolvedField<'_>, style: LabelStyle) -> String {
    let label = match style {
        LabelStyle::Key => field.def.key,
        LabelStyle::Label => field.def.label,
    };
    format!("{}: {}", label, field.value)
}

/// Renders data row `row_number` (1-based) as a PDF document.
pub fn render_row(
    row_number: usize,
    row: &DataRow,
    fields: &[FieldSpec],
    mapping: &ColumnMapping,
    layout: &LayoutOptions,
) -> Result<Vec<u8>, MergeError> {
    let resolved = resolve_fields(row_number, row, fields, mapping)?;
    let lines: Vec<String> = resolved
        .iter()
        .map(|f| line_text(f, layout.label_style))
        .collect();
    let title = format!("Row {}", row_number);
    let bytes = draw_page(&title, &lines, layout).map_err(|source| MergeError::Render {
        row: row_number,
        source,
    })?;
    debug!(
        "rendered row {} ({} fields, {} bytes)",
        row_number,
        lines.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Lays `lines` out on a single page and serializes the document.
fn draw_page(
    title: &str,
    lines: &[String],
    layout: &LayoutOptions,
) -> Result<Vec<u8>, RenderError> {
    if layout.font_size == 0 {
        return Err(RenderError::InvalidFontSize(layout.font_size));
    }
    let font_size = layout.font_size as f32;
    let (width, height) = layout.page_format.size_pt();
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    let first_baseline = height - MARGIN_PT - font_size;
    let last_baseline = first_baseline - line_height * lines.len().saturating_sub(1) as f32;
    if first_baseline < MARGIN_PT || last_baseline < MARGIN_PT {
        return Err(RenderError::PageOverflow {
            lines: lines.len(),
            font_size: layout.font_size,
            format: layout.page_format,
        });
    }
    let max_width = width - 2.0 * MARGIN_PT;

    let mut operations = Vec::with_capacity(lines.len() * 5);
    for (i, line) in lines.iter().enumerate() {
        let y = first_baseline - line_height * i as f32;
        let fitted = fonts::fit_line(line, max_width, font_size);
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![fonts::FONT_RESOURCE.into(), layout.font_size.into()],
        ));
        operations.push(Operation::new("Td", vec![MARGIN_PT.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(fonts::encode(&fitted), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => fonts::BASE_FONT,
        "Encoding" => fonts::ENCODING,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            fonts::FONT_RESOURCE => font_id,
        },
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), width.into(), height.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(fonts::encode(title)),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}
