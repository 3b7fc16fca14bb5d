//! # Batch Orchestrator
//!
//! Renders every parsed row with the Row Renderer and shapes the result:
//! a single PDF for one document, a ZIP for more.
//!
//! ## Row errors
//!
//! With `RowErrorPolicy::Abort` (the default) the first row that fails stops
//! the batch and its error is returned; nothing is packaged. With
//! `RowErrorPolicy::Skip` failing rows are left out and listed in
//! [`GeneratedBatch::skipped`] (and in a `skipped_rows.txt` archive entry).
//! If no row renders at all, the first failure is returned even when skipping.

use crate::error::MergeError;
use crate::services::data_sources::csv::parse::DataRow;
use crate::services::merge::archive::{build_archive, entry_name};
use crate::services::merge::mapping::validate_mapping;
use crate::services::templates::get::get_template;
use crate::services::templates::pdf::render_row;
use common::model::layout::LayoutOptions;
use common::model::mapping::ColumnMapping;
use common::model::template::TemplateId;
use common::requests::RowErrorPolicy;
use log::{info, warn};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";
pub const SKIPPED_ROWS_ENTRY: &str = "skipped_rows.txt";

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// 1-based data row number.
    pub row: usize,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A row left out under the skip policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedOutput {
    Single(RenderedDocument),
    Archive {
        file_name: String,
        /// Entry names in archive order.
        entries: Vec<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBatch {
    pub output: GeneratedOutput,
    pub skipped: Vec<RowFailure>,
}

impl GeneratedBatch {
    pub fn content_type(&self) -> &'static str {
        match self.output {
            GeneratedOutput::Single(_) => PDF_CONTENT_TYPE,
            GeneratedOutput::Archive { .. } => ZIP_CONTENT_TYPE,
        }
    }

    pub fn file_name(&self) -> &str {
        match &self.output {
            GeneratedOutput::Single(doc) => &doc.file_name,
            GeneratedOutput::Archive { file_name, .. } => file_name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.output {
            GeneratedOutput::Single(doc) => &doc.bytes,
            GeneratedOutput::Archive { bytes, .. } => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self.output {
            GeneratedOutput::Single(doc) => doc.bytes,
            GeneratedOutput::Archive { bytes, .. } => bytes,
        }
    }
}

fn render_document(
    row_number: usize,
    row: &DataRow,
    template: TemplateId,
    mapping: &ColumnMapping,
    layout: &LayoutOptions,
) -> Result<RenderedDocument, MergeError> {
    let bytes = render_row(row_number, row, template.fields(), mapping, layout)?;
    let identifier = mapping
        .column_for(template.name_field())
        .and_then(|column| row.get(column))
        .unwrap_or_default();
    Ok(RenderedDocument {
        row: row_number,
        file_name: entry_name(identifier, row_number),
        bytes,
    })
}

fn is_row_error(err: &MergeError) -> bool {
    matches!(
        err,
        MergeError::MissingRequiredField { .. } | MergeError::Render { .. }
    )
}

fn skipped_rows_report(skipped: &[RowFailure]) -> String {
    skipped
        .iter()
        .map(|f| format!("row {}: {}\n", f.row, f.message))
        .collect()
}

/// Generates the documents for `rows` with template `template_id`.
///
/// The mapping is checked against the template and the CSV columns before
/// any row is rendered; rows are rendered and packaged in input order.
pub fn generate(
    rows: &[DataRow],
    template_id: &str,
    mapping: &ColumnMapping,
    layout: &LayoutOptions,
    policy: RowErrorPolicy,
) -> Result<GeneratedBatch, MergeError> {
    let template = get_template(template_id)?;
    let first = rows
        .first()
        .ok_or_else(|| MergeError::InvalidCsv("the file has no data rows".to_string()))?;
    let headers: Vec<String> = first.columns().map(str::to_string).collect();
    validate_mapping(template, mapping, &headers)?;

    let mut documents = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    let mut first_error = None;
    for (i, row) in rows.iter().enumerate() {
        let row_number = i + 1;
        match render_document(row_number, row, template, mapping, layout) {
            Ok(doc) => documents.push(doc),
            Err(err) if policy == RowErrorPolicy::Skip && is_row_error(&err) => {
                warn!("skipping row {}: {}", row_number, err);
                skipped.push(RowFailure {
                    row: row_number,
                    message: err.to_string(),
                });
                first_error.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    if documents.is_empty() {
        return Err(first_error.unwrap_or_else(|| {
            MergeError::InvalidCsv("the file has no data rows".to_string())
        }));
    }

    info!(
        "generated {} document(s) with template '{}' ({} skipped)",
        documents.len(),
        template,
        skipped.len()
    );

    let output = if documents.len() == 1 {
        GeneratedOutput::Single(documents.remove(0))
    } else {
        let report = skipped_rows_report(&skipped);
        let mut entries: Vec<(&str, &[u8])> = documents
            .iter()
            .map(|d| (d.file_name.as_str(), d.bytes.as_slice()))
            .collect();
        if !skipped.is_empty() {
            entries.push((SKIPPED_ROWS_ENTRY, report.as_bytes()));
        }
        let bytes = build_archive(entries.iter().copied())?;
        GeneratedOutput::Archive {
            file_name: format!("{}_documents.zip", template),
            entries: entries.iter().map(|(name, _)| name.to_string()).collect(),
            bytes,
        }
    };

    Ok(GeneratedBatch { output, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::services::data_sources::csv::parse::parse_csv;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn rows(csv: &str) -> Vec<DataRow> {
        parse_csv(csv.as_bytes()).unwrap().rows
    }

    fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    fn simple_mapping() -> ColumnMapping {
        ColumnMapping::new().map("name", "Name").map("email", "Email")
    }

    #[test]
    fn one_row_yields_a_single_pdf() {
        let batch = generate(
            &rows("Name,Email\nJohn Doe,john@email.com\n"),
            "simple",
            &simple_mapping(),
            &LayoutOptions::default(),
            RowErrorPolicy::Abort,
        )
        .unwrap();
        assert_eq!(batch.content_type(), PDF_CONTENT_TYPE);
        assert_eq!(batch.file_name(), "John_Doe_1.pdf");
        assert!(batch.bytes().starts_with(b"%PDF-1.5"));
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn many_rows_yield_an_archive_in_row_order() {
        let batch = generate(
            &rows(
                "Name,Email\nJohn Doe,john@email.com\nJane Smith,jane@email.com\nJohn Doe,x@y.z\n",
            ),
            "simple",
            &simple_mapping(),
            &LayoutOptions::default(),
            RowErrorPolicy::Abort,
        )
        .unwrap();
        assert_eq!(batch.content_type(), ZIP_CONTENT_TYPE);
        assert_eq!(batch.file_name(), "simple_documents.zip");
        let entries = archive_entries(batch.bytes());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["John_Doe_1.pdf", "Jane_Smith_2.pdf", "John_Doe_3.pdf"]);
        assert!(entries.iter().all(|(_, b)| b.starts_with(b"%PDF-")));
        match &batch.output {
            GeneratedOutput::Archive { entries, .. } => assert_eq!(entries.len(), 3),
            other => panic!("expected archive, got {:?}", other),
        }
    }

    #[test]
    fn unknown_template_is_rejected_before_rendering() {
        let err = generate(
            &rows("Name\nAnn\n"),
            "receipt",
            &ColumnMapping::new(),
            &LayoutOptions::default(),
            RowErrorPolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::UnknownTemplate(_)));
        assert_eq!(err.to_string(), "unknown template 'receipt'");
    }

    #[test]
    fn missing_amount_mapping_aborts_the_batch() {
        let csv = "No,Client,Date,Total\nA-1,ACME,2024-01-02,10\nA-2,Initech,2024-01-03,20\n";
        let mapping = ColumnMapping::new()
            .map("invoice_number", "No")
            .map("client_name", "Client")
            .map("date", "Date");
        let err = generate(
            &rows(csv),
            "invoice",
            &mapping,
            &LayoutOptions::default(),
            RowErrorPolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MergeError::MissingRequiredField { row: 1, ref field } if field == "amount"
        ));
    }

    #[test]
    fn first_bad_row_is_reported() {
        let err = generate(
            &rows("Name,Email\nAnn,a@x.org\n,b@x.org\n,c@x.org\n"),
            "simple",
            &simple_mapping(),
            &LayoutOptions::default(),
            RowErrorPolicy::Abort,
        )
        .unwrap_err();
        assert_eq!(err.row(), Some(2));
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn skip_policy_leaves_bad_rows_out() {
        let batch = generate(
            &rows("Name,Email\nAnn,a@x.org\n,b@x.org\nCid,c@x.org\n"),
            "simple",
            &simple_mapping(),
            &LayoutOptions::default(),
            RowErrorPolicy::Skip,
        )
        .unwrap();
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].row, 2);
        let entries = archive_entries(batch.bytes());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Ann_1.pdf", "Cid_3.pdf", SKIPPED_ROWS_ENTRY]);
        let report = String::from_utf8(entries[2].1.clone()).unwrap();
        assert!(report.starts_with("row 2: "));
        assert!(report.contains("'name'"));
    }

    #[test]
    fn skip_policy_with_no_good_rows_returns_first_error() {
        let err = generate(
            &rows("Name,Email\n,a@x.org\n,b@x.org\n"),
            "simple",
            &simple_mapping(),
            &LayoutOptions::default(),
            RowErrorPolicy::Skip,
        )
        .unwrap_err();
        assert_eq!(err.row(), Some(1));
    }

    #[test]
    fn skip_policy_does_not_hide_mapping_errors() {
        let err = generate(
            &rows("Name\nAnn\nBo\n"),
            "simple",
            &ColumnMapping::new().map("name", "Nom"),
            &LayoutOptions::default(),
            RowErrorPolicy::Skip,
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::InvalidMapping(_)));
    }

    #[test]
    fn render_errors_abort() {
        let layout = LayoutOptions {
            font_size: 0,
            ..LayoutOptions::default()
        };
        let err = generate(
            &rows("Name\nAnn\nBo\n"),
            "simple",
            &ColumnMapping::new().map("name", "Name"),
            &layout,
            RowErrorPolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MergeError::Render {
                row: 1,
                source: RenderError::InvalidFontSize(0)
            }
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let run = || {
            generate(
                &rows("Name,Email\nAnn,a@x.org\nBo,b@x.org\n"),
                "simple",
                &simple_mapping(),
                &LayoutOptions::default(),
                RowErrorPolicy::Abort,
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }
}
