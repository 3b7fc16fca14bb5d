use common::model::layout::PageFormat;
use common::model::template::UnknownTemplate;
use thiserror::Error;

/// Everything that can stop a "Generate" action.
///
/// Row numbers are 1-based data row ordinals (the header is not counted).
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error(transparent)]
    UnknownTemplate(#[from] UnknownTemplate),

    #[error("row {row}: required field '{field}' is unmapped or empty")]
    MissingRequiredField { row: usize, field: String },

    #[error("row {row}: {source}")]
    Render {
        row: usize,
        #[source]
        source: RenderError,
    },

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("could not build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl MergeError {
    /// Stable identifier used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::InvalidCsv(_) => "invalid_csv",
            MergeError::UnknownTemplate(_) => "unknown_template",
            MergeError::MissingRequiredField { .. } => "missing_required_field",
            MergeError::Render { .. } => "render_error",
            MergeError::InvalidMapping(_) => "invalid_mapping",
            MergeError::InvalidRequest(_) => "invalid_request",
            MergeError::Archive(_) => "archive_error",
        }
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            MergeError::MissingRequiredField { row, .. } | MergeError::Render { row, .. } => {
                Some(*row)
            }
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            MergeError::MissingRequiredField { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Failures of the PDF drawing layer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font size must be a positive number of points, got {0}")]
    InvalidFontSize(u32),

    #[error("{lines} lines at {font_size}pt do not fit on one {format:?} page")]
    PageOverflow {
        lines: usize,
        font_size: u32,
        format: PageFormat,
    },

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),
}
