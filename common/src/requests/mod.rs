use crate::model::layout::LayoutOptions;
use crate::model::mapping::ColumnMapping;
use serde::{Deserialize, Serialize};

/// What to do when a single row cannot be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Fail the whole batch on the first bad row.
    #[default]
    Abort,
    /// Leave bad rows out and report them next to the output.
    Skip,
}

/// `json` part of `POST /api/merge/generate`; the CSV travels in the `file` part.
///
/// `template_id` is kept as a string so an unknown id is reported as such
/// instead of as a malformed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub template_id: String,
    #[serde(default)]
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub layout: LayoutOptions,
    #[serde(default)]
    pub on_row_error: RowErrorPolicy,
}

/// Query string of the CSV preview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewQuery {
    pub template_id: Option<String>,
}
