use crate::model::mapping::ColumnMapping;
use serde::{Deserialize, Serialize};

/// Kind of data a column holds, guessed from its first data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Number,
    Currency,
    Email,
}

/// Inferred schema of a single CSV column, returned by the preview endpoint.
///
/// The UI lists these next to the template fields so the user can see a
/// concrete value before picking a column for a field.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ColumnCheck {
    /// Header cell, trimmed.
    pub title: String,
    pub column_type: ColumnType,
    /// Value of this column in the first data row.
    pub first_row: Option<String>,
}

/// Result of `POST /api/data_sources/csv/preview`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub row_count: usize,
    pub columns: Vec<ColumnCheck>,
    /// Present when the preview was requested for a template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mapping: Option<ColumnMapping>,
}
