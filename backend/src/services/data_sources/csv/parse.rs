//! CSV parsing into [`DataRow`]s, plus the column inference used by the preview.

use crate::error::MergeError;
use common::model::csv::{ColumnCheck, ColumnType};
use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
/// One `@`, a dot in the domain, no whitespace.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// One data row: column name -> cell value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRow {
    cells: IndexMap<String, String>,
}

impl DataRow {
    /// Cell of `column`, `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        DataRow {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parsed upload: validated header plus every data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<DataRow>,
}

/// Picks the most frequent of `, ; \t |` in the header line, `,` on a tie with zero.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for d in DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == d).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

/// Validate each header cell: non-empty and unique.
fn validate_header_cells(headers: &[String]) -> Result<(), MergeError> {
    let mut seen = HashSet::new();
    for (i, cell) in headers.iter().enumerate() {
        if cell.is_empty() {
            return Err(MergeError::InvalidCsv(format!(
                "header cell {} is empty",
                i + 1
            )));
        }
        if !seen.insert(cell.as_str()) {
            return Err(MergeError::InvalidCsv(format!(
                "header cell '{}' appears more than once",
                cell
            )));
        }
    }
    Ok(())
}

fn csv_error(err: csv::Error) -> MergeError {
    let message = match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            format!(
                "line {}: expected {} fields, found {}",
                line, expected_len, len
            )
        }
        _ => err.to_string(),
    };
    MergeError::InvalidCsv(message)
}

fn to_row(headers: &[String], record: &StringRecord) -> DataRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.as_str(), v))
        .collect()
}

/// Parses an uploaded CSV. The first line is the header.
///
/// Fails with `InvalidCsv` on an empty file, a bad header, rows whose column
/// count differs from the header, or a file with no data rows.
pub fn parse_csv(bytes: &[u8]) -> Result<CsvTable, MergeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|_| MergeError::InvalidCsv("the file is not valid UTF-8".to_string()))?;
    if text.trim().is_empty() {
        return Err(MergeError::InvalidCsv("the file is empty".to_string()));
    }

    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    validate_header_cells(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(to_row(&headers, &record));
    }

    if rows.is_empty() {
        return Err(MergeError::InvalidCsv(
            "the file has a header but no data rows".to_string(),
        ));
    }

    Ok(CsvTable { headers, rows })
}

fn infer_column_type(value: &str, email_re: &Regex) -> ColumnType {
    let currency_symbols = ['$', '€', '£', '¥'];
    if email_re.is_match(value) {
        ColumnType::Email
    } else if value.chars().any(|ch| currency_symbols.contains(&ch)) {
        ColumnType::Currency
    } else if !value.is_empty() && value.parse::<f64>().is_ok() {
        ColumnType::Number
    } else {
        ColumnType::Text
    }
}

/// Guesses each column's type from the first data row.
pub fn infer_column_checks(table: &CsvTable) -> Result<Vec<ColumnCheck>, MergeError> {
    let email_re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| MergeError::InvalidCsv(format!("Regex error: {}", e)))?;
    let first = table.rows.first();
    let checks = table
        .headers
        .iter()
        .map(|title| {
            let sample = first.and_then(|row| row.get(title));
            ColumnCheck {
                title: title.clone(),
                column_type: sample
                    .map(|v| infer_column_type(v, &email_re))
                    .unwrap_or(ColumnType::Text),
                first_row: sample.map(str::to_string),
            }
        })
        .collect();
    Ok(checks)
}
