use crate::error::MergeError;
use common::model::mapping::ColumnMapping;
use common::model::template::TemplateId;

/// Checks that every mapped field exists in `template` and every mapped
/// column exists in `headers`.
///
/// Required fields left unmapped are not reported here; that surfaces per row
/// as `MissingRequiredField` so the error can name the row.
pub fn validate_mapping(
    template: TemplateId,
    mapping: &ColumnMapping,
    headers: &[String],
) -> Result<(), MergeError> {
    for field in mapping.fields() {
        if template.field(field).is_none() {
            return Err(MergeError::InvalidMapping(format!(
                "template '{}' has no field '{}'",
                template, field
            )));
        }
    }
    for (field, column) in mapping.mapped() {
        if !headers.iter().any(|h| h == column) {
            return Err(MergeError::InvalidMapping(format!(
                "field '{}' is mapped to column '{}', which is not in the CSV header",
                field, column
            )));
        }
    }
    Ok(())
}

/// Lower case, with runs of spaces, hyphens and dots folded into `_`.
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '.' || c == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Proposes a mapping by matching normalized header names against each
/// field's key and label. The first matching header wins.
pub fn suggest_mapping(template: TemplateId, headers: &[String]) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
    let mut mapping = ColumnMapping::new();
    for field in template.fields() {
        let label = normalize(field.label);
        let column = normalized
            .iter()
            .position(|h| h == field.key || *h == label)
            .map(|i| headers[i].clone());
        mapping.insert(field.key, column);
    }
    mapping
}
