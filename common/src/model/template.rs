use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One field of a document template.
///
/// `key` is what a column mapping refers to, `label` is what the UI shows
/// next to the column picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        required,
    }
}

const SIMPLE_FIELDS: &[FieldSpec] = &[
    field("name", "Name", true),
    field("email", "Email", false),
    field("phone", "Phone", false),
    field("address", "Address", false),
    field("notes", "Notes", false),
];

const INVOICE_FIELDS: &[FieldSpec] = &[
    field("invoice_number", "Invoice Number", true),
    field("client_name", "Client Name", true),
    field("client_address", "Client Address", false),
    field("date", "Date", true),
    field("amount", "Amount", true),
    field("description", "Description", false),
];

const CERTIFICATE_FIELDS: &[FieldSpec] = &[
    field("recipient_name", "Recipient Name", true),
    field("achievement", "Achievement", true),
    field("completion_date", "Completion Date", true),
    field("instructor", "Instructor", false),
    field("grade", "Grade", false),
];

const REPORT_FIELDS: &[FieldSpec] = &[
    field("title", "Title", true),
    field("author", "Author", true),
    field("date", "Date", true),
    field("executive_summary", "Executive Summary", false),
    field("key_metrics", "Key Metrics", false),
];

/// The fixed template catalogue. Adding a template means adding a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Simple,
    Invoice,
    Certificate,
    Report,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Simple,
        TemplateId::Invoice,
        TemplateId::Certificate,
        TemplateId::Report,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Simple => "simple",
            TemplateId::Invoice => "invoice",
            TemplateId::Certificate => "certificate",
            TemplateId::Report => "report",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TemplateId::Simple => "Simple",
            TemplateId::Invoice => "Invoice",
            TemplateId::Certificate => "Certificate",
            TemplateId::Report => "Report",
        }
    }

    /// Ordered field list of the template.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            TemplateId::Simple => SIMPLE_FIELDS,
            TemplateId::Invoice => INVOICE_FIELDS,
            TemplateId::Certificate => CERTIFICATE_FIELDS,
            TemplateId::Report => REPORT_FIELDS,
        }
    }

    /// Field whose value names the generated file of a row.
    pub fn name_field(self) -> &'static str {
        match self {
            TemplateId::Simple => "name",
            TemplateId::Invoice => "invoice_number",
            TemplateId::Certificate => "recipient_name",
            TemplateId::Report => "title",
        }
    }

    pub fn field(self, key: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.key == key)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a template identifier is not part of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl std::error::Error for UnknownTemplate {}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

/// Catalogue entry as sent to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDefinition {
    pub id: TemplateId,
    pub title: &'static str,
    pub name_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl From<TemplateId> for TemplateDefinition {
    fn from(id: TemplateId) -> Self {
        TemplateDefinition {
            id,
            title: id.title(),
            name_field: id.name_field(),
            fields: id.fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn keys(id: TemplateId) -> Vec<(&'static str, bool)> {
        id.fields().iter().map(|f| (f.key, f.required)).collect()
    }

    #[test]
    fn catalogue_matches_published_field_lists() {
        assert_eq!(
            keys(TemplateId::Simple),
            vec![
                ("name", true),
                ("email", false),
                ("phone", false),
                ("address", false),
                ("notes", false),
            ]
        );
        assert_eq!(
            keys(TemplateId::Invoice),
            vec![
                ("invoice_number", true),
                ("client_name", true),
                ("client_address", false),
                ("date", true),
                ("amount", true),
                ("description", false),
            ]
        );
        assert_eq!(
            keys(TemplateId::Certificate),
            vec![
                ("recipient_name", true),
                ("achievement", true),
                ("completion_date", true),
                ("instructor", false),
                ("grade", false),
            ]
        );
        assert_eq!(
            keys(TemplateId::Report),
            vec![
                ("title", true),
                ("author", true),
                ("date", true),
                ("executive_summary", false),
                ("key_metrics", false),
            ]
        );
    }

    #[test]
    fn keys_are_unique_and_labels_present() {
        for id in TemplateId::ALL {
            let mut seen = HashSet::new();
            for f in id.fields() {
                assert!(seen.insert(f.key), "duplicate key {} in {}", f.key, id);
                assert!(!f.label.is_empty());
            }
            assert!(id.field(id.name_field()).is_some_and(|f| f.required));
        }
    }

    #[test]
    fn parses_identifiers() {
        for id in TemplateId::ALL {
            assert_eq!(id.as_str().parse::<TemplateId>(), Ok(id));
        }
        assert_eq!(
            "receipt".parse::<TemplateId>(),
            Err(UnknownTemplate("receipt".to_string()))
        );
        assert!("Invoice".parse::<TemplateId>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TemplateId::Certificate).unwrap();
        assert_eq!(json, "\"certificate\"");
        let back: TemplateId = serde_json::from_str("\"report\"").unwrap();
        assert_eq!(back, TemplateId::Report);
    }
}
