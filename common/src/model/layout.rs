use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

impl PageFormat {
    /// Page size in PDF points (1/72 inch), width then height.
    pub fn size_pt(self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (595.0, 842.0),
            PageFormat::Letter => (612.0, 792.0),
        }
    }
}

/// What is printed before the colon on each line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// The field key, e.g. `client_name: ACME`.
    #[default]
    Key,
    /// The human label, e.g. `Client Name: ACME`.
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub font_size: u32,
    pub page_format: PageFormat,
    pub label_style: LabelStyle,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            font_size: DEFAULT_FONT_SIZE,
            page_format: PageFormat::default(),
            label_style: LabelStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let layout: LayoutOptions = serde_json::from_str(r#"{"page_format":"Letter"}"#).unwrap();
        assert_eq!(layout.font_size, 12);
        assert_eq!(layout.page_format, PageFormat::Letter);
        assert_eq!(layout.label_style, LabelStyle::Key);
    }

    #[test]
    fn page_sizes() {
        assert_eq!(PageFormat::A4.size_pt(), (595.0, 842.0));
        assert_eq!(PageFormat::Letter.size_pt(), (612.0, 792.0));
    }
}
