use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template field key -> CSV column name.
///
/// A missing key, a `null` and an empty string all mean "unmapped"; the UI
/// sends `""` for the placeholder option of its column pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, Option<String>>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, field: &str, column: &str) -> Self {
        self.0.insert(field.to_string(), Some(column.to_string()));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, column: Option<String>) {
        self.0.insert(field.into(), column);
    }

    /// Column mapped to `field`, if any.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|c| c.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Every field key present in the mapping, mapped or not.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Pairs of (field, column) for mapped fields only.
    pub fn mapped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .keys()
            .filter_map(|k| self.column_for(k).map(|c| (k.as_str(), c)))
    }

    pub fn is_empty(&self) -> bool {
        self.mapped().next().is_none()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ColumnMapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}
