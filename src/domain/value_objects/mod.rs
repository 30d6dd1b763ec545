//! Value Objects for product comparison

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU64;

/// Catalog product identifier (never zero)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ProductId(NonZeroU64);

impl ProductId {
    pub fn new(value: u64) -> Result<Self, ProductIdError> {
        NonZeroU64::new(value).map(Self).ok_or(ProductIdError::Zero)
    }
    pub fn get(&self) -> u64 { self.0.get() }
}

impl TryFrom<u64> for ProductId {
    type Error = ProductIdError;
    fn try_from(value: u64) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> u64 { id.get() }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductIdError { Zero }
impl std::error::Error for ProductIdError {}
impl fmt::Display for ProductIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "product id must be positive") }
}

/// Ordered attribute label -> value mapping.
///
/// Labels keep the position of their first insertion; re-inserting a label
/// replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap { entries: Vec<(String, String)> }

impl AttributeMap {
    pub fn new() -> Self { Self::default() }

    /// Insert or overwrite; returns the previous value for the label.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => { self.entries.push((label, value)); None }
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, v)| v.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|(l, _)| l.as_str()) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> { self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str())) }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// How a single matrix cell renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Check mark
    Affirmative,
    /// Cross mark
    Negative,
    Text(String),
    /// Explicit "no value" marker
    Absent,
}

impl CellValue {
    pub fn classify(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Absent,
            Some("yes") | Some("1") => Self::Affirmative,
            Some("no") | Some("0") => Self::Negative,
            Some(other) => Self::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_product_id() {
        assert_eq!(ProductId::new(42).unwrap().get(), 42);
        assert_eq!(ProductId::new(0), Err(ProductIdError::Zero));
    }
    #[test]
    fn test_product_id_serde() {
        let ids: Vec<ProductId> = serde_json::from_str("[3,1]").unwrap();
        assert_eq!(ids, vec![ProductId::new(3).unwrap(), ProductId::new(1).unwrap()]);
        assert!(serde_json::from_str::<Vec<ProductId>>("[0]").is_err());
        assert_eq!(serde_json::to_string(&ids).unwrap(), "[3,1]");
    }
    #[test]
    fn test_attribute_map_overwrite_keeps_position() {
        let mut attrs = AttributeMap::new();
        attrs.insert("Warranty", "1 year");
        attrs.insert("Color", "Red");
        assert_eq!(attrs.insert("Warranty", "2 years").as_deref(), Some("1 year"));
        assert_eq!(attrs.labels().collect::<Vec<_>>(), vec!["Warranty", "Color"]);
        assert_eq!(attrs.get("Warranty"), Some("2 years"));
        assert_eq!(serde_json::to_string(&attrs).unwrap(), r#"{"Warranty":"2 years","Color":"Red"}"#);
    }
    #[test]
    fn test_cell_classification() {
        assert_eq!(CellValue::classify(Some("yes")), CellValue::Affirmative);
        assert_eq!(CellValue::classify(Some("1")), CellValue::Affirmative);
        assert_eq!(CellValue::classify(Some("no")), CellValue::Negative);
        assert_eq!(CellValue::classify(Some("0")), CellValue::Negative);
        assert_eq!(CellValue::classify(Some("")), CellValue::Absent);
        assert_eq!(CellValue::classify(None), CellValue::Absent);
        assert_eq!(CellValue::classify(Some("Zigbee")), CellValue::Text("Zigbee".into()));
    }
}
