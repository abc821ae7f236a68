//! # Size Sets
//!
//! The catalog stores a product's sizes as encoded text. This module is the
//! deserialize-validate boundary: once text becomes a [`SizeSet`], the rest
//! of the system only sees an ordered, duplicate-free list of labels.
//!
//! ## Accepted Encodings
//! ```text
//! ["40","41","42"]     JSON array of strings
//! [40, 41, 42.5]       JSON array of numbers
//! 40,41,42             comma separated
//! ```
//!
//! Stored form is always the JSON array of strings produced by
//! [`SizeSet::encode`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_size_label, ValidationResult};

/// Ordered set of size labels declared for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
#[ts(export)]
pub struct SizeSet(Vec<String>);

impl SizeSet {
    /// Builds a set from labels, keeping the given order.
    pub fn from_labels<I, S>(labels: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sizes: Vec<String> = Vec::new();

        for label in labels {
            let label = label.as_ref().trim();
            validate_size_label(label)?;

            if sizes.iter().any(|s| s == label) {
                return Err(ValidationError::Duplicate {
                    field: "size".to_string(),
                    value: label.to_string(),
                });
            }
            sizes.push(label.to_string());
        }

        if sizes.is_empty() {
            return Err(ValidationError::Required {
                field: "sizes".to_string(),
            });
        }

        Ok(SizeSet(sizes))
    }

    /// Parses the catalog's encoded size text.
    ///
    /// ```rust
    /// use shoebox_core::sizes::SizeSet;
    ///
    /// let sizes = SizeSet::parse(r#"["40","41","42"]"#).unwrap();
    /// assert!(sizes.contains("41"));
    ///
    /// let sizes = SizeSet::parse("40, 41 ,42").unwrap();
    /// assert_eq!(sizes.len(), 3);
    /// ```
    pub fn parse(encoded: &str) -> ValidationResult<Self> {
        let encoded = encoded.trim();

        if encoded.starts_with('[') {
            let values: Vec<serde_json::Value> =
                serde_json::from_str(encoded).map_err(|e| ValidationError::InvalidFormat {
                    field: "sizes".to_string(),
                    reason: e.to_string(),
                })?;

            let labels = values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => Ok(s),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    other => Err(ValidationError::InvalidFormat {
                        field: "sizes".to_string(),
                        reason: format!("unsupported size value {}", other),
                    }),
                })
                .collect::<ValidationResult<Vec<String>>>()?;

            return SizeSet::from_labels(labels);
        }

        SizeSet::from_labels(encoded.split(',').filter(|s| !s.trim().is_empty()))
    }

    /// Encodes the set for storage as a JSON array of strings.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, size: &str) -> bool {
        self.0.iter().any(|s| s == size.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for SizeSet {
    type Error = ValidationError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        SizeSet::from_labels(labels)
    }
}

impl From<SizeSet> for Vec<String> {
    fn from(sizes: SizeSet) -> Self {
        sizes.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_strings_keeps_order() {
        let sizes = SizeSet::parse(r#"["42","40","41"]"#).unwrap();
        assert_eq!(sizes.iter().collect::<Vec<_>>(), vec!["42", "40", "41"]);
    }

    #[test]
    fn test_parse_json_numbers() {
        let sizes = SizeSet::parse("[40, 41, 42.5]").unwrap();
        assert!(sizes.contains("42.5"));
        assert!(sizes.contains("40"));
    }

    #[test]
    fn test_parse_comma_separated() {
        let sizes = SizeSet::parse(" 38, 39,40 ,").unwrap();
        assert_eq!(sizes.len(), 3);
        assert!(sizes.contains(" 39 "));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            SizeSet::parse(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            SizeSet::parse("40,41,40"),
            Err(ValidationError::Duplicate { .. })
        ));
        assert!(matches!(
            SizeSet::parse("[40, true]"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            SizeSet::parse("[40,"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_encode_parse_identity() {
        let sizes = SizeSet::from_labels(["40", "41"]).unwrap();
        assert_eq!(sizes.encode(), r#"["40","41"]"#);
        assert_eq!(SizeSet::parse(&sizes.encode()).unwrap(), sizes);
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let ok: Result<SizeSet, _> = serde_json::from_str(r#"["40","41"]"#);
        assert!(ok.is_ok());

        let dup: Result<SizeSet, _> = serde_json::from_str(r#"["40","40"]"#);
        assert!(dup.is_err());
    }
}
