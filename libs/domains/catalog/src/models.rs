use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// A product row as stored, after the table assigned its identity key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "product")]
    pub name: String,
    pub category: String,
    pub description: String,
    /// Name and description concatenated; the column the index embeds
    pub text: String,
}

/// One dataset row before insertion.
///
/// `text` may be missing from the source, in which case it is derived from
/// the name and description by [`CatalogRecord::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl CatalogRecord {
    pub fn new(
        product: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            category: category.into(),
            description: description.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Fill in a missing `text` and reject rows with nothing to embed
    pub fn normalize(mut self) -> CatalogResult<Self> {
        let text = self
            .text
            .take()
            .unwrap_or_else(|| format!("{}: {}", self.product, self.description));

        if text.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "product '{}' has no searchable text",
                self.product
            )));
        }

        self.text = Some(text);
        Ok(self)
    }

    /// Searchable text; empty until [`normalize`](Self::normalize) has run on a row without one
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Result of loading a dataset into the product table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_appended: u64,
    pub batches: usize,
    pub table_rows: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_text_is_derived() {
        let record = CatalogRecord::new("Trail Boot", "Footwear", "Waterproof leather boot")
            .normalize()
            .unwrap();
        assert_eq!(record.text(), "Trail Boot: Waterproof leather boot");
    }

    #[test]
    fn test_explicit_text_is_kept() {
        let record = CatalogRecord::new("Scarf", "Accessories", "Wool")
            .with_text("Scarf, warm wool")
            .normalize()
            .unwrap();
        assert_eq!(record.text(), "Scarf, warm wool");
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let err = CatalogRecord::new("Scarf", "Accessories", "Wool")
            .with_text("   ")
            .normalize()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let record: CatalogRecord = serde_json::from_str(r#"{"product": "Lamp"}"#).unwrap();
        assert_eq!(record.category, "");
        assert!(record.text.is_none());
    }
}
