use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Purchase history to recommend from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// Purchased item names, oldest first
    #[schema(example = json!(["scarf", "beanie", "ear muffs"]))]
    pub items: Vec<String>,

    /// How many catalog items to return; the server default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 5, minimum = 1)]
    pub num_items: Option<usize>,
}

/// Category-level item names suggested by the language model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSuggestion {
    pub next_items: Vec<String>,
}

impl GeneralSuggestion {
    /// The suggestions as a JSON array string, the form the index is queried with
    pub fn query_text(&self) -> String {
        serde_json::Value::from(self.next_items.clone()).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_is_json_array() {
        let suggestion = GeneralSuggestion {
            next_items: vec!["winter boots".into(), "gloves".into()],
        };
        assert_eq!(suggestion.query_text(), r#"["winter boots","gloves"]"#);
    }

    #[test]
    fn test_request_num_items_is_optional() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"items": ["scarf"]}"#).unwrap();
        assert_eq!(request.num_items, None);
    }
}
