//! Segment payloads as returned by the data source.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected shape of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// JSON array or object of items.
    #[default]
    Json,
    /// Pre-rendered HTML fragment.
    Html,
}

/// One segment's worth of content, decoded per the configured [`PayloadKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum Payload {
    Json(Value),
    Html(String),
}

impl Payload {
    /// Number of renderable items, when the shape makes that countable.
    ///
    /// JSON arrays count their elements; a JSON object or an HTML fragment
    /// counts as a single item when non-empty.
    pub fn len(&self) -> usize {
        match self {
            Payload::Json(Value::Array(items)) => items.len(),
            Payload::Json(Value::Null) => 0,
            Payload::Json(Value::Object(map)) => usize::from(!map.is_empty()),
            Payload::Json(Value::String(s)) => usize::from(!s.trim().is_empty()),
            Payload::Json(_) => 1,
            Payload::Html(s) => usize::from(!s.trim().is_empty()),
        }
    }

    /// True when the payload carries nothing to render.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_array_len_counts_items() {
        let payload = Payload::Json(json!([1, 2, 3]));
        assert_eq!(payload.len(), 3);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_empty_shapes_are_empty() {
        assert!(Payload::Json(json!([])).is_empty());
        assert!(Payload::Json(Value::Null).is_empty());
        assert!(Payload::Json(json!({})).is_empty());
        assert!(Payload::Html(String::new()).is_empty());
        assert!(Payload::Html("  \n ".to_string()).is_empty());
    }

    #[test]
    fn test_html_fragment_is_single_item() {
        let payload = Payload::Html("<li>one</li>".to_string());
        assert_eq!(payload.len(), 1);
    }
}
