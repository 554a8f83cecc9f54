//! Text rendering of graph records for tool output and LLM prompts.

use serde_json::Value;

use crate::graph::Record;

/// A node as returned by the search statements: `labels(n) AS labels, n AS node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub labels: Vec<String>,
    pub properties: serde_json::Map<String, Value>,
}

impl NodeView {
    pub fn from_record(record: &Record) -> Self {
        let labels = record
            .get("labels")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let properties = record
            .get("node")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self { labels, properties }
    }

    pub fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or("Entity")
    }

    pub fn name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unnamed")
    }

    /// `• Label: name` followed by one `  - key: value` line per non-empty
    /// property other than `name`.
    pub fn listing(&self) -> String {
        let mut out = format!("• {}: {}\n", self.primary_label(), self.name());
        let mut entries: Vec<_> = self.properties.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            if key == "name" || is_blank(value) {
                continue;
            }
            out.push_str(&format!("  - {key}: {}\n", display_value(value)));
        }
        out
    }

    /// One-line form used as LLM context: `[Label]: {json properties}`.
    pub fn context_line(&self) -> String {
        format!(
            "[{}]: {}",
            self.labels.join(", "),
            Value::Object(self.properties.clone())
        )
    }
}

/// Null, empty strings and empty collections carry no information.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Strings without quotes, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
