use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A Firestore document in REST form. Field values stay as typed JSON
/// (`{"integerValue": "3"}`, `{"stringValue": "x"}`) and are read through the
/// helpers below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Integer field value. Doubles written by other clients are truncated;
    /// negative or missing values read as zero.
    pub fn integer(&self, field: &str) -> u64 {
        let Some(value) = self.fields.get(field) else {
            return 0;
        };
        if let Some(raw) = value.get("integerValue") {
            return match raw {
                Value::String(text) => text.parse::<i64>().unwrap_or(0).max(0) as u64,
                Value::Number(number) => number.as_i64().unwrap_or(0).max(0) as u64,
                _ => 0,
            };
        }
        value
            .get("doubleValue")
            .and_then(Value::as_f64)
            .filter(|number| number.is_finite() && *number > 0.0)
            .map(|number| number as u64)
            .unwrap_or(0)
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.get("stringValue")?.as_str()
    }

    /// Accepts both native timestamps and RFC 3339 strings.
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.fields.get(field)?;
        let raw = value
            .get("timestampValue")
            .or_else(|| value.get("stringValue"))?
            .as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

pub fn integer_value(value: u64) -> Value {
    json!({ "integerValue": value.to_string() })
}

pub fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

pub fn optional_string_value(value: Option<&str>) -> Value {
    match value {
        Some(text) => string_value(text),
        None => json!({ "nullValue": null }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fields: Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/bookViews/abc",
            "fields": fields,
        }))
        .unwrap()
    }

    #[test]
    fn reads_integer_encodings() {
        let d = doc(json!({
            "a": {"integerValue": "42"},
            "b": {"doubleValue": 3.0},
            "c": {"integerValue": "-4"},
            "d": {"stringValue": "7"}
        }));
        assert_eq!(d.id(), "abc");
        assert_eq!(d.integer("a"), 42);
        assert_eq!(d.integer("b"), 3);
        assert_eq!(d.integer("c"), 0);
        assert_eq!(d.integer("d"), 0);
        assert_eq!(d.integer("missing"), 0);
    }

    #[test]
    fn reads_string_and_timestamp() {
        let d = doc(json!({
            "text": {"stringValue": "hello"},
            "iso": {"stringValue": "2024-05-01T10:00:00.000Z"},
            "native": {"timestampValue": "2024-05-01T10:00:01Z"},
            "parentId": {"nullValue": null}
        }));
        assert_eq!(d.string("text"), Some("hello"));
        assert_eq!(d.string("parentId"), None);
        assert!(d.timestamp("iso").unwrap() < d.timestamp("native").unwrap());
    }

    #[test]
    fn encodes_values() {
        assert_eq!(integer_value(5), json!({"integerValue": "5"}));
        assert_eq!(optional_string_value(None), json!({"nullValue": null}));
    }
}
