// Loosely-typed input values as they arrive from hand-authored documents

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{FhirConversionError, Result};

/// Reserved key naming the field whose presence gates a conditional value.
pub const IF_PRESENT_KEY: &str = "$if-present";
pub const THEN_KEY: &str = "$then";
pub const ELSE_KEY: &str = "$else";

/// Top-level input document: field name to value, in authored order.
pub type SourceDocument = IndexMap<String, SourceValue>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum SourceValue {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Map(IndexMap<String, SourceValue>),
    List(Vec<SourceValue>),
}

/// `{ $if-present: field, $then: value, $else: value }`
#[derive(Debug, Clone, Copy)]
pub struct ConditionalValue<'a> {
    pub field: &'a str,
    pub then_value: Option<&'a SourceValue>,
    pub else_value: Option<&'a SourceValue>,
}

impl SourceValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SourceValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SourceValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, SourceValue>> {
        match self {
            SourceValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SourceValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Parses the conditional construct when this is a map carrying a
    /// non-empty `$if-present` key.
    pub fn as_conditional(&self) -> Option<ConditionalValue<'_>> {
        let map = self.as_map()?;
        let field = map.get(IF_PRESENT_KEY)?.as_str().filter(|f| !f.is_empty())?;
        Some(ConditionalValue {
            field,
            then_value: map.get(THEN_KEY),
            else_value: map.get(ELSE_KEY).filter(|v| !v.is_null()),
        })
    }

    /// Full ISO-8601 rendering of a timestamp, as `2020-01-01T00:00:00.000Z`.
    pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
        timestamp
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
    }

    /// Default text rendering for values that are not already text.
    pub fn render(&self) -> String {
        match self {
            SourceValue::Null => String::new(),
            SourceValue::Bool(b) => b.to_string(),
            SourceValue::Integer(i) => i.to_string(),
            SourceValue::Decimal(d) => d.to_string(),
            SourceValue::Text(text) => text.clone(),
            SourceValue::Timestamp(ts) => Self::iso_timestamp(ts),
            SourceValue::Map(_) | SourceValue::List(_) => serde_json::Value::from(self).to_string(),
        }
    }
}

impl From<serde_json::Value> for SourceValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SourceValue::Null,
            serde_json::Value::Bool(b) => SourceValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SourceValue::Integer(i),
                None => SourceValue::Decimal(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => SourceValue::Text(s),
            serde_json::Value::Array(items) => {
                SourceValue::List(items.into_iter().map(SourceValue::from).collect())
            }
            serde_json::Value::Object(map) => SourceValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, SourceValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for SourceValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => SourceValue::Null,
            serde_yaml::Value::Bool(b) => SourceValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => SourceValue::Integer(i),
                None => SourceValue::Decimal(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => SourceValue::Text(s),
            serde_yaml::Value::Sequence(items) => {
                SourceValue::List(items.into_iter().map(SourceValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => SourceValue::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), SourceValue::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => SourceValue::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => SourceValue::from(other).render(),
    }
}

impl From<&SourceValue> for serde_json::Value {
    fn from(value: &SourceValue) -> Self {
        match value {
            SourceValue::Null => serde_json::Value::Null,
            SourceValue::Bool(b) => serde_json::Value::Bool(*b),
            SourceValue::Integer(i) => serde_json::Value::from(*i),
            SourceValue::Decimal(d) => serde_json::Number::from_f64(*d)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SourceValue::Text(text) => serde_json::Value::String(text.clone()),
            SourceValue::Timestamp(ts) => serde_json::Value::String(SourceValue::iso_timestamp(ts)),
            SourceValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            SourceValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<&str> for SourceValue {
    fn from(value: &str) -> Self {
        SourceValue::Text(value.to_string())
    }
}

impl From<String> for SourceValue {
    fn from(value: String) -> Self {
        SourceValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SourceValue {
    fn from(value: DateTime<Utc>) -> Self {
        SourceValue::Timestamp(value)
    }
}

/// Builds a [`SourceDocument`] from a JSON object; non-object values yield an
/// empty document.
pub fn document_from_json(value: serde_json::Value) -> SourceDocument {
    match SourceValue::from(value) {
        SourceValue::Map(map) => map,
        _ => SourceDocument::new(),
    }
}

/// Reads every document from a YAML stream. Each stream document is either a
/// mapping or a sequence of mappings; empty documents are skipped.
///
/// YAML timestamps are not distinguished from strings, so unquoted dates
/// arrive as [`SourceValue::Text`].
pub fn documents_from_yaml(yaml: &str) -> Result<Vec<SourceDocument>> {
    let mut documents = Vec::new();
    for stream_document in serde_yaml::Deserializer::from_str(yaml) {
        match SourceValue::from(serde_yaml::Value::deserialize(stream_document)?) {
            SourceValue::Map(document) => documents.push(document),
            SourceValue::List(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        SourceValue::Map(document) => documents.push(document),
                        other => {
                            return Err(FhirConversionError::parse_error(format!(
                                "Document item {index} is not a mapping: {}",
                                other.render()
                            )));
                        }
                    }
                }
            }
            SourceValue::Null => {}
            other => {
                return Err(FhirConversionError::parse_error(format!(
                    "Document is not a mapping: {}",
                    other.render()
                )));
            }
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_order() {
        let value = SourceValue::from(json!({ "b": 1, "a": [true, "x"], "c": 1.5 }));
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(map["c"], SourceValue::Decimal(1.5));
        assert_eq!(
            map["a"],
            SourceValue::List(vec![SourceValue::Bool(true), SourceValue::from("x")])
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("resourceType: Patient\nname: John Doe\nage: 42\n").unwrap();
        let value = SourceValue::from(yaml);
        assert_eq!(value.get("resourceType"), Some(&SourceValue::from("Patient")));
        assert_eq!(value.get("age"), Some(&SourceValue::Integer(42)));
    }

    #[test]
    fn test_conditional_detection() {
        let value = SourceValue::from(json!({
            "$if-present": "deceased",
            "$then": "final",
            "$else": "preliminary"
        }));
        let conditional = value.as_conditional().unwrap();
        assert_eq!(conditional.field, "deceased");
        assert_eq!(conditional.then_value, Some(&SourceValue::from("final")));
        assert_eq!(conditional.else_value, Some(&SourceValue::from("preliminary")));

        assert!(SourceValue::from(json!({ "code": "x" })).as_conditional().is_none());
    }

    #[test]
    fn test_iso_timestamp() {
        let ts = Utc.with_ymd_and_hms(2020, 1, 5, 13, 45, 0).unwrap();
        assert_eq!(SourceValue::iso_timestamp(&ts), "2020-01-05T13:45:00.000Z");
        assert_eq!(SourceValue::from(ts).render(), "2020-01-05T13:45:00.000Z");
    }

    #[test]
    fn test_documents_from_yaml_stream() {
        let documents = documents_from_yaml(
            "resourceType: Patient\n---\n- resourceType: Condition\n- resourceType: Observation\n---\n",
        )
        .unwrap();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[2]["resourceType"], SourceValue::from("Observation"));
    }

    #[test]
    fn test_documents_from_yaml_rejects_non_mapping_items() {
        let err = documents_from_yaml("- resourceType: Patient\n- just text\n").unwrap_err();
        assert!(matches!(err, FhirConversionError::Parse { .. }));
        assert!(err.to_string().contains("item 1"));

        assert!(documents_from_yaml("42\n").is_err());
    }

    #[test]
    fn test_documents_from_yaml_keeps_dates_as_text() {
        let documents = documents_from_yaml("onset: 2015-06-01\n").unwrap();
        assert_eq!(documents[0]["onset"], SourceValue::from("2015-06-01"));
    }
}
