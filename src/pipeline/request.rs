//! Request records flowing through the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::credentials::Principal;

/// Well-known field names.
pub mod fields {
    pub const IDENTIFIER: &str = "identifier";
    pub const SECRET: &str = "secret";
    pub const KIND: &str = "kind";
    pub const SOURCE: &str = "source";
}

/// A scalar request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// An incoming request: input fields plus annotations added by stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    fields: BTreeMap<String, FieldValue>,
    principal: Option<Arc<Principal>>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from the four well-known text fields.
    pub fn order(identifier: &str, secret: &str, kind: &str, source: &str) -> Self {
        Self::new()
            .with(fields::IDENTIFIER, identifier)
            .with(fields::SECRET, secret)
            .with(fields::KIND, kind)
            .with(fields::SOURCE, source)
    }

    pub fn from_fields(fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            fields,
            principal: None,
        }
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text value of a field, `None` when absent or not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Iterate over the input fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Principal resolved by an authentication stage, if any.
    pub fn principal(&self) -> Option<&Arc<Principal>> {
        self.principal.as_ref()
    }

    pub fn annotate_principal(&mut self, principal: Arc<Principal>) {
        self.principal = Some(principal);
    }

    /// Drop everything stages have attached, keeping the input fields.
    pub fn clear_annotations(&mut self) {
        self.principal = None;
    }

    /// Deterministic serialization of the input fields.
    ///
    /// Keys are sorted and annotations are excluded, so logically identical
    /// inputs always produce the same key.
    pub fn canonical_key(&self) -> String {
        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(object).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Role;

    #[test]
    fn test_canonical_key_ignores_insertion_order() {
        let a = Request::new().with("b", "2").with("a", "1").with("n", 7i64);
        let b = Request::new().with("n", 7i64).with("a", "1").with("b", "2");
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(a.canonical_key(), r#"{"a":"1","b":"2","n":7}"#);
    }

    #[test]
    fn test_canonical_key_ignores_annotations() {
        let plain = Request::order("user1", "pass1", "sale", "S3");
        let mut annotated = plain.clone();
        annotated.annotate_principal(Arc::new(Principal::new("user1", "pass1", Role::Customer)));

        assert_eq!(plain.canonical_key(), annotated.canonical_key());
    }

    #[test]
    fn test_text_only_for_strings() {
        let req = Request::new().with("kind", "sale").with("count", 3i64);
        assert_eq!(req.text("kind"), Some("sale"));
        assert_eq!(req.text("count"), None);
        assert_eq!(req.get("count"), Some(&FieldValue::Integer(3)));
        assert_eq!(req.text("missing"), None);
    }

    #[test]
    fn test_field_value_deserialize() {
        let map: BTreeMap<String, FieldValue> =
            serde_json::from_str(r#"{"kind":"sale","qty":2,"gift":true}"#).unwrap();
        assert_eq!(map["kind"], FieldValue::Text("sale".into()));
        assert_eq!(map["qty"], FieldValue::Integer(2));
        assert_eq!(map["gift"], FieldValue::Boolean(true));
    }
}
