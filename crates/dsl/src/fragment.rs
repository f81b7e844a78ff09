//! Result objects shaped like the selection tree that produced them.

use crate::error::SchemaLookupError;
use crate::value::Value;
use apollo_compiler::collections::IndexMap;
use chrono::{DateTime, FixedOffset};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::sync::Arc;

/// An inflated response value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// A leaf field (scalar or enum), or `null` for any field.
    Leaf(Value),
    /// A list of composite values.
    List(Vec<ResultValue>),
    /// A composite value.
    Fragment(ResultFragment),
}

impl ResultValue {
    pub(crate) const NULL: Self = Self::Leaf(Value::Null);

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Leaf(Value::Null))
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_fragment(&self) -> Option<&ResultFragment> {
        match self {
            Self::Fragment(fragment) => Some(fragment),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ResultValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_leaf().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_leaf().and_then(Value::as_i64)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_leaf().and_then(Value::as_f64)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_leaf().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        self.as_leaf().and_then(Value::as_datetime)
    }

    /// The member name if this is an enum value.
    #[must_use]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Leaf(Value::Enum(name)) => Some(name),
            _ => None,
        }
    }

    /// Read a field of a composite value by accessor name.
    ///
    /// Returns `None` for leaves, lists and unknown accessors, so lookups can
    /// be chained: `result.get("hero").and_then(|h| h.get("name"))`.
    #[must_use]
    pub fn get(&self, accessor: &str) -> Option<&ResultValue> {
        self.as_fragment().and_then(|fragment| fragment.get(accessor))
    }
}

impl From<ResultFragment> for ResultValue {
    fn from(fragment: ResultFragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// An immutable, ordered record of accessor name to inflated value.
///
/// Each fragment is tagged with the schema type it came from: the response's
/// `__typename` when the query asked for it, otherwise the declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFragment {
    type_name: Arc<str>,
    fields: Arc<IndexMap<String, ResultValue>>,
}

impl ResultFragment {
    pub(crate) fn new(type_name: impl Into<Arc<str>>, fields: IndexMap<String, ResultValue>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Arc::new(fields),
        }
    }

    /// The schema type name of this record.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn get(&self, accessor: &str) -> Option<&ResultValue> {
        self.fields.get(accessor)
    }

    /// Like [`ResultFragment::get`], but reports unknown accessors as errors.
    pub fn field(&self, accessor: &str) -> Result<&ResultValue, SchemaLookupError> {
        self.fields
            .get(accessor)
            .ok_or_else(|| SchemaLookupError::UnknownField {
                type_name: self.type_name.to_string(),
                field: accessor.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, accessor: &str) -> bool {
        self.fields.contains_key(accessor)
    }

    /// Accessor names in selection order.
    pub fn accessors(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(value) => value.serialize(serializer),
            Self::Fragment(fragment) => fragment.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Serializes as a JSON object keyed by accessor name.
impl Serialize for ResultFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (accessor, value) in self.fields.iter() {
            map.serialize_entry(accessor, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hero() -> ResultFragment {
        let mut fields = IndexMap::default();
        fields.insert("name".to_string(), ResultValue::Leaf(Value::from("R2-D2")));
        fields.insert(
            "appears_in".to_string(),
            ResultValue::Leaf(Value::List(vec![Value::enum_value("JEDI")])),
        );
        ResultFragment::new("Droid", fields)
    }

    #[test]
    fn test_lookup() {
        let hero = hero();
        assert_eq!(hero.type_name(), "Droid");
        assert_eq!(hero.get("name").and_then(ResultValue::as_str), Some("R2-D2"));
        assert!(hero.get("appearsIn").is_none());
        assert!(hero.field("missing").is_err());
        assert_eq!(hero.accessors().collect::<Vec<_>>(), ["name", "appears_in"]);
    }

    #[test]
    fn test_chained_get() {
        let mut root = IndexMap::default();
        root.insert("hero".to_string(), ResultValue::from(hero()));
        let root = ResultValue::from(ResultFragment::new("Query", root));

        assert_eq!(
            root.get("hero").and_then(|h| h.get("name")).and_then(ResultValue::as_str),
            Some("R2-D2")
        );
        assert!(root.get("hero").and_then(|h| h.get("name")).and_then(|n| n.get("x")).is_none());
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_value(hero()).unwrap(),
            json!({"name": "R2-D2", "appears_in": ["JEDI"]})
        );
    }
}
