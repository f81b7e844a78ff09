//! Scalar serialize/parse functions.
//!
//! A schema document only names its scalars; the functions that turn native
//! values into wire values and back live here, keyed by scalar name in a
//! [`ScalarRegistry`]. The built-in GraphQL scalars are always registered.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A value was not acceptable to a scalar codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ScalarError(pub String);

impl ScalarError {
    fn expected(scalar: &str, value: &impl fmt::Display) -> Self {
        Self(format!("{scalar} cannot represent {value}"))
    }
}

/// Serialize and parse functions for one scalar type.
pub trait ScalarCodec: fmt::Debug + Send + Sync {
    /// Native value -> wire (JSON-shaped) value.
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError>;

    /// Wire value from a response -> native value.
    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError>;
}

#[derive(Debug, Clone, Copy)]
pub struct IntScalar;

impl ScalarCodec for IntScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        match value {
            Value::Int(i) if i32::try_from(*i).is_ok() => Ok((*i).into()),
            Value::Int(i) => Err(ScalarError(format!(
                "Int cannot represent non 32-bit signed integer value: {i}"
            ))),
            other => Err(ScalarError::expected("Int", other)),
        }
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        value
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| ScalarError::expected("Int", value))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FloatScalar;

impl ScalarCodec for FloatScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        let number = match value {
            Value::Float(x) => serde_json::Number::from_f64(*x),
            Value::Int(i) => Some(serde_json::Number::from(*i)),
            _ => None,
        };
        number
            .map(serde_json::Value::Number)
            .ok_or_else(|| ScalarError::expected("Float", value))
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        value
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| ScalarError::expected("Float", value))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StringScalar;

impl ScalarCodec for StringScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        match value {
            Value::String(s) => Ok(s.clone().into()),
            other => Err(ScalarError::expected("String", other)),
        }
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        value
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| ScalarError::expected("String", value))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BooleanScalar;

impl ScalarCodec for BooleanScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        match value {
            Value::Boolean(b) => Ok((*b).into()),
            other => Err(ScalarError::expected("Boolean", other)),
        }
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        value
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| ScalarError::expected("Boolean", value))
    }
}

/// `ID` accepts strings and integers, and always travels as a string.
#[derive(Debug, Clone, Copy)]
pub struct IdScalar;

impl ScalarCodec for IdScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        match value {
            Value::String(s) => Ok(s.clone().into()),
            Value::Int(i) => Ok(i.to_string().into()),
            other => Err(ScalarError::expected("ID", other)),
        }
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        match value {
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Number(n) if n.is_i64() => Ok(Value::String(n.to_string())),
            other => Err(ScalarError::expected("ID", other)),
        }
    }
}

/// Date-time scalar carried as an ISO 8601 string.
///
/// Serializes to RFC 3339. Parsing accepts RFC 3339, naive date-times and bare
/// dates; the latter two are read as UTC.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeScalar;

impl DateTimeScalar {
    fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt);
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc().fixed_offset());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

impl ScalarCodec for DateTimeScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        match value {
            Value::DateTime(dt) => Ok(dt.to_rfc3339().into()),
            Value::String(s) if Self::parse(s).is_some() => Ok(s.clone().into()),
            other => Err(ScalarError(format!(
                "Received not compatible datetime {other}"
            ))),
        }
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        value
            .as_str()
            .and_then(Self::parse)
            .map(Value::DateTime)
            .ok_or_else(|| ScalarError::expected("DateTime", value))
    }
}

/// Pass-through for custom scalars without a registered codec.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueScalar;

impl ScalarCodec for OpaqueScalar {
    fn serialize(&self, value: &Value) -> Result<serde_json::Value, ScalarError> {
        serde_json::to_value(value).map_err(|e| ScalarError(e.to_string()))
    }

    fn parse_value(&self, value: &serde_json::Value) -> Result<Value, ScalarError> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            other => Value::Json(other.clone()),
        })
    }
}

/// Scalar codecs by scalar name.
#[derive(Debug, Clone)]
pub struct ScalarRegistry {
    codecs: HashMap<String, Arc<dyn ScalarCodec>>,
    fallback: Arc<dyn ScalarCodec>,
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarRegistry {
    /// A registry holding the five built-in GraphQL scalars.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            codecs: HashMap::new(),
            fallback: Arc::new(OpaqueScalar),
        };
        registry.insert("Int", IntScalar);
        registry.insert("Float", FloatScalar);
        registry.insert("String", StringScalar);
        registry.insert("Boolean", BooleanScalar);
        registry.insert("ID", IdScalar);
        registry
    }

    /// Register (or replace) the codec for a scalar name.
    pub fn insert(&mut self, name: impl Into<String>, codec: impl ScalarCodec + 'static) {
        self.codecs.insert(name.into(), Arc::new(codec));
    }

    /// Whether a codec was registered for this exact name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// The codec for a scalar, falling back to [`OpaqueScalar`].
    #[must_use]
    pub fn get(&self, name: &str) -> &dyn ScalarCodec {
        self.codecs.get(name).unwrap_or(&self.fallback).as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_int_range() {
        assert_eq!(IntScalar.serialize(&Value::Int(42)).unwrap(), json!(42));
        assert!(IntScalar.serialize(&Value::Int(1 << 40)).is_err());
        assert!(IntScalar.serialize(&Value::from("42")).is_err());
    }

    #[test]
    fn test_float_accepts_ints() {
        assert_eq!(FloatScalar.serialize(&Value::Int(2)).unwrap(), json!(2));
        assert_eq!(FloatScalar.serialize(&Value::Float(0.5)).unwrap(), json!(0.5));
        assert!(FloatScalar.serialize(&Value::Float(f64::NAN)).is_err());
        assert_eq!(FloatScalar.parse_value(&json!(3)).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_id_travels_as_string() {
        assert_eq!(IdScalar.serialize(&Value::Int(1000)).unwrap(), json!("1000"));
        assert_eq!(
            IdScalar.parse_value(&json!(1000)).unwrap(),
            Value::String("1000".into())
        );
    }

    #[test]
    fn test_datetime_round_trip() {
        let birthday = Utc.with_ymd_and_hms(1988, 11, 7, 0, 0, 0).unwrap();
        let wire = DateTimeScalar.serialize(&Value::from(birthday)).unwrap();
        assert_eq!(wire, json!("1988-11-07T00:00:00+00:00"));

        let parsed = DateTimeScalar.parse_value(&wire).unwrap();
        assert_eq!(parsed, Value::from(birthday));
    }

    #[test]
    fn test_datetime_lenient_parsing() {
        let midnight = Utc.with_ymd_and_hms(1988, 11, 7, 0, 0, 0).unwrap();
        assert_eq!(
            DateTimeScalar.parse_value(&json!("1988-11-07")).unwrap(),
            Value::from(midnight)
        );
        assert_eq!(
            DateTimeScalar.parse_value(&json!("1988-11-07T00:00:00")).unwrap(),
            Value::from(midnight)
        );
        assert!(DateTimeScalar.parse_value(&json!("yesterday")).is_err());
        assert!(DateTimeScalar.serialize(&Value::Int(3)).is_err());
    }

    #[test]
    fn test_registry_fallback() {
        let registry = ScalarRegistry::new();
        assert!(registry.contains("ID"));
        assert!(!registry.contains("Url"));

        let codec = registry.get("Url");
        assert_eq!(
            codec.parse_value(&json!({"href": "x"})).unwrap(),
            Value::Json(json!({"href": "x"}))
        );
        assert_eq!(codec.serialize(&Value::from("x")).unwrap(), json!("x"));
    }
}
