//! Canonical JSON serialization for document values.
//!
//! Result payloads travel as JSON, which has no identifier, date or
//! non-finite float. Those values use single-key wrapper objects:
//!
//! | Type | JSON Representation |
//! |------|---------------------|
//! | Identifier | `{"$oid": "<24 hex>"}` |
//! | Date | `{"$date": "<rfc3339>"}` |
//! | NaN | `{"$f64": "NaN"}` |
//! | +Infinity | `{"$f64": "+Inf"}` |
//! | -Infinity | `{"$f64": "-Inf"}` |
//!
//! Integral floats serialize as JSON numbers with a fraction (`1.0`), so a
//! round trip through JSON keeps `Int` and `Float` apart.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::codec::{format_date, parse_date};
use crate::object_id::ObjectId;
use crate::value::{Document, DocumentValue};

impl Serialize for DocumentValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        json_to_value(&json).map_err(de::Error::custom)
    }
}

/// Convert a value to a JSON value with wrapper encodings.
pub fn value_to_json(value: &DocumentValue) -> JsonValue {
    match value {
        DocumentValue::Null => JsonValue::Null,
        DocumentValue::Bool(b) => JsonValue::Bool(*b),
        DocumentValue::Int(i) => JsonValue::Number((*i).into()),
        DocumentValue::Float(f) => float_to_json(*f),
        DocumentValue::Str(s) => JsonValue::String(s.clone()),
        DocumentValue::Identifier(id) => serde_json::json!({ "$oid": id.to_hex() }),
        DocumentValue::Date(d) => serde_json::json!({ "$date": format_date(d) }),
        DocumentValue::Array(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        DocumentValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON value to a document value, recognizing wrapper encodings.
pub fn json_to_value(json: &JsonValue) -> Result<DocumentValue, String> {
    match json {
        JsonValue::Null => Ok(DocumentValue::Null),
        JsonValue::Bool(b) => Ok(DocumentValue::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(DocumentValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(DocumentValue::Float(f))
            } else {
                Err(format!("Invalid number: {}", n))
            }
        }
        JsonValue::String(s) => Ok(DocumentValue::Str(s.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentValue::Array),
        JsonValue::Object(obj) => {
            if obj.len() == 1 {
                if let Some(JsonValue::String(hex)) = obj.get("$oid") {
                    return ObjectId::parse_hex(hex)
                        .map(DocumentValue::Identifier)
                        .map_err(|e| format!("Invalid $oid: {}", e));
                }
                if let Some(JsonValue::String(date)) = obj.get("$date") {
                    return parse_date(date)
                        .map(DocumentValue::Date)
                        .ok_or_else(|| format!("Invalid $date: {}", date));
                }
                if let Some(JsonValue::String(special)) = obj.get("$f64") {
                    return special_float_from_str(special).map(DocumentValue::Float);
                }
            }
            obj.iter()
                .map(|(k, v)| json_to_value(v).map(|val| (k.clone(), val)))
                .collect::<Result<Document, _>>()
                .map(DocumentValue::Object)
        }
    }
}

fn float_to_json(f: f64) -> JsonValue {
    if f.is_nan() {
        serde_json::json!({"$f64": "NaN"})
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            serde_json::json!({"$f64": "+Inf"})
        } else {
            serde_json::json!({"$f64": "-Inf"})
        }
    } else {
        serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

fn special_float_from_str(s: &str) -> Result<f64, String> {
    match s {
        "NaN" => Ok(f64::NAN),
        "+Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        other => Err(format!("Invalid $f64 value: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn oid() -> ObjectId {
        ObjectId::parse_hex("507f191e810c19729de860ea").unwrap()
    }

    #[test]
    fn identifiers_and_dates_use_wrappers() {
        let mut doc = Document::new();
        doc.insert("_id".into(), DocumentValue::Identifier(oid()));
        doc.insert(
            "at".into(),
            DocumentValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        );
        let json = serde_json::to_string(&DocumentValue::Object(doc)).unwrap();
        assert_eq!(
            json,
            r#"{"_id":{"$oid":"507f191e810c19729de860ea"},"at":{"$date":"2024-01-01T00:00:00Z"}}"#
        );
    }

    #[test]
    fn five_digit_years_keep_their_sign() {
        let date = DocumentValue::Date(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#"{"$date":"+10000-01-01T00:00:00Z"}"#);
        let back: DocumentValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn integral_floats_stay_floats() {
        let json = serde_json::to_string(&DocumentValue::Float(2.0)).unwrap();
        assert_eq!(json, "2.0");
        let back: DocumentValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DocumentValue::Float(2.0));
    }

    #[test]
    fn special_floats_round_trip() {
        for f in [f64::INFINITY, f64::NEG_INFINITY] {
            let json = serde_json::to_string(&DocumentValue::Float(f)).unwrap();
            let back: DocumentValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, DocumentValue::Float(f));
        }
        let back: DocumentValue = serde_json::from_str(r#"{"$f64":"NaN"}"#).unwrap();
        assert!(matches!(back, DocumentValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn wrapper_with_extra_keys_is_a_plain_object() {
        let back: DocumentValue =
            serde_json::from_str(r#"{"$oid":"507f191e810c19729de860ea","x":1}"#).unwrap();
        assert!(matches!(back, DocumentValue::Object(ref m) if m.len() == 2));
    }

    #[test]
    fn invalid_oid_is_an_error() {
        let result: Result<DocumentValue, _> = serde_json::from_str(r#"{"$oid":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn object_order_is_kept() {
        let back: DocumentValue = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();
        let keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
