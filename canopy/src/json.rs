use indexmap::IndexMap;

use crate::graph::ValueType;

/// A parsed JSON document. Unlike `serde_json::Value` this does not depend on crate features to
/// keep object members ordered: objects are always an [`IndexMap`], so member order is the order
/// the members were written in.
///
/// Duplicate member names are not representable. Hosts that parse JSON text themselves are
/// expected to collapse duplicates (last value wins) before handing the document over.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            JsonValue::Null => ValueType::Null,
            JsonValue::Bool(_) => ValueType::Boolean,
            JsonValue::Number(_) => ValueType::Number,
            JsonValue::String(_) => ValueType::String,
            JsonValue::Array(_) => ValueType::Array,
            JsonValue::Object(_) => ValueType::Object,
        }
    }

    pub fn kind_desc(&self) -> &'static str {
        self.value_type().as_str()
    }

    /// The text shown for this value inside a row. Strings are *not* quoted here; whether to
    /// quote is up to the renderer, which can tell strings apart through [`Self::value_type`].
    pub fn display_value(&self) -> String {
        match self {
            JsonValue::Null => "null".to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => format_number(*n),
            JsonValue::String(s) => s.clone(),
            JsonValue::Array(elements) => array_summary(elements.len()),
            JsonValue::Object(_) => "object".to_string(),
        }
    }
}

pub(crate) fn array_summary(len: usize) -> String {
    format!("array[{len}]")
}

/// Shortest round-trip form; integral values print without a fraction and very large or very
/// small magnitudes switch to exponent notation.
pub(crate) fn format_number(n: f64) -> String {
    let magnitude = n.abs();
    if n != 0.0 && magnitude.is_finite() && !(1e-6..1e21).contains(&magnitude) {
        format!("{n:e}")
    } else {
        n.to_string()
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => JsonValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(a) => JsonValue::Array(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                JsonValue::Object(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn member_order_survives_conversion() {
        let value = JsonValue::from(json!({ "zeta": 1, "alpha": 2, "mid": 3 }));
        let JsonValue::Object(members) = value else {
            panic!("expected an object");
        };
        let keys = members.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn display_values() {
        assert_eq!(JsonValue::Null.display_value(), "null");
        assert_eq!(JsonValue::Bool(false).display_value(), "false");
        assert_eq!(JsonValue::Number(30.0).display_value(), "30");
        assert_eq!(JsonValue::Number(149.99).display_value(), "149.99");
        assert_eq!(JsonValue::Number(-0.5).display_value(), "-0.5");
        assert_eq!(JsonValue::Number(1e21).display_value(), "1e21");
        assert_eq!(JsonValue::String("Alice".into()).display_value(), "Alice");
        assert_eq!(
            JsonValue::from(json!([1, 2, 3])).display_value(),
            "array[3]"
        );
        assert_eq!(JsonValue::from(json!({})).display_value(), "object");
    }
}
