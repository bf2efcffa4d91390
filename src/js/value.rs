use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::js::{CallbackFunction, JavaScriptClass, VariableName};
use crate::map_data::AsyncMapData;

/// Ordered JavaScript object members.
pub type JsObject = IndexMap<String, JsValue>;

/// A JavaScript value as produced by the object model.
///
/// Every configuration type serializes through this tree. `Undefined`
/// members are unset properties and are trimmed on output.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsValue>),
    Object(JsObject),
    Function(CallbackFunction),
    Class(JavaScriptClass),
    /// Bare reference to a variable, emitted without quotes.
    Identifier(VariableName),
    /// Map-data slot whose topology is fetched client-side.
    Fetch(Box<AsyncMapData>),
    /// Expression kept verbatim, e.g. `new Date(2024, 0, 1)`.
    Raw(String),
}

impl JsValue {
    #[inline] pub fn is_undefined(&self) -> bool { matches!(self, JsValue::Undefined) }

    /// Absent for the purpose of property lookup.
    #[inline] pub fn is_nullish(&self) -> bool { matches!(self, JsValue::Undefined | JsValue::Null) }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        if let JsValue::String(s) = self { Some(s) } else { None }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        if let JsValue::Number(n) = self { Some(*n) } else { None }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        if let JsValue::Bool(b) = self { Some(*b) } else { None }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&JsObject> {
        if let JsValue::Object(o) = self { Some(o) } else { None }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[JsValue]> {
        if let JsValue::Array(a) = self { Some(a) } else { None }
    }

    /// JavaScript-style type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "null",
            JsValue::Bool(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Array(_) => "array",
            JsValue::Object(_) => "object",
            JsValue::Function(_) => "function",
            JsValue::Class(_) => "class",
            JsValue::Identifier(_) => "variable",
            JsValue::Fetch(_) => "AsyncMapData",
            JsValue::Raw(_) => "expression",
        }
    }

    /// Short rendering of the value for error messages.
    pub fn describe(&self) -> String {
        let text = match self {
            JsValue::String(s) => format!("\"{s}\""),
            other => crate::js::render::render_compact(other),
        };
        let mut short: String = text.chars().take(120).collect();
        if short.len() < text.len() { short.push_str("...") }
        format!("{short} ({})", self.type_name())
    }

    /// Convert from a JSON value. Strings are kept as strings.
    pub fn from_json(value: &Value) -> JsValue {
        match value {
            Value::Null => JsValue::Null,
            Value::Bool(b) => JsValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(JsValue::Null, JsValue::Number),
            Value::String(s) => JsValue::String(s.clone()),
            Value::Array(items) => JsValue::Array(items.iter().map(JsValue::from_json).collect()),
            Value::Object(map) => JsValue::Object(Self::object_from_json(map)),
        }
    }

    pub fn object_from_json(map: &Map<String, Value>) -> JsObject {
        map.iter().map(|(k, v)| (k.clone(), JsValue::from_json(v))).collect()
    }

    /// Convert to a JSON value, trimming unset members.
    ///
    /// Functions and classes become their source text, variables become
    /// their `HCP: REPLACE-WITH-` placeholder, and fetch slots become the
    /// async map-data dictionary.
    pub fn to_json(&self) -> Value {
        match self {
            JsValue::Undefined | JsValue::Null => Value::Null,
            JsValue::Bool(b) => Value::Bool(*b),
            JsValue::Number(n) => number_to_json(*n),
            JsValue::String(s) => Value::String(s.clone()),
            JsValue::Array(items) => Value::Array(items.iter().map(JsValue::to_json).collect()),
            JsValue::Object(obj) => Value::Object(object_to_json(obj)),
            JsValue::Function(f) => Value::String(f.to_string()),
            JsValue::Class(c) => Value::String(c.to_string()),
            JsValue::Identifier(v) => Value::String(v.placeholder()),
            JsValue::Fetch(m) => Value::Object(m.to_json_map()),
            JsValue::Raw(expr) => Value::String(expr.clone()),
        }
    }
}

pub(crate) fn object_to_json(obj: &JsObject) -> Map<String, Value> {
    obj.iter()
        .filter(|(_, v)| !v.is_undefined())
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect()
}

/// Integral values are emitted as JSON integers.
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self { JsValue::Bool(b) }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self { JsValue::Number(n) }
}

impl From<i64> for JsValue {
    fn from(n: i64) -> Self { JsValue::Number(n as f64) }
}

impl From<u32> for JsValue {
    fn from(n: u32) -> Self { JsValue::Number(n as f64) }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self { JsValue::String(s.to_string()) }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self { JsValue::String(s) }
}

impl From<JsObject> for JsValue {
    fn from(o: JsObject) -> Self { JsValue::Object(o) }
}

impl From<Vec<JsValue>> for JsValue {
    fn from(a: Vec<JsValue>) -> Self { JsValue::Array(a) }
}

impl From<CallbackFunction> for JsValue {
    fn from(f: CallbackFunction) -> Self { JsValue::Function(f) }
}

impl From<VariableName> for JsValue {
    fn from(v: VariableName) -> Self { JsValue::Identifier(v) }
}

impl From<Value> for JsValue {
    fn from(v: Value) -> Self { JsValue::from_json(&v) }
}
