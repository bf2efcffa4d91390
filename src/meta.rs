//! The conversion triad every configuration type implements, and the
//! property readers and writers that implement it.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::js::{CallbackFunction, JsObject, JsValue, VariableName, object_to_json, parse_literal, render};

/// Conversions shared by every configuration type.
///
/// Implementors provide the camelCase property mapping in both directions;
/// dictionary, JSON, and JavaScript-literal forms follow from it.
pub trait HighchartsMeta: Sized {
    /// Build from JavaScript object members. Keys may be camelCase or snake_case.
    fn from_js_object(obj: &JsObject) -> Result<Self>;

    /// Every property under its JavaScript name; unset properties are `Undefined`.
    fn to_untrimmed(&self) -> JsObject;

    fn to_js_value(&self) -> JsValue { JsValue::Object(self.to_untrimmed()) }

    fn from_js_value(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Object(obj) => Self::from_js_object(obj),
            JsValue::String(s) => match parse_literal(s) {
                Ok(JsValue::Object(obj)) => Self::from_js_object(&obj),
                _ => Err(expects_object::<Self>(value)),
            },
            other => Err(expects_object::<Self>(other)),
        }
    }

    fn to_dict(&self) -> Map<String, Value> { object_to_json(&self.to_untrimmed()) }

    fn from_dict(dict: &Map<String, Value>) -> Result<Self> {
        Self::from_js_object(&JsValue::object_from_json(dict))
    }

    fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(&self.to_dict())?) }

    fn from_json(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Self::from_dict(&map),
            other => Err(Error::value(format!(
                "{} expects a JSON object, received: {other}",
                short_type_name::<Self>()
            ))),
        }
    }

    fn to_js_literal(&self) -> String { render(&self.to_js_value()) }

    fn from_js_literal(source: &str) -> Result<Self> {
        match parse_literal(source)? {
            JsValue::Object(obj) => Self::from_js_object(&obj),
            other => Err(expects_object::<Self>(&other)),
        }
    }

    /// A copy of `self` with every property set on `other` overlaid.
    fn copy_with(&self, other: &Self) -> Result<Self> {
        let mut merged = self.to_untrimmed();
        for (key, value) in other.to_untrimmed() {
            if !value.is_undefined() {
                merged.insert(key, value);
            }
        }
        Self::from_js_object(&merged)
    }
}

/// Last path segment of a type name, for messages.
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

fn expects_object<T>(value: &JsValue) -> Error {
    Error::value(format!("{} expects an object, received {}", short_type_name::<T>(), value.describe()))
}

// ---------------------------------------------------------------------------
// Property conversion
// ---------------------------------------------------------------------------

/// Conversion from a property value, validating as it goes.
pub trait FromJs: Sized {
    fn from_js(value: &JsValue) -> Result<Self>;
}

/// Conversion to a property value.
pub trait ToJs {
    fn to_js(&self) -> JsValue;
}

fn expected(what: &str, value: &JsValue) -> Error {
    Error::value(format!("expects {what}, received {}", value.describe()))
}

impl FromJs for bool {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Bool(b) => Ok(*b),
            JsValue::Number(n) => Ok(*n != 0.0),
            JsValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            JsValue::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(expected("a boolean", other)),
        }
    }
}

impl FromJs for f64 {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Number(n) => Ok(*n),
            JsValue::String(s) => s.trim().parse::<f64>().map_err(|_| expected("a number", value)),
            other => Err(expected("a number", other)),
        }
    }
}

impl FromJs for i64 {
    fn from_js(value: &JsValue) -> Result<Self> {
        let n = f64::from_js(value).map_err(|_| expected("an integer", value))?;
        if n.fract() != 0.0 || n.abs() > 9.0e15 {
            return Err(expected("an integer", value));
        }
        Ok(n as i64)
    }
}

impl FromJs for u32 {
    fn from_js(value: &JsValue) -> Result<Self> {
        let n = i64::from_js(value).map_err(|_| expected("a non-negative integer", value))?;
        u32::try_from(n).map_err(|_| expected("a non-negative integer", value))
    }
}

impl FromJs for String {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::String(s) => Ok(s.clone()),
            other => Err(expected("a string", other)),
        }
    }
}

impl FromJs for JsValue {
    fn from_js(value: &JsValue) -> Result<Self> { Ok(value.clone()) }
}

impl FromJs for JsObject {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Object(obj) => Ok(obj.clone()),
            other => Err(expected("an object", other)),
        }
    }
}

impl FromJs for CallbackFunction {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Function(f) => Ok(f.clone()),
            JsValue::String(s) => CallbackFunction::from_js_literal(s),
            other => Err(expected("a JavaScript function", other)),
        }
    }
}

impl FromJs for VariableName {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Identifier(v) => Ok(v.clone()),
            JsValue::String(s) => match VariableName::from_placeholder(s) {
                Some(v) => Ok(v),
                None => VariableName::new(s.as_str()),
            },
            other => Err(expected("a variable name", other)),
        }
    }
}

impl<T: FromJs> FromJs for Vec<T> {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Array(items) => items.iter().map(T::from_js).collect(),
            other => Err(expected("an array", other)),
        }
    }
}

impl ToJs for bool {
    fn to_js(&self) -> JsValue { JsValue::Bool(*self) }
}

impl ToJs for f64 {
    fn to_js(&self) -> JsValue { JsValue::Number(*self) }
}

impl ToJs for i64 {
    fn to_js(&self) -> JsValue { JsValue::Number(*self as f64) }
}

impl ToJs for u32 {
    fn to_js(&self) -> JsValue { JsValue::Number(*self as f64) }
}

impl ToJs for String {
    fn to_js(&self) -> JsValue { JsValue::String(self.clone()) }
}

impl ToJs for JsValue {
    fn to_js(&self) -> JsValue { self.clone() }
}

impl ToJs for JsObject {
    fn to_js(&self) -> JsValue { JsValue::Object(self.clone()) }
}

impl ToJs for CallbackFunction {
    fn to_js(&self) -> JsValue { JsValue::Function(self.clone()) }
}

impl ToJs for VariableName {
    fn to_js(&self) -> JsValue { JsValue::Identifier(self.clone()) }
}

impl<T: ToJs> ToJs for Vec<T> {
    fn to_js(&self) -> JsValue { JsValue::Array(self.iter().map(ToJs::to_js).collect()) }
}

// ---------------------------------------------------------------------------
// Readers and writers
// ---------------------------------------------------------------------------

/// `fooBarBaz` → `foo_bar_baz`.
pub(crate) fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    let mut prev_lower = false;
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower { out.push('_') }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            out.push(c);
        }
    }
    out
}

/// `foo_bar_baz` → `fooBarBaz`.
pub(crate) fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' && !out.is_empty() {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Attach the property name to a conversion error.
fn in_property(key: &str, err: Error) -> Error {
    match err {
        Error::Value(msg) if msg.starts_with("expects") => Error::Value(format!("{key} {msg}")),
        other => other,
    }
}

/// Typed property lookup over JavaScript object members.
pub(crate) struct Fields<'a> {
    obj: &'a JsObject,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(obj: &'a JsObject) -> Self { Self { obj } }

    /// The value under `key` (camelCase, then snake_case), unless null or undefined.
    pub(crate) fn get(&self, key: &str) -> Option<&'a JsValue> {
        let value = match self.obj.get(key) {
            Some(v) => v,
            None => {
                let snake = snake_case(key);
                if snake == key { return None }
                self.obj.get(&snake)?
            }
        };
        if value.is_nullish() { None } else { Some(value) }
    }

    pub(crate) fn parse<T: FromJs>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|v| T::from_js(v).map_err(|e| in_property(key, e)))
            .transpose()
    }

    /// Like [`Fields::parse`] but accepts a bare value where an array is expected.
    pub(crate) fn list<T: FromJs>(&self, key: &str) -> Result<Option<Vec<T>>> {
        match self.get(key) {
            None => Ok(None),
            Some(JsValue::Array(items)) => items.iter()
                .map(|v| T::from_js(v).map_err(|e| in_property(key, e)))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(single) => Ok(Some(vec![T::from_js(single).map_err(|e| in_property(key, e))?])),
        }
    }

    /// Strings, with numbers accepted and stringified.
    pub(crate) fn text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            Some(JsValue::Number(n)) => Ok(Some(crate::js::render_compact(&JsValue::Number(*n)))),
            _ => self.parse(key),
        }
    }

    pub(crate) fn model<T: HighchartsMeta>(&self, key: &str) -> Result<Option<T>> {
        self.get(key).map(T::from_js_value).transpose()
    }

    /// A list of models; a single object is accepted as a one-member list.
    pub(crate) fn models<T: HighchartsMeta>(&self, key: &str) -> Result<Option<Vec<T>>> {
        match self.get(key) {
            None => Ok(None),
            Some(JsValue::Array(items)) => items.iter().map(T::from_js_value).collect::<Result<Vec<_>>>().map(Some),
            Some(single) => Ok(Some(vec![T::from_js_value(single)?])),
        }
    }

    /// The raw value, for properties passed through untyped.
    pub(crate) fn raw(&self, key: &str) -> Option<JsValue> { self.get(key).cloned() }

    pub(crate) fn contains(&self, key: &str) -> bool { self.get(key).is_some() }
}

/// Builds the untrimmed member list of a configuration type.
#[derive(Default)]
pub(crate) struct ObjectBuilder {
    obj: JsObject,
}

impl ObjectBuilder {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn set<T: ToJs>(mut self, key: &str, value: &Option<T>) -> Self {
        self.obj.insert(key.to_string(), value.as_ref().map_or(JsValue::Undefined, ToJs::to_js));
        self
    }

    pub(crate) fn value(mut self, key: &str, value: JsValue) -> Self {
        self.obj.insert(key.to_string(), value);
        self
    }

    pub(crate) fn model<T: HighchartsMeta>(mut self, key: &str, value: &Option<T>) -> Self {
        self.obj.insert(key.to_string(), value.as_ref().map_or(JsValue::Undefined, T::to_js_value));
        self
    }

    pub(crate) fn models<T: HighchartsMeta>(mut self, key: &str, value: &Option<Vec<T>>) -> Self {
        let js = value.as_ref().map_or(JsValue::Undefined, |items| {
            JsValue::Array(items.iter().map(T::to_js_value).collect())
        });
        self.obj.insert(key.to_string(), js);
        self
    }

    /// Merge another capability's members; set values win over unset ones.
    pub(crate) fn merge(mut self, other: JsObject) -> Self {
        for (key, value) in other {
            if !value.is_undefined() || !self.obj.contains_key(&key) {
                self.obj.insert(key, value);
            }
        }
        self
    }

    pub(crate) fn build(self) -> JsObject { self.obj }
}

/// Declares a string-valued enum with case-insensitive parsing and JS conversions.
macro_rules! js_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($prop:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The JavaScript spelling.
            pub fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $text),+ }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                $(if s.eq_ignore_ascii_case($text) { return Ok($name::$variant); })+
                Err($crate::error::Error::Value(format!(
                    "{} expects one of {}. Received: \"{}\"",
                    $prop,
                    [$($text),+].join(", "),
                    s
                )))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::meta::FromJs for $name {
            fn from_js(value: &$crate::js::JsValue) -> $crate::error::Result<Self> {
                match value {
                    $crate::js::JsValue::String(s) => s.parse(),
                    other => Err($crate::error::Error::Value(format!(
                        "{} expects a string, received {}", $prop, other.describe()
                    ))),
                }
            }
        }

        impl $crate::meta::ToJs for $name {
            fn to_js(&self) -> $crate::js::JsValue {
                $crate::js::JsValue::String(self.as_str().to_string())
            }
        }
    };
}
pub(crate) use js_enum;

#[cfg(test)]
mod tests {
    use super::*;

    js_enum! {
        enum Mode ("mode") {
            Cors => "cors",
            NoCors => "no-cors",
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        max_zoom: Option<f64>,
        enabled: Option<bool>,
        mode: Option<Mode>,
    }

    impl HighchartsMeta for Sample {
        fn from_js_object(obj: &JsObject) -> Result<Self> {
            let f = Fields::new(obj);
            Ok(Self { max_zoom: f.parse("maxZoom")?, enabled: f.parse("enabled")?, mode: f.parse("mode")? })
        }

        fn to_untrimmed(&self) -> JsObject {
            ObjectBuilder::new()
                .set("maxZoom", &self.max_zoom)
                .set("enabled", &self.enabled)
                .set("mode", &self.mode)
                .build()
        }
    }

    #[test]
    fn case_conversion() {
        assert_eq!(snake_case("mapNavigation"), "map_navigation");
        assert_eq!(snake_case("enableDoubleClickZoomTo"), "enable_double_click_zoom_to");
        assert_eq!(snake_case("x"), "x");
        assert_eq!(camel_case("map_navigation"), "mapNavigation");
        assert_eq!(camel_case("_private"), "_private");
    }

    #[test]
    fn snake_case_keys_are_accepted() {
        let sample = Sample::from_json(r#"{"max_zoom": 4, "enabled": 1}"#).unwrap();
        assert_eq!(sample, Sample { max_zoom: Some(4.0), enabled: Some(true), mode: None });
    }

    #[test]
    fn dict_round_trip_trims_unset() {
        let sample = Sample { max_zoom: Some(2.5), enabled: None, mode: Some(Mode::NoCors) };
        let dict = sample.to_dict();
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["maxZoom", "mode"]);
        assert_eq!(Sample::from_dict(&dict).unwrap(), sample);
    }

    #[test]
    fn js_literal_round_trip() {
        let sample = Sample { max_zoom: Some(2.0), enabled: Some(false), mode: Some(Mode::Cors) };
        assert_eq!(sample.to_js_literal(), "{\n  maxZoom: 2,\n  enabled: false,\n  mode: 'cors'\n}");
        assert_eq!(Sample::from_js_literal(&sample.to_js_literal()).unwrap(), sample);
    }

    #[test]
    fn errors_name_the_property() {
        let err = Sample::from_json(r#"{"maxZoom": "lots"}"#).unwrap_err();
        assert_eq!(err.to_string(), "maxZoom expects a number, received \"lots\" (string)");

        let err = Sample::from_json(r#"{"mode": "sideways"}"#).unwrap_err();
        assert_eq!(err.to_string(), "mode expects one of cors, no-cors. Received: \"sideways\"");
    }

    #[test]
    fn copy_with_overlays_set_properties() {
        let base = Sample { max_zoom: Some(1.0), enabled: Some(true), mode: None };
        let other = Sample { max_zoom: None, enabled: Some(false), mode: Some(Mode::Cors) };
        assert_eq!(
            base.copy_with(&other).unwrap(),
            Sample { max_zoom: Some(1.0), enabled: Some(false), mode: Some(Mode::Cors) }
        );
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(matches!(Sample::from_json("[1, 2]"), Err(Error::Value(_))));
    }
}
