//! Property validators shared by the options tree.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::js::JsValue;
use crate::meta::{FromJs, ToJs};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(https?|ftp)://[^\s/$.?#][^\s]*$").expect("valid URL regex")
});

/// True if `s` is an `http`, `https` or `ftp` URL.
pub fn is_url(s: &str) -> bool { URL_RE.is_match(s.trim()) }

/// Validate a URL, naming `property` in the error.
pub fn url(property: &str, s: &str) -> Result<String> {
    let trimmed = s.trim();
    if is_url(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Error::value(format!("{property} expects a valid URL. Received: \"{s}\"")))
    }
}

/// Check `n` against inclusive bounds.
pub fn numeric(property: &str, n: f64, min: Option<f64>, max: Option<f64>) -> Result<f64> {
    if n.is_nan() {
        return Err(Error::value(format!("{property} expects a number. Received: NaN")));
    }
    if let Some(min) = min && n < min {
        return Err(Error::value(format!("{property} expects a value of at least {min}. Received: {n}")));
    }
    if let Some(max) = max && n > max {
        return Err(Error::value(format!("{property} expects a value of at most {max}. Received: {n}")));
    }
    Ok(n)
}

pub fn non_negative(property: &str, n: Option<f64>) -> Result<Option<f64>> {
    n.map(|n| numeric(property, n, Some(0.0), None)).transpose()
}

/// Opacity-style fraction in `0..=1`.
pub fn fraction(property: &str, n: Option<f64>) -> Result<Option<f64>> {
    n.map(|n| numeric(property, n, Some(0.0), Some(1.0))).transpose()
}

/// Reject empty strings unless `allow_empty`.
pub fn string(property: &str, s: Option<String>, allow_empty: bool) -> Result<Option<String>> {
    match s {
        Some(s) if !allow_empty && s.trim().is_empty() => {
            Err(Error::value(format!("{property} expects a non-empty string")))
        }
        other => Ok(other),
    }
}

/// Length check for fixed-size coordinate lists.
pub fn arity<T>(property: &str, items: Option<Vec<T>>, min: usize, max: usize) -> Result<Option<Vec<T>>> {
    match items {
        Some(items) if items.len() < min || items.len() > max => {
            let expected = if min == max { format!("exactly {min}") } else { format!("{min} to {max}") };
            Err(Error::value(format!("{property} expects {expected} members. Received: {}", items.len())))
        }
        other => Ok(other),
    }
}

/// A length in pixels or a percentage string such as `"10%"`.
#[derive(Clone, Debug, PartialEq)]
pub enum Extent {
    Pixels(f64),
    Percent(String),
}

impl FromJs for Extent {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Number(n) => numeric("extent", *n, Some(0.0), None)
                .map(Extent::Pixels)
                .map_err(|_| Error::value(format!("expects a non-negative number or a percentage string, received {}", value.describe()))),
            JsValue::String(s) if s.trim().ends_with('%') => Ok(Extent::Percent(s.trim().to_string())),
            other => Err(Error::value(format!(
                "expects a non-negative number or a percentage string, received {}",
                other.describe()
            ))),
        }
    }
}

impl ToJs for Extent {
    fn to_js(&self) -> JsValue {
        match self {
            Extent::Pixels(n) => JsValue::Number(*n),
            Extent::Percent(s) => JsValue::String(s.clone()),
        }
    }
}

/// Padding-style bounds: one value for every side, or `[top, right, bottom, left]`.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundingArray {
    Uniform(BoundingValue),
    Sides([BoundingValue; 4]),
}

/// One member of a [`BoundingArray`].
#[derive(Clone, Debug, PartialEq)]
pub enum BoundingValue {
    Pixels(f64),
    Percent(String),
}

impl FromJs for BoundingValue {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Number(n) => Ok(BoundingValue::Pixels(*n)),
            JsValue::String(s) if s.contains('%') => Ok(BoundingValue::Percent(s.clone())),
            JsValue::String(s) => s.trim().parse::<f64>().map(BoundingValue::Pixels).map_err(|_| {
                Error::value(format!("expects a number or a percentage string, received {}", value.describe()))
            }),
            other => Err(Error::value(format!(
                "expects a number or a percentage string, received {}",
                other.describe()
            ))),
        }
    }
}

impl ToJs for BoundingValue {
    fn to_js(&self) -> JsValue {
        match self {
            BoundingValue::Pixels(n) => JsValue::Number(*n),
            BoundingValue::Percent(s) => JsValue::String(s.clone()),
        }
    }
}

impl FromJs for BoundingArray {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Array(items) if items.len() == 1 => BoundingValue::from_js(&items[0]).map(BoundingArray::Uniform),
            JsValue::Array(items) if items.len() == 4 => Ok(BoundingArray::Sides([
                BoundingValue::from_js(&items[0])?,
                BoundingValue::from_js(&items[1])?,
                BoundingValue::from_js(&items[2])?,
                BoundingValue::from_js(&items[3])?,
            ])),
            JsValue::Array(items) => Err(Error::value(format!(
                "expects a bounding array of 4 members. Received: {} members",
                items.len()
            ))),
            single => BoundingValue::from_js(single).map(BoundingArray::Uniform),
        }
    }
}

impl ToJs for BoundingArray {
    fn to_js(&self) -> JsValue {
        match self {
            BoundingArray::Uniform(v) => v.to_js(),
            BoundingArray::Sides(sides) => JsValue::Array(sides.iter().map(ToJs::to_js).collect()),
        }
    }
}

/// Bool-or-object toggles such as `animation` or `interpolation`.
#[derive(Clone, Debug, PartialEq)]
pub enum Toggle {
    Flag(bool),
    Settings(crate::js::JsObject),
}

impl FromJs for Toggle {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Object(obj) => Ok(Toggle::Settings(obj.clone())),
            other => bool::from_js(other)
                .map(Toggle::Flag)
                .map_err(|_| Error::value(format!("expects a boolean or an object, received {}", other.describe()))),
        }
    }
}

impl ToJs for Toggle {
    fn to_js(&self) -> JsValue {
        match self {
            Toggle::Flag(b) => JsValue::Bool(*b),
            Toggle::Settings(obj) => JsValue::Object(obj.clone()),
        }
    }
}

/// Values that may be either a number or a string, e.g. axis references.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberOrString {
    Number(f64),
    String(String),
}

impl FromJs for NumberOrString {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Number(n) => Ok(NumberOrString::Number(*n)),
            JsValue::String(s) => Ok(NumberOrString::String(s.clone())),
            other => Err(Error::value(format!("expects a number or a string, received {}", other.describe()))),
        }
    }
}

impl ToJs for NumberOrString {
    fn to_js(&self) -> JsValue {
        match self {
            NumberOrString::Number(n) => JsValue::Number(*n),
            NumberOrString::String(s) => JsValue::String(s.clone()),
        }
    }
}

impl From<f64> for NumberOrString {
    fn from(n: f64) -> Self { NumberOrString::Number(n) }
}

impl From<&str> for NumberOrString {
    fn from(s: &str) -> Self { NumberOrString::String(s.to_string()) }
}
