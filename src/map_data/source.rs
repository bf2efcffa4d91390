use serde_json::Value;

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue, REPLACE_PREFIX, VariableName, is_identifier, object_to_json, parse_literal};
use crate::map_data::{AsyncMapData, MapData};
use crate::meta::{FromJs, HighchartsMeta, ToJs};
use crate::validate;

/// Where a chart or series gets its map geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum MapSource {
    /// Geometry serialized inline.
    Data(Box<MapData>),
    /// Geometry fetched by the browser.
    Async(AsyncMapData),
    /// A JavaScript variable defined elsewhere on the page.
    Variable(VariableName),
    /// Index into the maps loaded on the page (chart-level `map` only).
    Index(u32),
    List(Vec<MapSource>),
}

const SHAPES: &str = "str, TopoJSON, GeoJSON, a MapData object, an AsyncMapData object, or coercable to one";

impl MapSource {
    /// Coerce a property value, trying each accepted shape in order.
    pub fn coerce(value: &JsValue, property: &str, allow_index: bool) -> Result<Self> {
        let fail = || Error::value(format!("{property} expects a value that is {SHAPES}. Received: {}", value.describe()));

        if let JsValue::String(s) = value {
            if let Some(obj) = url_object(s) {
                return AsyncMapData::from_js_object(&obj).map(MapSource::Async);
            }
        }
        match value {
            JsValue::Fetch(data) => Ok(MapSource::Async((**data).clone())),
            JsValue::Identifier(v) => Ok(MapSource::Variable(v.clone())),
            JsValue::String(s) if validate::is_url(s) => AsyncMapData::new(s).map(MapSource::Async),
            JsValue::Number(n) if allow_index && n.fract() == 0.0 && *n >= 0.0 => Ok(MapSource::Index(*n as u32)),
            JsValue::Object(obj) if obj.contains_key("url") => AsyncMapData::from_js_object(obj).map(MapSource::Async),
            JsValue::String(s) if s.starts_with(REPLACE_PREFIX) => VariableName::from_placeholder(s)
                .map(MapSource::Variable)
                .ok_or_else(fail),
            JsValue::Object(obj) => MapData::from_value(&Value::Object(object_to_json(obj)))
                .map(|data| MapSource::Data(Box::new(data)))
                .map_err(|_| fail()),
            JsValue::String(s) => match MapData::from_source(s) {
                Ok(data) => Ok(MapSource::Data(Box::new(data))),
                Err(_) if is_identifier_path(s) => VariableName::new(s.as_str()).map(MapSource::Variable),
                Err(_) => Err(fail()),
            },
            JsValue::Array(items) => items.iter()
                .map(|item| Self::coerce(item, property, allow_index))
                .collect::<Result<Vec<_>>>()
                .map(MapSource::List),
            _ => Err(fail()),
        }
    }

    /// Coerce JavaScript literal text.
    pub fn from_js_literal(source: &str, property: &str, allow_index: bool) -> Result<Self> {
        match parse_literal(source) {
            Ok(value) => Self::coerce(&value, property, allow_index),
            Err(_) => Self::coerce(&JsValue::String(source.to_string()), property, allow_index),
        }
    }

    /// True if this source, or any member of a list, is fetched client-side.
    pub fn is_async(&self) -> bool {
        match self {
            MapSource::Async(_) => true,
            MapSource::List(items) => items.iter().any(MapSource::is_async),
            _ => false,
        }
    }

    /// Async slots in declaration order.
    pub fn async_slots(&self) -> Vec<&AsyncMapData> {
        match self {
            MapSource::Async(data) => vec![data],
            MapSource::List(items) => items.iter().flat_map(MapSource::async_slots).collect(),
            _ => Vec::new(),
        }
    }
}

fn is_identifier_path(s: &str) -> bool { s.split('.').all(is_identifier) }

/// Object literal text whose top level names a `url`. A `url` nested deeper,
/// such as a feature property in GeoJSON text, does not count.
fn url_object(s: &str) -> Option<JsObject> {
    if !s.contains("url") {
        return None;
    }
    match parse_literal(s) {
        Ok(JsValue::Object(obj)) if obj.contains_key("url") => Some(obj),
        _ => None,
    }
}

impl FromJs for MapSource {
    fn from_js(value: &JsValue) -> Result<Self> { Self::coerce(value, "map", true) }
}

impl ToJs for MapSource {
    fn to_js(&self) -> JsValue {
        match self {
            MapSource::Data(data) => data.document_value(),
            MapSource::Async(data) => data.to_js_value(),
            MapSource::Variable(v) => JsValue::Identifier(v.clone()),
            MapSource::Index(i) => JsValue::Number(*i as f64),
            MapSource::List(items) => JsValue::Array(items.iter().map(ToJs::to_js).collect()),
        }
    }
}

impl From<MapData> for MapSource {
    fn from(data: MapData) -> Self { MapSource::Data(Box::new(data)) }
}

impl From<AsyncMapData> for MapSource {
    fn from(data: AsyncMapData) -> Self { MapSource::Async(data) }
}

impl From<VariableName> for MapSource {
    fn from(v: VariableName) -> Self { MapSource::Variable(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(value: JsValue) -> Result<MapSource> { MapSource::coerce(&value, "map", true) }

    #[test]
    fn urls_become_async() {
        let source = coerce("https://x/a.json".into()).unwrap();
        assert!(source.is_async());
        assert!(matches!(source.to_js(), JsValue::Fetch(_)));
    }

    #[test]
    fn url_objects_and_literals_become_async() {
        let mut obj = crate::js::JsObject::new();
        obj.insert("url".into(), "https://x/a.json".into());
        obj.insert("fetchCounter".into(), 2.0.into());
        match coerce(JsValue::Object(obj)).unwrap() {
            MapSource::Async(data) => assert_eq!(data.variable_name(), "topology2"),
            other => panic!("unexpected {other:?}"),
        }

        let source = coerce("{url: 'https://x/b.json'}".into()).unwrap();
        assert_eq!(source.async_slots()[0].url(), "https://x/b.json");

        let source = coerce(r#"{"url": "https://x/c.json"}"#.into()).unwrap();
        assert_eq!(source.async_slots()[0].url(), "https://x/c.json");
    }

    #[test]
    fn geojson_text_with_url_properties_stays_inline() {
        let geojson = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"hc-key": "sq", "url": "https://example.com/sq"},
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }]}"#;
        let source = coerce(geojson.into()).unwrap();
        assert!(matches!(source, MapSource::Data(_)));
        assert!(!source.is_async());

        let mut options = crate::options::ChartOptions::default();
        options.set_map(JsValue::String(geojson.into())).unwrap();
        assert!(matches!(options.map(), Some(MapSource::Data(_))));
    }

    #[test]
    fn placeholders_and_identifiers_become_variables() {
        let source = coerce("HCP: REPLACE-WITH-worldMap".into()).unwrap();
        assert_eq!(source, MapSource::Variable(VariableName::new("worldMap").unwrap()));

        let source = coerce("Highcharts.maps.world".into()).unwrap();
        assert_eq!(source.to_js(), JsValue::Identifier(VariableName::new("Highcharts.maps.world").unwrap()));
    }

    #[test]
    fn indices_only_where_allowed() {
        assert_eq!(coerce(JsValue::Number(1.0)).unwrap(), MapSource::Index(1));
        assert!(MapSource::coerce(&JsValue::Number(1.0), "map_data", false).is_err());
    }

    #[test]
    fn lists_coerce_each_member() {
        let source = coerce(JsValue::Array(vec!["https://x/a.json".into(), "worldMap".into()])).unwrap();
        assert!(source.is_async());
        assert_eq!(source.async_slots().len(), 1);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = coerce("not a url or json".into()).unwrap_err();
        assert!(err.to_string().starts_with("map expects a value that is str, TopoJSON, GeoJSON"));
        assert!(coerce(JsValue::Bool(true)).is_err());
    }
}
