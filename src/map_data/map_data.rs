use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use serde_json::Value;
use topograph::Topology;

use crate::common::{is_existing_file, read_text};
use crate::error::{Error, Result};
use crate::geography::looks_like_topology;
use crate::js::{JsObject, JsValue, object_to_json};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::validate;

/// Object name given to topologies encoded from GeoJSON.
const DEFAULT_OBJECT: &str = "default";

/// Map geometry serialized inline with the chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    pub topology: Topology,
    /// Emit GeoJSON instead of TopoJSON.
    pub force_geojson: bool,
}

impl MapData {
    pub fn from_topology(topology: Topology) -> Self { Self { topology, force_geojson: false } }

    pub fn from_features(features: &FeatureCollection) -> Self {
        Self::from_topology(Topology::from_feature_collection(features, DEFAULT_OBJECT))
    }

    /// Interpret `source` as a file path, a URL, or JSON text, in that order.
    pub fn from_source(source: &str) -> Result<Self> {
        if is_existing_file(source) {
            log::debug!("[map_data] reading {source}");
            return Self::from_json_text(&read_text(Path::new(source))?);
        }
        if validate::is_url(source) {
            return Self::from_url(source);
        }
        Self::from_json_text(source).map_err(|_| {
            Error::value(format!("Unable to deserialize a topology from the value supplied: {}", preview(source)))
        })
    }

    /// TopoJSON when the document says so, otherwise GeoJSON encoded to a topology.
    pub fn from_value(value: &Value) -> Result<Self> {
        if looks_like_topology(value) {
            return Ok(Self::from_topology(Topology::from_value(value)?));
        }
        let geojson = GeoJson::from_json_value(value.clone())
            .map_err(|e| Error::value(format!("expects TopoJSON or GeoJSON: {e}")))?;
        Ok(Self::from_topology(Topology::from_geojson(&geojson, DEFAULT_OBJECT)))
    }

    pub fn from_topojson(topojson: &str) -> Result<Self> {
        Ok(Self::from_topology(topojson.parse::<Topology>()?))
    }

    pub fn from_geojson(geojson: &str) -> Result<Self> {
        let geojson = geojson.parse::<GeoJson>()
            .map_err(|e| Error::value(format!("expects a valid GeoJSON document: {e}")))?;
        Ok(Self::from_topology(Topology::from_geojson(&geojson, DEFAULT_OBJECT)))
    }

    /// Download and parse a TopoJSON or GeoJSON document.
    #[cfg(feature = "download")]
    pub fn from_url(url: &str) -> Result<Self> {
        let url = validate::url("url", url)?;
        Self::from_json_text(&crate::common::download_text(&url)?)
    }

    #[cfg(not(feature = "download"))]
    pub fn from_url(_url: &str) -> Result<Self> {
        Err(Error::missing_feature("MapData::from_url", "download"))
    }

    /// Read a `.shp` file or a `.zip` holding one shapefile.
    #[cfg(feature = "shapefile")]
    pub fn from_shapefile(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_features(&crate::common::read_shapefile(path.as_ref())?))
    }

    #[cfg(not(feature = "shapefile"))]
    pub fn from_shapefile(_path: impl AsRef<Path>) -> Result<Self> {
        Err(Error::missing_feature("MapData::from_shapefile", "shapefile"))
    }

    fn from_json_text(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// The object decoded by [`MapData::to_geojson`]: `data`, then `default`, then the first.
    pub fn object_name(&self) -> Option<&str> {
        ["data", DEFAULT_OBJECT].into_iter()
            .find(|name| self.topology.objects.contains_key(*name))
            .or_else(|| self.topology.object_names().next())
    }

    pub fn to_feature_collection(&self) -> Result<FeatureCollection> {
        Ok(self.topology.to_feature_collection(self.object_name())?)
    }

    pub fn to_topojson(&self) -> String { self.topology.to_string() }

    pub fn to_geojson(&self) -> Result<String> {
        Ok(GeoJson::FeatureCollection(self.to_feature_collection()?).to_string())
    }

    /// The map document: TopoJSON, or GeoJSON when `force_geojson` is set.
    pub fn document(&self) -> Result<Value> {
        if self.force_geojson {
            Ok(serde_json::to_value(GeoJson::FeatureCollection(self.to_feature_collection()?))?)
        } else {
            Ok(self.topology.to_value())
        }
    }

    /// The map document as embedded in chart options.
    pub(crate) fn document_value(&self) -> JsValue {
        match self.document() {
            Ok(doc) => JsValue::from_json(&doc),
            Err(e) => {
                log::warn!("[map_data] unable to decode topology to GeoJSON: {e}");
                JsValue::from_json(&self.topology.to_value())
            }
        }
    }
}

fn preview(source: &str) -> String {
    let mut short: String = source.chars().take(80).collect();
    if short.len() < source.len() { short.push_str("...") }
    short
}

impl HighchartsMeta for MapData {
    /// Accepts `{forceGeoJSON, topology}` or a bare TopoJSON / GeoJSON document.
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let wrapped = f.contains("forceGeoJSON") || obj.contains_key("force_geojson")
            || (obj.len() == 1 && obj.contains_key("topology"));
        if !wrapped {
            return Self::from_value(&Value::Object(object_to_json(obj)));
        }
        let mut data = match f.get("topology") {
            Some(JsValue::Object(doc)) => Self::from_value(&Value::Object(object_to_json(doc)))?,
            Some(JsValue::String(s)) => Self::from_source(s)?,
            Some(other) => return Err(Error::value(format!("topology expects TopoJSON, received {}", other.describe()))),
            None => Self::default(),
        };
        data.force_geojson = f.parse("forceGeoJSON")?
            .or(f.parse("force_geojson")?)
            .unwrap_or(false);
        Ok(data)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("forceGeoJSON", &Some(self.force_geojson))
            .value("topology", JsValue::from_json(&self.topology.to_value()))
            .build()
    }

    /// The map document as JSON text, which is also a valid JavaScript literal.
    fn to_js_literal(&self) -> String {
        match self.document() {
            Ok(doc) => doc.to_string(),
            Err(_) => self.to_topojson(),
        }
    }

    fn to_json(&self) -> Result<String> { Ok(self.document()?.to_string()) }

    fn from_json(json: &str) -> Result<Self> { Self::from_source(json) }

    fn from_js_literal(source: &str) -> Result<Self> {
        match crate::js::parse_literal(source)? {
            JsValue::Object(obj) => Self::from_js_object(&obj),
            other => Err(Error::value(format!("MapData expects an object, received {}", other.describe()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"hc-key": "sq"},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}
        }]
    }"#;

    #[test]
    fn geojson_is_encoded_to_a_topology() {
        let data = MapData::from_source(SQUARE).unwrap();
        assert_eq!(data.object_name(), Some("default"));
        assert!(data.to_topojson().contains("\"type\":\"Topology\""));
        assert!(data.to_js_literal().starts_with("{\"type\":\"Topology\""));
    }

    #[test]
    fn force_geojson_switches_output() {
        let mut data = MapData::from_geojson(SQUARE).unwrap();
        data.force_geojson = true;
        let json = data.to_json().unwrap();
        assert!(json.contains("\"FeatureCollection\""));
        assert!(json.contains("\"hc-key\":\"sq\""));
    }

    #[test]
    fn topojson_survives_round_trip() {
        let data = MapData::from_geojson(SQUARE).unwrap();
        let again = MapData::from_topojson(&data.to_topojson()).unwrap();
        assert_eq!(again, data);
    }

    #[test]
    fn wrapper_dict_round_trip() {
        let mut data = MapData::from_geojson(SQUARE).unwrap();
        data.force_geojson = true;
        let dict = data.to_dict();
        assert_eq!(dict["forceGeoJSON"], true);
        assert_eq!(MapData::from_dict(&dict).unwrap(), data);
    }

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.geo.json");
        std::fs::write(&path, SQUARE).unwrap();
        let data = MapData::from_source(path.to_str().unwrap()).unwrap();
        assert_eq!(data.topology.objects.len(), 1);
    }

    #[test]
    fn garbage_is_a_value_error() {
        let err = MapData::from_source("not a url or json").unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }
}
