use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue, object_to_json};
use crate::meta::{HighchartsMeta, short_type_name};

fn from_members<T: DeserializeOwned>(obj: &JsObject) -> Result<T> {
    serde_json::from_value(Value::Object(object_to_json(obj))).map_err(|e| {
        Error::value(format!("{} expects a valid GeoJSON object: {e}", short_type_name::<T>()))
    })
}

fn to_members<T: Serialize>(value: &T) -> JsObject {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => JsValue::object_from_json(&map),
        _ => JsObject::new(),
    }
}

macro_rules! geojson_meta {
    ($($ty:ty),+) => {$(
        impl HighchartsMeta for $ty {
            fn from_js_object(obj: &JsObject) -> Result<Self> { from_members(obj) }
            fn to_untrimmed(&self) -> JsObject { to_members(self) }
        }
    )+};
}

geojson_meta!(GeoJson, FeatureCollection, Feature, Geometry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_round_trips_through_js_literal() {
        let geometry = Geometry::new(geojson::Value::Point(vec![1.5, -2.0]));
        let literal = geometry.to_js_literal();
        assert!(literal.contains("type: 'Point'"));
        assert_eq!(Geometry::from_js_literal(&literal).unwrap(), geometry);
    }

    #[test]
    fn features_keep_properties() {
        let json = r#"{"type":"Feature","properties":{"hc-key":"fr"},"geometry":null}"#;
        let feature = Feature::from_json(json).unwrap();
        assert_eq!(feature.property("hc-key"), Some(&Value::String("fr".into())));
        assert_eq!(feature.to_dict()["properties"]["hc-key"], "fr");
    }

    #[test]
    fn invalid_geojson_is_a_value_error() {
        let err = FeatureCollection::from_json(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }
}
