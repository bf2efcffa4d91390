use serde_json::Value;
use topograph::Topology;

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue, object_to_json};
use crate::meta::HighchartsMeta;

/// True if `value` is a JSON object whose `type` is `Topology`.
pub fn looks_like_topology(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("Topology")
}

impl HighchartsMeta for Topology {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        Topology::from_value(&Value::Object(object_to_json(obj)))
            .map_err(|e| Error::value(format!("Topology expects a valid TopoJSON object: {e}")))
    }

    fn to_untrimmed(&self) -> JsObject {
        match self.to_value() {
            Value::Object(map) => JsValue::object_from_json(&map),
            _ => JsObject::new(),
        }
    }

    /// TopoJSON is valid JavaScript; emit it as compact JSON.
    fn to_js_literal(&self) -> String { self.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_topology() -> Value {
        json!({
            "type": "Topology",
            "objects": {"example": {"type": "Point", "coordinates": [1, 2]}},
            "arcs": []
        })
    }

    #[test]
    fn detects_topology_documents() {
        assert!(looks_like_topology(&make_topology()));
        assert!(!looks_like_topology(&json!({"type": "FeatureCollection", "features": []})));
    }

    #[test]
    fn dict_round_trip() {
        let Value::Object(map) = make_topology() else { unreachable!() };
        let topology = Topology::from_dict(&map).unwrap();
        assert_eq!(Topology::from_dict(&topology.to_dict()).unwrap(), topology);
        assert!(topology.to_js_literal().starts_with("{\"type\":\"Topology\""));
    }

    #[test]
    fn rejects_other_documents() {
        assert!(Topology::from_json(r#"{"type": "Feature"}"#).is_err());
    }
}
