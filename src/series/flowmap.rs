use std::{fmt, str::FromStr};

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::meta::{Fields, FromJs, HighchartsMeta, ObjectBuilder, ToJs};
use crate::validate::{self, Extent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerType {
    Arrow,
    Mushroom,
}

impl MarkerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::Arrow => "arrow",
            MarkerType::Mushroom => "mushroom",
        }
    }
}

impl FromStr for MarkerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrow" => Ok(MarkerType::Arrow),
            "mushroom" => Ok(MarkerType::Mushroom),
            _ => Err(Error::value(format!("marker_type expects either \"arrow\" or \"mushroom\". Received: \"{s}\""))),
        }
    }
}

impl fmt::Display for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromJs for MarkerType {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::String(s) => s.parse(),
            other => Err(Error::value(format!(
                "marker_type expects either \"arrow\" or \"mushroom\". Received: {}",
                other.describe()
            ))),
        }
    }
}

impl ToJs for MarkerType {
    fn to_js(&self) -> JsValue { JsValue::String(self.as_str().to_string()) }
}

/// Marker drawn at the end of a flow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowmapMarker {
    pub enabled: Option<bool>,
    pub height: Option<Extent>,
    pub width: Option<Extent>,
    pub marker_type: Option<MarkerType>,
}

impl HighchartsMeta for FlowmapMarker {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            enabled: f.parse("enabled")?,
            height: f.parse("height")?,
            width: f.parse("width")?,
            marker_type: f.parse("markerType")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("enabled", &self.enabled)
            .set("height", &self.height)
            .set("width", &self.width)
            .set("markerType", &self.marker_type)
            .build()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowmapFields {
    pub curve_factor: Option<f64>,
    pub fill_color: Option<String>,
    fill_opacity: Option<f64>,
    pub marker_end: Option<FlowmapMarker>,
    pub max_width: Option<f64>,
    pub min_width: Option<f64>,
    pub weight: Option<f64>,
    pub width: Option<f64>,
    pub grow_towards: Option<bool>,
}

impl FlowmapFields {
    #[inline] pub fn fill_opacity(&self) -> Option<f64> { self.fill_opacity }

    pub fn set_fill_opacity(&mut self, opacity: Option<f64>) -> Result<()> {
        self.fill_opacity = validate::fraction("fill_opacity", opacity)?;
        Ok(())
    }
}

impl HighchartsMeta for FlowmapFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            curve_factor: f.parse("curveFactor")?,
            fill_color: f.parse("fillColor")?,
            fill_opacity: validate::fraction("fill_opacity", f.parse("fillOpacity")?)?,
            marker_end: f.model("markerEnd")?,
            max_width: validate::non_negative("max_width", f.parse("maxWidth")?)?,
            min_width: validate::non_negative("min_width", f.parse("minWidth")?)?,
            weight: f.parse("weight")?,
            width: validate::non_negative("width", f.parse("width")?)?,
            grow_towards: f.parse("growTowards")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("curveFactor", &self.curve_factor)
            .set("fillColor", &self.fill_color)
            .set("fillOpacity", &self.fill_opacity)
            .model("markerEnd", &self.marker_end)
            .set("maxWidth", &self.max_width)
            .set("minWidth", &self.min_width)
            .set("weight", &self.weight)
            .set("width", &self.width)
            .set("growTowards", &self.grow_towards)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_type_values() {
        let marker = FlowmapMarker::from_js_literal("{markerType: 'Mushroom', width: '50%', height: 4}").unwrap();
        assert_eq!(marker.marker_type, Some(MarkerType::Mushroom));
        assert_eq!(marker.width, Some(Extent::Percent("50%".into())));

        let err = FlowmapMarker::from_js_literal("{markerType: 'circle'}").unwrap_err();
        assert_eq!(err.to_string(), "marker_type expects either \"arrow\" or \"mushroom\". Received: \"circle\"");
    }

    #[test]
    fn fill_opacity_bounds() {
        assert!(FlowmapFields::from_js_literal("{fillOpacity: 1.2}").is_err());
        let fields = FlowmapFields::from_js_literal("{fillOpacity: 0.5, markerEnd: {enabled: true}}").unwrap();
        assert_eq!(fields.fill_opacity(), Some(0.5));
        assert_eq!(fields.to_js_literal(), "{\n  fillOpacity: 0.5,\n  markerEnd: {\n    enabled: true\n  }\n}");
    }
}
