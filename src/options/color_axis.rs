use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::meta::{Fields, FromJs, HighchartsMeta, ObjectBuilder, ToJs, js_enum};
use crate::validate;

js_enum! {
    pub enum ColorAxisType ("type") {
        Linear => "linear",
        Logarithmic => "logarithmic",
    }
}

/// A gradient stop: offset in `0..=1` and a color.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl FromJs for ColorStop {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value.as_array() {
            Some([offset, JsValue::String(color)]) => Ok(Self {
                offset: validate::numeric("stops", f64::from_js(offset)?, Some(0.0), Some(1.0))?,
                color: color.clone(),
            }),
            _ => Err(Error::value(format!("expects [offset, color] pairs, received {}", value.describe()))),
        }
    }
}

impl ToJs for ColorStop {
    fn to_js(&self) -> JsValue {
        JsValue::Array(vec![JsValue::Number(self.offset), JsValue::String(self.color.clone())])
    }
}

/// Color scale for choropleth values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorAxis {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_color: Option<String>,
    pub max_color: Option<String>,
    pub r#type: Option<ColorAxisType>,
    pub stops: Option<Vec<ColorStop>>,
    pub data_classes: Option<Vec<JsObject>>,
}

impl HighchartsMeta for ColorAxis {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            min: f.parse("min")?,
            max: f.parse("max")?,
            min_color: f.parse("minColor")?,
            max_color: f.parse("maxColor")?,
            r#type: f.parse("type")?,
            stops: f.parse("stops")?,
            data_classes: f.parse("dataClasses")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("min", &self.min)
            .set("max", &self.max)
            .set("minColor", &self.min_color)
            .set("maxColor", &self.max_color)
            .set("type", &self.r#type)
            .set("stops", &self.stops)
            .set("dataClasses", &self.data_classes)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_are_validated() {
        let axis = ColorAxis::from_json(r##"{"stops": [[0, "#fff"], [1, "#000"]], "type": "Logarithmic"}"##).unwrap();
        assert_eq!(axis.stops.as_ref().unwrap()[1].color, "#000");
        assert_eq!(axis.r#type, Some(ColorAxisType::Logarithmic));
        assert_eq!(ColorAxis::from_dict(&axis.to_dict()).unwrap(), axis);

        let err = ColorAxis::from_json(r##"{"stops": [[1.5, "#fff"]]}"##).unwrap_err();
        assert_eq!(err.to_string(), "stops expects a value of at most 1. Received: 1.5");
    }
}
