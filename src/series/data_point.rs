use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue, render_compact};
use crate::meta::{Fields, FromJs, HighchartsMeta, ObjectBuilder, ToJs, camel_case};
use crate::series::DataShape;

/// End of a flowmap connection: a point id, or `[lon, lat]`.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Id(String),
    Coordinates(f64, f64),
}

impl FromJs for Endpoint {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::String(s) => Ok(Endpoint::Id(s.clone())),
            JsValue::Array(items) if items.len() == 2 => {
                Ok(Endpoint::Coordinates(f64::from_js(&items[0])?, f64::from_js(&items[1])?))
            }
            other => Err(Error::value(format!("expects a point id or [lon, lat], received {}", other.describe()))),
        }
    }
}

impl ToJs for Endpoint {
    fn to_js(&self) -> JsValue {
        match self {
            Endpoint::Id(id) => JsValue::String(id.clone()),
            Endpoint::Coordinates(lon, lat) => JsValue::Array(vec![(*lon).into(), (*lat).into()]),
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "id", "name", "x", "y", "z", "value", "lat", "lon", "from", "to", "weight", "color",
    "geometry", "path", "middleX", "middleY", "labelRank", "selected", "description",
    "custom", "drilldown",
];

/// One entry of a series' `data`.
///
/// Keys without a typed field, such as the `hc-key` join key of Highcharts
/// map collections, are kept in `extra` in their original order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataPoint {
    pub id: Option<String>,
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub value: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub from: Option<Endpoint>,
    pub to: Option<Endpoint>,
    pub weight: Option<f64>,
    pub color: Option<String>,
    /// GeoJSON geometry drawn for this point.
    pub geometry: Option<JsObject>,
    /// SVG path drawn for this point.
    pub path: Option<String>,
    pub middle_x: Option<f64>,
    pub middle_y: Option<f64>,
    pub label_rank: Option<f64>,
    pub selected: Option<bool>,
    pub description: Option<String>,
    pub custom: Option<JsObject>,
    /// Id of the drilldown series opened from this point.
    pub drilldown: Option<String>,
    pub extra: JsObject,
}

fn collection_error() -> Error { Error::value("data expects either a 1D or 2D collection") }

fn label(value: &JsValue) -> Result<String> {
    match value {
        JsValue::String(s) => Ok(s.clone()),
        JsValue::Number(n) => Ok(render_compact(&JsValue::Number(*n))),
        _ => Err(collection_error()),
    }
}

fn number(value: &JsValue) -> Result<Option<f64>> {
    match value {
        JsValue::Null | JsValue::Undefined => Ok(None),
        other => f64::from_js(other).map(Some).map_err(|_| collection_error()),
    }
}

impl DataPoint {
    /// Read one data entry in the layout `shape` expects.
    pub fn from_array(shape: DataShape, item: &JsValue) -> Result<Self> {
        if let JsValue::Object(obj) = item {
            return Self::from_js_object(obj);
        }
        let mut point = Self::default();
        match (shape, item) {
            (DataShape::None, _) => return Err(Error::value("data is not supported by this series type")),

            (DataShape::Value | DataShape::Grid, JsValue::Number(_) | JsValue::Null) => point.value = number(item)?,
            (DataShape::Z | DataShape::Xyz, JsValue::Number(_) | JsValue::Null) => point.z = number(item)?,
            (DataShape::LatLon | DataShape::Cartesian | DataShape::Named, JsValue::Number(_) | JsValue::Null) => {
                point.y = number(item)?
            }

            (DataShape::Value, JsValue::Array(v)) if v.len() == 2 => {
                point.name = Some(label(&v[0])?);
                point.value = number(&v[1])?;
            }
            (DataShape::Z | DataShape::Xyz, JsValue::Array(v)) if v.len() == 1 => point.z = number(&v[0])?,
            (DataShape::Z | DataShape::Xyz, JsValue::Array(v)) if v.len() == 2 => {
                point.name = Some(label(&v[0])?);
                point.z = number(&v[1])?;
            }
            (DataShape::Xyz, JsValue::Array(v)) if v.len() == 3 => {
                point.x = number(&v[0])?;
                point.y = number(&v[1])?;
                point.z = number(&v[2])?;
            }
            (DataShape::LatLon | DataShape::Named, JsValue::Array(v)) if v.len() == 2 => {
                point.name = Some(label(&v[0])?);
                point.y = number(&v[1])?;
            }
            (DataShape::Cartesian, JsValue::Array(v)) if v.len() == 2 => {
                match &v[0] {
                    JsValue::String(name) => point.name = Some(name.clone()),
                    x => point.x = number(x)?,
                }
                point.y = number(&v[1])?;
            }
            (DataShape::Grid, JsValue::Array(v)) if v.len() == 3 => {
                point.x = number(&v[0])?;
                point.y = number(&v[1])?;
                point.value = number(&v[2])?;
            }
            (DataShape::Connection, JsValue::Array(v)) if v.len() == 2 || v.len() == 3 => {
                point.from = Some(Endpoint::from_js(&v[0]).map_err(|_| collection_error())?);
                point.to = Some(Endpoint::from_js(&v[1]).map_err(|_| collection_error())?);
                if let Some(weight) = v.get(2) {
                    point.weight = number(weight)?;
                }
            }
            _ => return Err(collection_error()),
        }
        Ok(point)
    }

    /// Read a whole `data` array.
    pub fn from_collection(shape: DataShape, value: &JsValue) -> Result<Vec<Self>> {
        match value {
            JsValue::Array(items) => items.iter().map(|item| Self::from_array(shape, item)).collect(),
            _ => Err(collection_error()),
        }
    }

    /// Set a property by its JavaScript or snake_case name; unknown names go to `extra`.
    pub fn set_property(&mut self, key: &str, value: JsValue) -> Result<()> {
        let mut members = self.to_untrimmed();
        let camel = camel_case(key);
        let key = if KNOWN_KEYS.contains(&camel.as_str()) { camel } else { key.to_string() };
        members.insert(key, value);
        *self = Self::from_js_object(&members)?;
        Ok(())
    }
}

impl HighchartsMeta for DataPoint {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let extra = obj.iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()) && !KNOWN_KEYS.contains(&camel_case(key).as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self {
            id: f.text("id")?,
            name: f.text("name")?,
            x: f.parse("x")?,
            y: f.parse("y")?,
            z: f.parse("z")?,
            value: f.parse("value")?,
            lat: f.parse("lat")?,
            lon: f.parse("lon")?,
            from: f.parse("from")?,
            to: f.parse("to")?,
            weight: f.parse("weight")?,
            color: f.parse("color")?,
            geometry: f.parse("geometry")?,
            path: f.parse("path")?,
            middle_x: f.parse("middleX")?,
            middle_y: f.parse("middleY")?,
            label_rank: f.parse("labelRank")?,
            selected: f.parse("selected")?,
            description: f.parse("description")?,
            custom: f.parse("custom")?,
            drilldown: f.text("drilldown")?,
            extra,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("id", &self.id)
            .set("name", &self.name)
            .set("x", &self.x)
            .set("y", &self.y)
            .set("z", &self.z)
            .set("value", &self.value)
            .set("lat", &self.lat)
            .set("lon", &self.lon)
            .set("from", &self.from)
            .set("to", &self.to)
            .set("weight", &self.weight)
            .set("color", &self.color)
            .set("geometry", &self.geometry)
            .set("path", &self.path)
            .set("middleX", &self.middle_x)
            .set("middleY", &self.middle_y)
            .set("labelRank", &self.label_rank)
            .set("selected", &self.selected)
            .set("description", &self.description)
            .set("custom", &self.custom)
            .set("drilldown", &self.drilldown)
            .merge(self.extra.clone())
            .build()
    }
}
