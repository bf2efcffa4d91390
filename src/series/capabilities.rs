//! Property groups shared by several series types.

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::map_data::MapSource;
use crate::meta::{Fields, FromJs, HighchartsMeta, ObjectBuilder, ToJs, js_enum};
use crate::validate::{self, Extent, NumberOrString, Toggle};

js_enum! {
    pub enum Stacking ("stacking") {
        Normal => "normal",
        Percent => "percent",
        Stream => "stream",
        Overlap => "overlap",
    }
}

js_enum! {
    pub enum NullInteraction ("null_interaction") {
        Hover => "hover",
        Ignore => "ignore",
    }
}

js_enum! {
    pub enum SizeBy ("size_by") {
        Area => "area",
        Width => "width",
    }
}

/// Axis-based drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartesianFields {
    pub x_axis: Option<NumberOrString>,
    pub y_axis: Option<NumberOrString>,
    pub line_width: Option<f64>,
    pub dash_style: Option<String>,
    pub marker: Option<JsObject>,
    pub stacking: Option<Stacking>,
    pub threshold: Option<f64>,
    pub point_start: Option<f64>,
    pub point_interval: Option<f64>,
    pub connect_nulls: Option<bool>,
    pub negative_color: Option<String>,
    pub color_by_point: Option<bool>,
}

impl HighchartsMeta for CartesianFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            x_axis: f.parse("xAxis")?,
            y_axis: f.parse("yAxis")?,
            line_width: validate::non_negative("line_width", f.parse("lineWidth")?)?,
            dash_style: f.parse("dashStyle")?,
            marker: f.parse("marker")?,
            stacking: f.parse("stacking")?,
            threshold: f.parse("threshold")?,
            point_start: f.parse("pointStart")?,
            point_interval: f.parse("pointInterval")?,
            connect_nulls: f.parse("connectNulls")?,
            negative_color: f.parse("negativeColor")?,
            color_by_point: f.parse("colorByPoint")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("xAxis", &self.x_axis)
            .set("yAxis", &self.y_axis)
            .set("lineWidth", &self.line_width)
            .set("dashStyle", &self.dash_style)
            .set("marker", &self.marker)
            .set("stacking", &self.stacking)
            .set("threshold", &self.threshold)
            .set("pointStart", &self.point_start)
            .set("pointInterval", &self.point_interval)
            .set("connectNulls", &self.connect_nulls)
            .set("negativeColor", &self.negative_color)
            .set("colorByPoint", &self.color_by_point)
            .build()
    }
}

/// How map features are matched to data points: one shared key, or
/// `[map key, data key]`.
#[derive(Clone, Debug, PartialEq)]
pub enum JoinBy {
    Key(String),
    Pair(String, String),
}

impl FromJs for JoinBy {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::String(key) => Ok(JoinBy::Key(key.clone())),
            JsValue::Array(keys) if keys.len() == 1 => Ok(JoinBy::Key(String::from_js(&keys[0])?)),
            JsValue::Array(keys) if keys.len() == 2 => {
                Ok(JoinBy::Pair(String::from_js(&keys[0])?, String::from_js(&keys[1])?))
            }
            other => Err(Error::value(format!("expects a key or a pair of keys, received {}", other.describe()))),
        }
    }
}

impl ToJs for JoinBy {
    fn to_js(&self) -> JsValue {
        match self {
            JoinBy::Key(key) => JsValue::String(key.clone()),
            JoinBy::Pair(map_key, data_key) => JsValue::Array(vec![map_key.as_str().into(), data_key.as_str().into()]),
        }
    }
}

/// Geometry drawn from map data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapFields {
    pub map_data: Option<MapSource>,
    pub join_by: Option<JoinBy>,
    pub all_areas: Option<bool>,
    pub null_color: Option<String>,
    pub null_interaction: Option<NullInteraction>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub affects_map_view: Option<bool>,
    pub color_axis: Option<NumberOrString>,
    pub color_key: Option<String>,
}

impl MapFields {
    /// Coerces `map_data` the way it is read from options.
    pub fn set_map_data(&mut self, value: &JsValue) -> Result<()> {
        self.map_data = Some(MapSource::coerce(value, "map_data", false)?);
        Ok(())
    }

    pub fn is_async(&self) -> bool { self.map_data.as_ref().is_some_and(MapSource::is_async) }
}

impl HighchartsMeta for MapFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            map_data: f.get("mapData").map(|v| MapSource::coerce(v, "map_data", false)).transpose()?,
            join_by: f.parse("joinBy")?,
            all_areas: f.parse("allAreas")?,
            null_color: f.parse("nullColor")?,
            null_interaction: f.parse("nullInteraction")?,
            border_color: f.parse("borderColor")?,
            border_width: validate::non_negative("border_width", f.parse("borderWidth")?)?,
            affects_map_view: f.parse("affectsMapView")?,
            color_axis: f.parse("colorAxis")?,
            color_key: f.parse("colorKey")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("mapData", &self.map_data)
            .set("joinBy", &self.join_by)
            .set("allAreas", &self.all_areas)
            .set("nullColor", &self.null_color)
            .set("nullInteraction", &self.null_interaction)
            .set("borderColor", &self.border_color)
            .set("borderWidth", &self.border_width)
            .set("affectsMapView", &self.affects_map_view)
            .set("colorAxis", &self.color_axis)
            .set("colorKey", &self.color_key)
            .build()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapLineFields {
    pub fill_color: Option<String>,
    pub line_width: Option<f64>,
}

impl HighchartsMeta for MapLineFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            fill_color: f.parse("fillColor")?,
            line_width: validate::non_negative("line_width", f.parse("lineWidth")?)?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("fillColor", &self.fill_color)
            .set("lineWidth", &self.line_width)
            .build()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapPointFields {
    /// Marker clustering settings.
    pub cluster: Option<JsObject>,
    pub marker: Option<JsObject>,
}

impl HighchartsMeta for MapPointFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self { cluster: f.parse("cluster")?, marker: f.parse("marker")? })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("cluster", &self.cluster)
            .set("marker", &self.marker)
            .build()
    }
}

/// Bubble sizing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BubbleFields {
    pub min_size: Option<Extent>,
    pub max_size: Option<Extent>,
    pub size_by: Option<SizeBy>,
    pub size_by_absolute_value: Option<bool>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
    pub z_threshold: Option<f64>,
    pub display_negative: Option<bool>,
}

impl HighchartsMeta for BubbleFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            min_size: f.parse("minSize")?,
            max_size: f.parse("maxSize")?,
            size_by: f.parse("sizeBy")?,
            size_by_absolute_value: f.parse("sizeByAbsoluteValue")?,
            z_min: f.parse("zMin")?,
            z_max: f.parse("zMax")?,
            z_threshold: f.parse("zThreshold")?,
            display_negative: f.parse("displayNegative")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("minSize", &self.min_size)
            .set("maxSize", &self.max_size)
            .set("sizeBy", &self.size_by)
            .set("sizeByAbsoluteValue", &self.size_by_absolute_value)
            .set("zMin", &self.z_min)
            .set("zMax", &self.z_max)
            .set("zThreshold", &self.z_threshold)
            .set("displayNegative", &self.display_negative)
            .build()
    }
}

/// Cell sizes for grid-based series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridFields {
    pub colsize: Option<f64>,
    pub rowsize: Option<f64>,
    /// `true`/`false`, or `{enabled, blur}`.
    pub interpolation: Option<Toggle>,
}

impl HighchartsMeta for GridFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            colsize: validate::non_negative("colsize", f.parse("colsize")?)?,
            rowsize: validate::non_negative("rowsize", f.parse("rowsize")?)?,
            interpolation: f.parse("interpolation")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("colsize", &self.colsize)
            .set("rowsize", &self.rowsize)
            .set("interpolation", &self.interpolation)
            .build()
    }
}

/// Tile source of a `tiledwebmap` series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Provider {
    /// Provider name such as `OpenStreetMap` or `Esri`.
    pub r#type: Option<String>,
    pub theme: Option<String>,
    pub subdomain: Option<String>,
    /// Custom tile URL template with `{x}`, `{y}` and `{zoom}` placeholders.
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl HighchartsMeta for Provider {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            r#type: f.parse("type")?,
            theme: f.parse("theme")?,
            subdomain: f.parse("subdomain")?,
            url: f.parse("url")?,
            api_key: f.parse("apiKey")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("type", &self.r#type)
            .set("theme", &self.theme)
            .set("subdomain", &self.subdomain)
            .set("url", &self.url)
            .set("apiKey", &self.api_key)
            .build()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TiledWebMapFields {
    pub provider: Option<Provider>,
}

impl HighchartsMeta for TiledWebMapFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        Ok(Self { provider: Fields::new(obj).model("provider")? })
    }

    fn to_untrimmed(&self) -> JsObject { ObjectBuilder::new().model("provider", &self.provider).build() }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PieFields {
    center: Option<Vec<NumberOrString>>,
    pub size: Option<Extent>,
    pub inner_size: Option<Extent>,
    pub start_angle: Option<f64>,
    pub end_angle: Option<f64>,
}

impl PieFields {
    #[inline] pub fn center(&self) -> Option<&[NumberOrString]> { self.center.as_deref() }

    /// `[x, y]` in pixels or percentages of the plot area.
    pub fn set_center(&mut self, center: Option<Vec<NumberOrString>>) -> Result<()> {
        self.center = validate::arity("center", center, 2, 2)?;
        Ok(())
    }
}

impl HighchartsMeta for PieFields {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let mut pie = Self {
            size: f.parse("size")?,
            inner_size: f.parse("innerSize")?,
            start_angle: f.parse("startAngle")?,
            end_angle: f.parse("endAngle")?,
            ..Self::default()
        };
        pie.set_center(f.parse("center")?)?;
        Ok(pie)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("center", &self.center)
            .set("size", &self.size)
            .set("innerSize", &self.inner_size)
            .set("startAngle", &self.start_angle)
            .set("endAngle", &self.end_angle)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_by_shapes() {
        let fields = MapFields::from_js_literal("{joinBy: ['iso-a2', 'code'], nullColor: '#eee'}").unwrap();
        assert_eq!(fields.join_by, Some(JoinBy::Pair("iso-a2".into(), "code".into())));
        let fields = MapFields::from_js_literal("{joinBy: 'hc-key'}").unwrap();
        assert_eq!(fields.join_by, Some(JoinBy::Key("hc-key".into())));
    }

    #[test]
    fn map_data_accepts_urls_but_not_indexes() {
        let fields = MapFields::from_js_literal("{mapData: 'https://code.highcharts.com/mapdata/custom/world.topo.json'}").unwrap();
        assert!(fields.is_async());
        let err = MapFields::from_js_literal("{mapData: 3}").unwrap_err();
        assert!(err.to_string().starts_with("map_data expects a value that is str"));
    }

    #[test]
    fn pie_center_arity() {
        let pie = PieFields::from_js_literal("{center: ['50%', 100], innerSize: '40%'}").unwrap();
        assert_eq!(pie.center().map(<[_]>::len), Some(2));
        assert!(PieFields::from_js_literal("{center: [1, 2, 3]}").is_err());
    }

    #[test]
    fn interpolation_toggle() {
        let grid = GridFields::from_js_literal("{colsize: 2, interpolation: {enabled: true, blur: 1}}").unwrap();
        assert!(matches!(grid.interpolation, Some(Toggle::Settings(_))));
        let grid = GridFields::from_js_literal("{interpolation: false}").unwrap();
        assert_eq!(grid.interpolation, Some(Toggle::Flag(false)));
    }

    #[test]
    fn provider_dict() {
        let provider = Provider::from_json(r#"{"type": "OpenStreetMap", "theme": "Standard", "api_key": "k"}"#).unwrap();
        assert_eq!(provider.api_key.as_deref(), Some("k"));
        assert_eq!(provider.to_json().unwrap(), r#"{"type":"OpenStreetMap","theme":"Standard","apiKey":"k"}"#);
    }
}
