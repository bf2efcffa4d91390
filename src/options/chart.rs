use crate::error::Result;
use crate::js::{JsObject, JsValue};
use crate::map_data::{AsyncMapData, MapSource};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::series::SeriesType;
use crate::validate::{self, BoundingArray, Extent};

/// The `chart` options: canvas, sizing, and the chart-wide map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartOptions {
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    border_radius: Option<f64>,
    border_width: Option<f64>,
    pub class_name: Option<String>,
    pub height: Option<Extent>,
    pub width: Option<Extent>,
    pub margin: Option<BoundingArray>,
    pub plot_background_color: Option<String>,
    pub reflow: Option<bool>,
    pub render_to: Option<String>,
    pub spacing: Option<BoundingArray>,
    pub styled_mode: Option<bool>,
    /// Default series type.
    pub r#type: Option<SeriesType>,
    pub zooming: Option<JsObject>,
    pub events: Option<JsObject>,
    map: Option<MapSource>,
    /// Per-region positioning for maps that combine several projections.
    pub map_transforms: Option<JsObject>,
    /// The `proj4` library reference, usually the `proj4` variable.
    pub proj4: Option<JsValue>,
}

impl ChartOptions {
    #[inline] pub fn border_radius(&self) -> Option<f64> { self.border_radius }
    #[inline] pub fn border_width(&self) -> Option<f64> { self.border_width }
    #[inline] pub fn map(&self) -> Option<&MapSource> { self.map.as_ref() }

    pub fn set_border_radius(&mut self, radius: Option<f64>) -> Result<()> {
        self.border_radius = validate::non_negative("border_radius", radius)?;
        Ok(())
    }

    pub fn set_border_width(&mut self, width: Option<f64>) -> Result<()> {
        self.border_width = validate::non_negative("border_width", width)?;
        Ok(())
    }

    /// Coerce and store the chart-wide map: a URL, an async descriptor, a
    /// variable, an index, or TopoJSON/GeoJSON content.
    pub fn set_map(&mut self, value: impl Into<JsValue>) -> Result<()> {
        self.map = Some(MapSource::coerce(&value.into(), "map", true)?);
        Ok(())
    }

    pub fn set_map_source(&mut self, source: Option<MapSource>) { self.map = source; }

    /// True when the chart-wide map is fetched client-side.
    pub fn is_async(&self) -> bool { self.map.as_ref().is_some_and(MapSource::is_async) }

    pub fn async_slots(&self) -> Vec<&AsyncMapData> {
        self.map.as_ref().map(MapSource::async_slots).unwrap_or_default()
    }
}

impl HighchartsMeta for ChartOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let mut chart = Self {
            background_color: f.parse("backgroundColor")?,
            border_color: f.parse("borderColor")?,
            class_name: f.parse("className")?,
            height: f.parse("height")?,
            width: f.parse("width")?,
            margin: f.parse("margin")?,
            plot_background_color: f.parse("plotBackgroundColor")?,
            reflow: f.parse("reflow")?,
            render_to: f.parse("renderTo")?,
            spacing: f.parse("spacing")?,
            styled_mode: f.parse("styledMode")?,
            r#type: f.parse("type")?,
            zooming: f.parse("zooming")?,
            events: f.parse("events")?,
            map: f.parse("map")?,
            map_transforms: f.parse("mapTransforms")?,
            proj4: f.raw("proj4"),
            ..Self::default()
        };
        chart.set_border_radius(f.parse("borderRadius")?)?;
        chart.set_border_width(f.parse("borderWidth")?)?;
        Ok(chart)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("backgroundColor", &self.background_color)
            .set("borderColor", &self.border_color)
            .set("borderRadius", &self.border_radius)
            .set("borderWidth", &self.border_width)
            .set("className", &self.class_name)
            .set("height", &self.height)
            .set("width", &self.width)
            .set("margin", &self.margin)
            .set("plotBackgroundColor", &self.plot_background_color)
            .set("reflow", &self.reflow)
            .set("renderTo", &self.render_to)
            .set("spacing", &self.spacing)
            .set("styledMode", &self.styled_mode)
            .set("type", &self.r#type)
            .set("zooming", &self.zooming)
            .set("events", &self.events)
            .set("map", &self.map)
            .set("mapTransforms", &self.map_transforms)
            .set("proj4", &self.proj4)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    const URL: &str = "https://code.highcharts.com/mapdata/custom/world.topo.json";

    #[test]
    fn map_url_becomes_async() {
        let mut chart = ChartOptions::default();
        chart.set_map(URL).unwrap();
        assert!(chart.is_async());
        assert_eq!(chart.async_slots()[0].url(), URL);
    }

    #[test]
    fn map_object_with_url_becomes_async() {
        let chart = ChartOptions::from_json(&json!({"map": {"url": URL, "fetchCounter": 2}}).to_string()).unwrap();
        assert_eq!(chart.async_slots()[0].fetch_counter(), 2);
    }

    #[test]
    fn map_rejects_other_text() {
        let mut chart = ChartOptions::default();
        let err = chart.set_map("not a url or json").unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(err.to_string().starts_with("map expects a value that is str, TopoJSON, GeoJSON"));
        assert!(chart.map().is_none());
    }

    #[test]
    fn map_accepts_indexes_and_variables() {
        let chart = ChartOptions::from_js_literal("{map: 0, type: 'map'}").unwrap();
        assert_eq!(chart.map(), Some(&MapSource::Index(0)));
        let chart = ChartOptions::from_js_literal("{map: Highcharts.maps.world}").unwrap();
        assert!(matches!(chart.map(), Some(MapSource::Variable(_))));
        assert_eq!(chart.to_js_literal(), "{\n  map: Highcharts.maps.world\n}");
    }

    #[test]
    fn sizing_values() {
        let chart = ChartOptions::from_js_literal("{height: '60%', margin: [10, 0, 10, 0], borderRadius: 4}").unwrap();
        assert_eq!(chart.height, Some(Extent::Percent("60%".into())));
        assert!(ChartOptions::from_js_literal("{borderWidth: -1}").is_err());
        assert_eq!(ChartOptions::from_dict(&chart.to_dict()).unwrap(), chart);
    }
}
