use crate::error::Result;
use crate::js::{JsObject, JsValue};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::series::{Series, SeriesType};
use crate::validate::Toggle;

/// Series opened by clicking a point, and how the transition looks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drilldown {
    pub series: Option<Vec<Series>>,
    pub allow_point_drilldown: Option<bool>,
    pub animation: Option<Toggle>,
    pub active_data_label_style: Option<JsObject>,
    pub active_axis_label_style: Option<JsObject>,
    pub breadcrumbs: Option<JsObject>,
    /// Zoom the map to the drilled-into area.
    pub map_zooming: Option<bool>,
}

impl Drilldown {
    pub(crate) fn read(obj: &JsObject, default_type: SeriesType) -> Result<Self> {
        let f = Fields::new(obj);
        let series = match f.get("series") {
            None => None,
            Some(JsValue::Array(items)) => Some(
                items.iter().map(|item| Series::read_value(item, default_type)).collect::<Result<Vec<_>>>()?,
            ),
            Some(single) => Some(vec![Series::read_value(single, default_type)?]),
        };
        Ok(Self {
            series,
            allow_point_drilldown: f.parse("allowPointDrilldown")?,
            animation: f.parse("animation")?,
            active_data_label_style: f.parse("activeDataLabelStyle")?,
            active_axis_label_style: f.parse("activeAxisLabelStyle")?,
            breadcrumbs: f.parse("breadcrumbs")?,
            map_zooming: f.parse("mapZooming")?,
        })
    }

    pub fn is_async(&self) -> bool { self.series.iter().flatten().any(Series::is_async) }
}

impl HighchartsMeta for Drilldown {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(obj, SeriesType::Map) }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .models("series", &self.series)
            .set("allowPointDrilldown", &self.allow_point_drilldown)
            .set("animation", &self.animation)
            .set("activeDataLabelStyle", &self.active_data_label_style)
            .set("activeAxisLabelStyle", &self.active_axis_label_style)
            .set("breadcrumbs", &self.breadcrumbs)
            .set("mapZooming", &self.map_zooming)
            .build()
    }
}
