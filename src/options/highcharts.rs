use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::js::{JsObject, JsValue};
use crate::map_data::AsyncMapData;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::options::{
    ChartOptions, ColorAxis, Credits, Drilldown, Legend, MapNavigationOptions, MapViewOptions, PlotOptions,
    TitleOptions,
};
use crate::series::{Series, SeriesType};

const STANDARD_KEYS: &[&str] = &[
    "chart", "colorAxis", "colors", "credits", "drilldown", "exporting", "legend", "plotOptions",
    "series", "subtitle", "title", "tooltip",
];

const MAPS_KEYS: &[&str] = &["mapNavigation", "mapView"];

fn is_reserved(key: &str, reserved: &[&str]) -> bool {
    let camel = crate::meta::camel_case(key);
    STANDARD_KEYS.contains(&camel.as_str()) || reserved.contains(&camel.as_str())
}

/// Top-level options of a standard Highcharts chart.
///
/// Top-level keys without a typed field (`xAxis`, `accessibility`, ...) are
/// passed through in `extra`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighchartsOptions {
    pub chart: Option<ChartOptions>,
    pub color_axis: Option<Vec<ColorAxis>>,
    pub colors: Option<Vec<String>>,
    pub credits: Option<Credits>,
    pub drilldown: Option<Drilldown>,
    pub exporting: Option<JsObject>,
    pub legend: Option<Legend>,
    pub plot_options: Option<PlotOptions>,
    pub series: Option<Vec<Series>>,
    pub subtitle: Option<TitleOptions>,
    pub title: Option<TitleOptions>,
    pub tooltip: Option<JsObject>,
    pub extra: JsObject,
}

impl HighchartsOptions {
    /// Read options; series without a `type` take `chart.type`, else `default_type`.
    pub(crate) fn read(obj: &JsObject, default_type: SeriesType, reserved: &[&str]) -> Result<Self> {
        let f = Fields::new(obj);
        let chart: Option<ChartOptions> = f.model("chart")?;
        let default_type = chart.as_ref().and_then(|c| c.r#type).unwrap_or(default_type);

        let series = match f.get("series") {
            None => None,
            Some(JsValue::Array(items)) => Some(
                items.iter().map(|item| Series::read_value(item, default_type)).collect::<Result<Vec<_>>>()?,
            ),
            Some(single) => Some(vec![Series::read_value(single, default_type)?]),
        };
        let drilldown = match f.get("drilldown") {
            Some(JsValue::Object(drilldown)) => Some(Drilldown::read(drilldown, default_type)?),
            _ => f.model("drilldown")?,
        };
        let extra = obj.iter()
            .filter(|(key, _)| !is_reserved(key, reserved))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            chart,
            color_axis: f.models("colorAxis")?,
            colors: f.list("colors")?,
            credits: f.model("credits")?,
            drilldown,
            exporting: f.parse("exporting")?,
            legend: f.model("legend")?,
            plot_options: f.model("plotOptions")?,
            series,
            subtitle: f.model("subtitle")?,
            title: f.model("title")?,
            tooltip: f.parse("tooltip")?,
            extra,
        })
    }

    pub fn add_series(&mut self, series: impl IntoIterator<Item = Series>) {
        self.series.get_or_insert_with(Vec::new).extend(series);
    }

    /// True if the chart map, a series, or a drilldown series fetches its map client-side.
    pub fn is_async(&self) -> bool {
        self.chart.as_ref().is_some_and(ChartOptions::is_async)
            || self.series.iter().flatten().any(Series::is_async)
            || self.drilldown.as_ref().is_some_and(Drilldown::is_async)
    }

    /// Async map slots in serialization order: chart map, series, then drilldown series.
    pub fn async_slots(&self) -> Vec<&AsyncMapData> {
        let mut slots = self.chart.as_ref().map(ChartOptions::async_slots).unwrap_or_default();
        slots.extend(self.series.iter().flatten().flat_map(Series::async_slots));
        if let Some(drilldown) = &self.drilldown {
            slots.extend(drilldown.series.iter().flatten().flat_map(Series::async_slots));
        }
        slots
    }

    /// Series types used anywhere in the options, in first-seen order.
    pub fn series_types(&self) -> Vec<SeriesType> {
        let mut types: Vec<SeriesType> = Vec::new();
        let drilldown = self.drilldown.iter().flat_map(|d| d.series.iter().flatten());
        for series in self.series.iter().flatten().chain(drilldown) {
            if !types.contains(&series.series_type()) {
                types.push(series.series_type());
            }
        }
        types
    }
}

impl HighchartsMeta for HighchartsOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(obj, SeriesType::Line, &[]) }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .model("chart", &self.chart)
            .models("colorAxis", &self.color_axis)
            .set("colors", &self.colors)
            .model("credits", &self.credits)
            .model("drilldown", &self.drilldown)
            .set("exporting", &self.exporting)
            .model("legend", &self.legend)
            .model("plotOptions", &self.plot_options)
            .models("series", &self.series)
            .model("subtitle", &self.subtitle)
            .model("title", &self.title)
            .set("tooltip", &self.tooltip)
            .merge(self.extra.clone())
            .build()
    }
}

/// Options of a Highcharts Maps chart: the standard options plus map
/// navigation and the map view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighchartsMapsOptions {
    pub base: HighchartsOptions,
    pub map_navigation: Option<MapNavigationOptions>,
    pub map_view: Option<MapViewOptions>,
}

impl HighchartsMapsOptions {
    pub(crate) fn read(obj: &JsObject, reserved: &[&str]) -> Result<Self> {
        let f = Fields::new(obj);
        let reserved: Vec<&str> = MAPS_KEYS.iter().chain(reserved).copied().collect();
        Ok(Self {
            base: HighchartsOptions::read(obj, SeriesType::Map, &reserved)?,
            map_navigation: f.model("mapNavigation")?,
            map_view: f.model("mapView")?,
        })
    }

    pub fn uses_custom_projection(&self) -> bool {
        self.map_view.as_ref().is_some_and(MapViewOptions::uses_custom_projection)
    }

    /// Members after the standard ones, before passthrough keys.
    pub(crate) fn untrimmed_with(&self, tail: JsObject) -> JsObject {
        let mut extra = self.base.extra.clone();
        let mut obj = self.base.to_untrimmed();
        obj.retain(|key, _| !extra.contains_key(key));
        let builder = ObjectBuilder::new()
            .merge(obj)
            .model("mapNavigation", &self.map_navigation)
            .model("mapView", &self.map_view)
            .merge(tail);
        extra.retain(|key, _| !is_reserved(key, MAPS_KEYS));
        builder.merge(extra).build()
    }
}

impl Deref for HighchartsMapsOptions {
    type Target = HighchartsOptions;
    fn deref(&self) -> &HighchartsOptions { &self.base }
}

impl DerefMut for HighchartsMapsOptions {
    fn deref_mut(&mut self) -> &mut HighchartsOptions { &mut self.base }
}

impl HighchartsMeta for HighchartsMapsOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(obj, &[]) }

    fn to_untrimmed(&self) -> JsObject { self.untrimmed_with(JsObject::new()) }
}

impl From<HighchartsOptions> for HighchartsMapsOptions {
    fn from(base: HighchartsOptions) -> Self { Self { base, ..Self::default() } }
}

/// Chart options in either flavor.
#[derive(Clone, Debug, PartialEq)]
pub enum Options {
    Standard(HighchartsOptions),
    Maps(HighchartsMapsOptions),
}

impl Options {
    /// True if `obj` carries maps-only settings.
    pub fn has_maps_settings(obj: &JsObject) -> bool {
        let f = Fields::new(obj);
        MAPS_KEYS.iter().any(|key| f.contains(key))
    }

    #[inline] pub fn is_maps(&self) -> bool { matches!(self, Options::Maps(_)) }

    pub fn base(&self) -> &HighchartsOptions {
        match self {
            Options::Standard(options) => options,
            Options::Maps(options) => &options.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut HighchartsOptions {
        match self {
            Options::Standard(options) => options,
            Options::Maps(options) => &mut options.base,
        }
    }

    pub fn map_view(&self) -> Option<&MapViewOptions> {
        match self {
            Options::Maps(options) => options.map_view.as_ref(),
            Options::Standard(_) => None,
        }
    }

    /// True when the options hold settings only a maps chart understands.
    pub fn uses_maps_settings(&self) -> bool {
        matches!(self, Options::Maps(o) if o.map_view.is_some() || o.map_navigation.is_some())
    }

    /// Convert to the maps flavor, keeping everything.
    pub fn into_maps(self) -> HighchartsMapsOptions {
        match self {
            Options::Standard(options) => options.into(),
            Options::Maps(options) => options,
        }
    }
}

impl Default for Options {
    fn default() -> Self { Options::Standard(HighchartsOptions::default()) }
}

impl HighchartsMeta for Options {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        if Self::has_maps_settings(obj) {
            HighchartsMapsOptions::from_js_object(obj).map(Options::Maps)
        } else {
            HighchartsOptions::from_js_object(obj).map(Options::Standard)
        }
    }

    fn to_untrimmed(&self) -> JsObject {
        match self {
            Options::Standard(options) => options.to_untrimmed(),
            Options::Maps(options) => options.to_untrimmed(),
        }
    }
}

impl From<HighchartsOptions> for Options {
    fn from(options: HighchartsOptions) -> Self { Options::Standard(options) }
}

impl From<HighchartsMapsOptions> for Options {
    fn from(options: HighchartsMapsOptions) -> Self { Options::Maps(options) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_keys_select_the_maps_flavor() {
        let options = Options::from_json(&json!({"title": {"text": "World"}, "map_view": {"zoom": 2}}).to_string()).unwrap();
        assert!(options.is_maps());
        assert!(options.uses_maps_settings());
        let options = Options::from_json(r#"{"title": {"text": "World"}}"#).unwrap();
        assert!(!options.is_maps());
    }

    #[test]
    fn unknown_top_level_keys_pass_through() {
        let options = HighchartsMapsOptions::from_js_literal("{
            xAxis: {visible: false},
            title: {text: 'Population'},
            mapView: {zoom: 1},
            accessibility: {enabled: false}
        }").unwrap();
        assert_eq!(options.extra.len(), 2);
        let keys: Vec<_> = options.to_dict().keys().cloned().collect();
        assert_eq!(keys, vec!["title", "mapView", "xAxis", "accessibility"]);
        assert_eq!(HighchartsMapsOptions::from_dict(&options.to_dict()).unwrap(), options);
    }

    #[test]
    fn series_default_to_chart_type() {
        let options = HighchartsOptions::from_js_literal("{chart: {type: 'mappoint'}, series: [{data: [['Oslo', 1]]}]}").unwrap();
        assert_eq!(options.series.as_ref().unwrap()[0].series_type(), SeriesType::MapPoint);
        let maps = HighchartsMapsOptions::from_js_literal("{series: [{data: [1]}]}").unwrap();
        assert_eq!(maps.series.as_ref().unwrap()[0].series_type(), SeriesType::Map);
    }

    #[test]
    fn async_slots_in_order() {
        let options = HighchartsMapsOptions::from_js_literal("{
            chart: {map: 'https://x/a.json'},
            series: [{mapData: 'https://x/b.json'}, {type: 'mappoint', data: [1]}],
            drilldown: {series: [{mapData: 'https://x/c.json'}]}
        }").unwrap();
        assert!(options.is_async());
        let urls: Vec<_> = options.async_slots().iter().map(|s| s.url().to_string()).collect();
        assert_eq!(urls, vec!["https://x/a.json", "https://x/b.json", "https://x/c.json"]);
        assert_eq!(options.series_types(), vec![SeriesType::Map, SeriesType::MapPoint]);
    }
}
