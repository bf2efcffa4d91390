//! The chart: options plus everything needed to put them on a page.

mod fetches;
mod literal;

use std::path::Path;

use crate::error::{Error, Result};
use crate::export::{Constructor, ExportServer};
use crate::js::render::quote;
use crate::js::{CallbackFunction, JsObject, JsValue, VariableName, render};
use crate::map_data::MapSource;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::options::{
    ChartOptions, CustomProjection, HighchartsMapsOptions, HighchartsOptions, MapViewOptions, Options,
    ProjectionOptions,
};
use crate::series::{CsvOptions, PropertyMap, Series, SeriesType};

use fetches::Fetches;

/// Element id used when no container is set.
pub const DEFAULT_CONTAINER: &str = "highcharts_target_div";

const CDN: &str = "https://code.highcharts.com";

/// A Highcharts chart: its options, the element it renders into, and how it
/// is constructed.
///
/// A maps chart is built with `Highcharts.mapChart` and always holds
/// [`HighchartsMapsOptions`]; a standard chart uses `Highcharts.chart`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chart {
    options: Option<Options>,
    /// Id of the element the chart renders into.
    pub container: Option<String>,
    /// When set, the chart instance is assigned to this variable.
    pub variable_name: Option<VariableName>,
    /// Called once the chart has loaded.
    pub callback: Option<CallbackFunction>,
    is_maps_chart: bool,
}

impl Chart {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn options(&self) -> Option<&Options> { self.options.as_ref() }
    #[inline] pub fn options_mut(&mut self) -> Option<&mut Options> { self.options.as_mut() }
    #[inline] pub fn is_maps_chart(&self) -> bool { self.is_maps_chart }

    /// Replace the options. Maps options make this a maps chart; a maps
    /// chart converts standard options to the maps flavor.
    pub fn set_options(&mut self, options: Option<Options>) {
        self.options = match options {
            Some(Options::Maps(options)) => {
                self.is_maps_chart = true;
                Some(Options::Maps(options))
            }
            Some(options) if self.is_maps_chart => Some(Options::Maps(options.into_maps())),
            other => other,
        };
    }

    /// Switch between `Highcharts.mapChart` and `Highcharts.chart`.
    ///
    /// Options holding a map view or map navigation only make sense on a maps
    /// chart, so turning the flag off is refused while either is set.
    pub fn set_is_maps_chart(&mut self, is_maps_chart: bool) -> Result<()> {
        if is_maps_chart {
            self.is_maps_chart = true;
            self.options = self.options.take().map(|o| Options::Maps(o.into_maps()));
            return Ok(());
        }
        if self.options.as_ref().is_some_and(Options::uses_maps_settings) {
            return Err(Error::ReadOnly(
                "is_maps_chart cannot be unset while the options carry map_view or map_navigation settings".into(),
            ));
        }
        self.is_maps_chart = false;
        self.options = self.options.take().map(|options| match options {
            Options::Maps(options) => Options::Standard(options.base),
            standard => standard,
        });
        Ok(())
    }

    /// True if the chart map or any series' map data is fetched by the browser.
    pub fn is_async(&self) -> bool { self.options.as_ref().is_some_and(|o| o.base().is_async()) }

    /// True if the map view projects through a custom projection class.
    pub fn uses_custom_projection(&self) -> bool { self.custom_projection().is_some() }

    pub fn custom_projection(&self) -> Option<&CustomProjection> {
        self.options.as_ref()?.map_view()?.projection.as_ref()?.custom()
    }

    fn options_or_insert(&mut self) -> &mut Options {
        let is_maps_chart = self.is_maps_chart;
        self.options.get_or_insert_with(|| {
            if is_maps_chart {
                Options::Maps(HighchartsMapsOptions::default())
            } else {
                Options::Standard(HighchartsOptions::default())
            }
        })
    }

    /// Run `f` on the options converted to the maps flavor; the chart becomes a maps chart.
    fn with_maps_options<R>(&mut self, f: impl FnOnce(&mut HighchartsMapsOptions) -> R) -> R {
        self.is_maps_chart = true;
        let mut options = self.options.take().map(Options::into_maps).unwrap_or_default();
        let result = f(&mut options);
        self.options = Some(Options::Maps(options));
        result
    }

    pub fn add_series(&mut self, series: impl IntoIterator<Item = Series>) {
        self.options_or_insert().base_mut().add_series(series);
    }

    /// Set the chart-level map geometry, making this a maps chart.
    pub fn set_map_data(&mut self, map_data: impl Into<MapSource>) {
        let source = map_data.into();
        self.with_maps_options(|options| {
            options.chart.get_or_insert_with(ChartOptions::default).set_map_source(Some(source));
        });
    }

    /// Project the map through `projection`, registering it with the page.
    pub fn set_custom_projection(&mut self, projection: CustomProjection) {
        self.with_maps_options(|options| {
            options.map_view
                .get_or_insert_with(MapViewOptions::default)
                .projection
                .get_or_insert_with(ProjectionOptions::default)
                .set_custom(Some(projection));
        });
    }

    // -----------------------------------------------------------------------
    // Factories
    // -----------------------------------------------------------------------

    pub fn from_options(options: impl Into<Options>) -> Self {
        let mut chart = Self::new();
        chart.set_options(Some(options.into()));
        chart
    }

    /// A maps chart whose `chart.map` is `map_data`.
    pub fn from_map_data(map_data: impl Into<MapSource>) -> Self {
        let mut chart = Self::new();
        chart.set_map_data(map_data);
        chart
    }

    /// A chart holding `series`; a maps chart if any of them is a maps series type.
    pub fn from_series(series: impl IntoIterator<Item = Series>) -> Self {
        let series: Vec<Series> = series.into_iter().collect();
        let mut chart = Self::new();
        chart.is_maps_chart = series.iter().any(|s| s.series_type().is_maps_series());
        chart.add_series(series);
        chart
    }

    /// One series of `series_type` read from `values` in that type's data layout.
    pub fn from_array(values: &JsValue, series_type: &str) -> Result<Self> {
        Ok(Self::from_series([Series::from_array(series_type, values)?]))
    }

    pub fn from_csv(
        path: impl AsRef<Path>,
        property_map: Option<&PropertyMap>,
        series_type: &str,
        options: &CsvOptions,
    ) -> Result<Self> {
        Ok(Self::from_series(Series::from_csv(path, property_map, series_type, options)?))
    }

    /// One series per CSV row.
    pub fn from_csv_in_rows(path: impl AsRef<Path>, series_type: &str, options: &CsvOptions) -> Result<Self> {
        Ok(Self::from_series(Series::from_csv_in_rows(path, series_type, options)?))
    }

    #[cfg(feature = "dataframe")]
    pub fn from_dataframe(
        df: &polars::frame::DataFrame,
        property_map: Option<&PropertyMap>,
        series_type: &str,
        series_index: Option<usize>,
    ) -> Result<Self> {
        Ok(Self::from_series(Series::from_dataframe(df, property_map, series_type, series_index)?))
    }

    #[cfg(feature = "dataframe")]
    pub fn from_dataframe_in_rows(
        df: &polars::frame::DataFrame,
        series_type: &str,
        series_index: Option<usize>,
    ) -> Result<Self> {
        Ok(Self::from_series(Series::from_dataframe_in_rows(df, series_type, series_index)?))
    }

    /// A maps chart drawing the shapes of a shapefile (`.shp` or zipped) as
    /// `chart.map`, with one series whose points carry the shape attributes.
    #[cfg(feature = "shapefile")]
    pub fn from_shapefile(
        path: impl AsRef<Path>,
        property_map: Option<&PropertyMap>,
        series_type: &str,
    ) -> Result<Self> {
        series_type.parse::<SeriesType>()?;
        let features = crate::common::read_shapefile(path.as_ref())?;
        let series = Series::from_features(&features, property_map, series_type)?;
        let mut chart = Self::from_series([series]);
        chart.set_map_data(crate::map_data::MapData::from_features(&features));
        Ok(chart)
    }

    #[cfg(not(feature = "shapefile"))]
    pub fn from_shapefile(
        _path: impl AsRef<Path>,
        _property_map: Option<&PropertyMap>,
        series_type: &str,
    ) -> Result<Self> {
        series_type.parse::<SeriesType>()?;
        Err(Error::missing_feature("Chart::from_shapefile", "shapefile"))
    }

    // -----------------------------------------------------------------------
    // Page output
    // -----------------------------------------------------------------------

    /// Highcharts modules the chart needs, in load order.
    pub fn get_required_modules(&self, include_extension: bool) -> Vec<String> {
        let mut modules = vec!["highcharts"];
        if self.is_maps_chart {
            modules.push("maps/modules/map");
        }
        modules.push("modules/exporting");
        let types = self.options.as_ref().map(|o| o.base().series_types()).unwrap_or_default();
        for module in types.iter().filter_map(SeriesType::required_module) {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
        modules.into_iter()
            .map(|m| if include_extension { format!("{m}.js") } else { m.to_string() })
            .collect()
    }

    /// `<script>` tags loading [`Chart::get_required_modules`] from the Highcharts CDN.
    pub fn get_script_tags(&self) -> Vec<String> {
        self.get_required_modules(true)
            .into_iter()
            .map(|module| format!("<script src=\"{CDN}/{module}\"></script>"))
            .collect()
    }

    fn constructor(&self) -> Constructor {
        if self.is_maps_chart { Constructor::MapChart } else { Constructor::Chart }
    }

    /// Write [`HighchartsMeta::to_js_literal`] to `path`, returning the script.
    pub fn write_js_literal(&self, path: impl AsRef<Path>) -> Result<String> {
        let literal = self.to_js_literal();
        crate::common::write_atomic(path.as_ref(), literal.as_bytes())?;
        Ok(literal)
    }

    /// Render the chart through an export server.
    ///
    /// Without a server, one is configured from the environment. The image is
    /// also written to `filename` when given.
    pub fn download_chart(&self, server: Option<&ExportServer>, filename: Option<&Path>) -> Result<Vec<u8>> {
        let mut server = match server {
            Some(server) => server.clone(),
            None => ExportServer::from_env()?,
        };
        server.constructor = Some(self.constructor());
        let options = self.options.clone().unwrap_or_default();
        if options.base().is_async() {
            log::warn!("[chart] the export server cannot fetch map data; async slots are sent as-is");
        }
        server.request_chart(&options, filename)
    }
}

impl HighchartsMeta for Chart {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let mut chart = Self {
            container: f.text("container")?.or(f.text("renderTo")?),
            variable_name: f.parse("variableName")?,
            callback: f.parse("callback")?,
            ..Self::default()
        };
        if f.parse::<bool>("isMapsChart")?.unwrap_or(false) {
            chart.set_is_maps_chart(true)?;
        }
        let options = match f.get("options").or_else(|| f.get("userOptions")) {
            None => None,
            Some(JsValue::Object(options)) if chart.is_maps_chart => {
                Some(Options::Maps(HighchartsMapsOptions::from_js_object(options)?))
            }
            Some(value) => Some(Options::from_js_value(value)?),
        };
        chart.set_options(options);
        Ok(chart)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("container", &self.container)
            .model("options", &self.options)
            .set("variableName", &self.variable_name)
            .set("callback", &self.callback)
            .value("isMapsChart", JsValue::Bool(self.is_maps_chart))
            .build()
    }

    /// The page script that builds the chart once the document has loaded.
    ///
    /// Map data fetched by the browser is awaited first, one request per URL,
    /// and the options reference the fetched topologies by variable.
    fn to_js_literal(&self) -> String {
        let mut tree = self.options.as_ref().map_or_else(|| JsValue::Object(JsObject::new()), Options::to_js_value);
        let fetches = Fetches::hoist(&mut tree);

        let mut out = String::from("document.addEventListener('DOMContentLoaded', function() {\n");
        if let Some(projection) = self.custom_projection() {
            out.push_str(&projection.to_js_literal());
            out.push('\n');
        }
        if !fetches.is_empty() {
            out.push_str("(async () => {\n");
            for statement in fetches.statements() {
                out.push_str(&statement);
                out.push('\n');
            }
        }
        if let Some(variable) = &self.variable_name {
            out.push_str(&format!("var {variable} = "));
        }
        let container = self.container.as_deref().unwrap_or(DEFAULT_CONTAINER);
        out.push_str(&format!("Highcharts.{}({},\n{}", self.constructor(), quote(container), render(&tree)));
        if let Some(callback) = &self.callback {
            out.push_str(&format!(",\n{callback}"));
        }
        out.push_str(");\n");
        if !fetches.is_empty() {
            out.push_str("})();\n");
        }
        out.push_str("});");
        out
    }

    /// Parse a script in the shape [`Chart::to_js_literal`] produces.
    fn from_js_literal(source: &str) -> Result<Self> { literal::parse_chart(source) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_data::AsyncMapData;
    use crate::options::{MapNavigationOptions, TitleOptions};
    use serde_json::json;

    fn make_map_series(url: &str) -> Series {
        let mut series = Series::new(SeriesType::Map);
        series.set_map_data(AsyncMapData::new(url).unwrap()).unwrap();
        series
    }

    fn make_projection() -> CustomProjection {
        CustomProjection::new(Some("flat"), "Flat", vec![
            CallbackFunction::new(Some("constructor"), &[], "this.bounds = null;"),
            CallbackFunction::new(Some("forward"), &["lonLat"], "return lonLat;"),
            CallbackFunction::new(Some("inverse"), &["point"], "return point;"),
        ]).unwrap()
    }

    #[test]
    fn plain_chart_literal() {
        let mut options = HighchartsOptions::default();
        options.title = Some(TitleOptions { text: Some("Sales".into()), ..TitleOptions::default() });
        let mut chart = Chart::from_options(options);
        chart.container = Some("target".into());
        assert_eq!(
            chart.to_js_literal(),
            "document.addEventListener('DOMContentLoaded', function() {\n\
             Highcharts.chart('target',\n{\n  title: {\n    text: 'Sales'\n  }\n});\n});"
        );
    }

    #[test]
    fn empty_maps_chart_uses_defaults() {
        let mut chart = Chart::new();
        chart.set_is_maps_chart(true).unwrap();
        chart.variable_name = Some(VariableName::new("myChart").unwrap());
        assert_eq!(
            chart.to_js_literal(),
            "document.addEventListener('DOMContentLoaded', function() {\n\
             var myChart = Highcharts.mapChart('highcharts_target_div',\n{});\n});"
        );
    }

    #[test]
    fn duplicate_urls_fetch_once() {
        let chart = Chart::from_series([make_map_series("https://x/a.json"), make_map_series("https://x/a.json")]);
        assert!(chart.is_async());
        let literal = chart.to_js_literal();
        assert_eq!(literal.matches("fetch(\"https://x/a.json\"").count(), 1);
        assert_eq!(literal.matches("mapData: topology\n").count() + literal.matches("mapData: topology,").count(), 2);
        assert!(literal.contains("(async () => {\nconst topology = await fetch("));
        assert!(literal.ends_with(");\n})();\n});"));
    }

    #[test]
    fn chart_map_is_fetched_before_series() {
        let mut chart = Chart::from_map_data(AsyncMapData::new("https://x/world.json").unwrap());
        chart.add_series([make_map_series("https://x/a.json"), make_map_series("https://x/b.json")]);
        let literal = chart.to_js_literal();
        let world = literal.find("const topology = await fetch(\"https://x/world.json\"").unwrap();
        let a = literal.find("const topology1 = await fetch(\"https://x/a.json\"").unwrap();
        let b = literal.find("const topology2 = await fetch(\"https://x/b.json\"").unwrap();
        assert!(world < a && a < b);
        assert!(literal.contains("map: topology\n"));
        assert!(literal.starts_with("document.addEventListener"));
    }

    #[test]
    fn custom_projection_is_registered_first() {
        let mut chart = Chart::new();
        chart.set_custom_projection(make_projection());
        assert!(chart.is_maps_chart());
        assert!(chart.uses_custom_projection());
        let literal = chart.to_js_literal();
        let class = literal.find("class Flat").unwrap();
        let registration = literal.find("Highcharts.Projection.add('flat', Flat);").unwrap();
        let constructor = literal.find("Highcharts.mapChart(").unwrap();
        assert!(class < registration && registration < constructor);
        assert!(literal.contains("name: 'flat'"));
        assert!(!literal.contains("custom:"));
    }

    #[test]
    fn maps_settings_pin_the_flag() {
        let mut options = HighchartsMapsOptions::default();
        options.map_navigation = Some(MapNavigationOptions::default());
        let mut chart = Chart::from_options(options);
        assert!(chart.is_maps_chart());
        assert!(matches!(chart.set_is_maps_chart(false), Err(Error::ReadOnly(_))));
        assert!(chart.is_maps_chart());

        let mut chart = Chart::from_options(HighchartsMapsOptions::default());
        chart.set_is_maps_chart(false).unwrap();
        assert!(!chart.options().unwrap().is_maps());
    }

    #[test]
    fn factories_pick_the_flavor_from_the_series_type() {
        let values = crate::js::parse_literal("[1, 2, 3]").unwrap();
        assert!(!Chart::from_array(&values, "line").unwrap().is_maps_chart());
        let values = crate::js::parse_literal("[['fr', 1], ['de', 2]]").unwrap();
        let chart = Chart::from_array(&values, "map").unwrap();
        assert!(chart.is_maps_chart());
        assert!(chart.options().unwrap().is_maps());
    }

    #[test]
    fn invalid_series_type_from_every_factory() {
        let expected = "series_type expects a valid Highcharts series type. Received: choropleth";
        let values = crate::js::parse_literal("[1, 2]").unwrap();
        let options = CsvOptions::default();
        assert_eq!(Chart::from_array(&values, "choropleth").unwrap_err().to_string(), expected);
        assert_eq!(Chart::from_csv("missing.csv", None, "choropleth", &options).unwrap_err().to_string(), expected);
        assert_eq!(Chart::from_csv_in_rows("missing.csv", "choropleth", &options).unwrap_err().to_string(), expected);
        assert_eq!(Chart::from_shapefile("missing.shp", None, "choropleth").unwrap_err().to_string(), expected);
    }

    #[test]
    fn required_modules() {
        let mut chart = Chart::from_series([Series::new(SeriesType::Map), Series::new(SeriesType::Heatmap)]);
        chart.add_series([Series::new(SeriesType::MapBubble), Series::new(SeriesType::Heatmap)]);
        assert_eq!(
            chart.get_required_modules(false),
            vec!["highcharts", "maps/modules/map", "modules/exporting", "modules/heatmap", "highcharts-more"]
        );
        assert_eq!(
            chart.get_script_tags()[1],
            "<script src=\"https://code.highcharts.com/maps/modules/map.js\"></script>"
        );
        assert_eq!(Chart::new().get_required_modules(true), vec!["highcharts.js", "modules/exporting.js"]);
    }

    #[test]
    fn dict_round_trip() {
        let dict = json!({
            "renderTo": "target",
            "userOptions": {"mapView": {"zoom": 2}, "series": [{"type": "map", "name": "World"}]},
            "variableName": "worldChart"
        });
        let chart = Chart::from_dict(dict.as_object().unwrap()).unwrap();
        assert!(chart.is_maps_chart());
        assert_eq!(chart.container.as_deref(), Some("target"));
        let again = Chart::from_dict(&chart.to_dict()).unwrap();
        assert_eq!(again, chart);
        assert_eq!(chart.to_dict()["options"]["mapView"]["zoom"], 2);
    }

    #[test]
    fn write_js_literal_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.js");
        let chart = Chart::from_map_data(AsyncMapData::new("https://x/a.json").unwrap());
        let literal = chart.write_js_literal(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), literal);
    }
}
