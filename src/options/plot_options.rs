use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::meta::HighchartsMeta;
use crate::series::{Series, SeriesCommon, SeriesType};

/// Defaults applied to series: the generic `series` key for every type, and
/// one template per series type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotOptions {
    pub series: Option<SeriesCommon>,
    templates: IndexMap<SeriesType, Series>,
}

fn strip(mut members: JsObject, series_type: &str) -> JsObject {
    members.shift_remove("type");
    if members.shift_remove("data").is_some_and(|data| !data.is_undefined()) {
        log::warn!("[plot_options] ignoring data in the {series_type} template");
    }
    members
}

impl PlotOptions {
    pub fn template(&self, series_type: SeriesType) -> Option<&Series> { self.templates.get(&series_type) }

    /// Set the defaults for one series type. Templates carry no data.
    pub fn set_template(&mut self, mut template: Series) {
        template.common.data = None;
        self.templates.insert(template.series_type(), template);
    }

    pub fn remove_template(&mut self, series_type: SeriesType) -> Option<Series> {
        self.templates.shift_remove(&series_type)
    }

    pub fn templates(&self) -> impl Iterator<Item = &Series> { self.templates.values() }
}

impl HighchartsMeta for PlotOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let mut options = Self::default();
        for (key, value) in obj {
            if value.is_nullish() {
                continue;
            }
            let JsValue::Object(members) = value else {
                return Err(Error::value(format!("plot_options.{key} expects an object, received {}", value.describe())));
            };
            if key == "series" {
                options.series = Some(SeriesCommon::from_js_object(&strip(members.clone(), key))?);
                continue;
            }
            let series_type: SeriesType = key.parse()?;
            let mut members = strip(members.clone(), key);
            members.insert("type".into(), JsValue::String(series_type.as_str().into()));
            options.set_template(Series::read(&members, series_type)?);
        }
        Ok(options)
    }

    fn to_untrimmed(&self) -> JsObject {
        let mut obj = JsObject::new();
        obj.insert(
            "series".into(),
            self.series.as_ref().map_or(JsValue::Undefined, |s| JsValue::Object(strip(s.to_untrimmed(), "series"))),
        );
        for (series_type, template) in &self.templates {
            obj.insert(series_type.as_str().into(), JsValue::Object(strip(template.to_untrimmed(), series_type.as_str())));
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "{
  series: {
    animation: false
  },
  map: {
    allAreas: false,
    nullColor: '#f7f7f7'
  },
  mapbubble: {
    minSize: 4,
    maxSize: '12%'
  }
}";

    #[test]
    fn templates_by_type() {
        let options = PlotOptions::from_js_literal(FIXTURE).unwrap();
        let map = options.template(SeriesType::Map).unwrap();
        assert_eq!(map.map.as_ref().unwrap().all_areas, Some(false));
        assert!(options.template(SeriesType::MapBubble).unwrap().bubble.is_some());
        assert_eq!(options.to_js_literal(), FIXTURE);
        assert_eq!(PlotOptions::from_dict(&options.to_dict()).unwrap(), options);
    }

    #[test]
    fn unknown_type_key() {
        let err = PlotOptions::from_js_literal("{choropleth: {}}").unwrap_err();
        assert_eq!(err.to_string(), "series_type expects a valid Highcharts series type. Received: choropleth");
    }

    #[test]
    fn templates_drop_data() {
        let options = PlotOptions::from_js_literal("{line: {data: [1, 2], lineWidth: 3}}").unwrap();
        let line = options.template(SeriesType::Line).unwrap();
        assert!(line.common.data.is_none());
        assert_eq!(line.cartesian.as_ref().unwrap().line_width, Some(3.0));
    }
}
