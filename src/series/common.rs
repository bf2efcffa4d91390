use crate::error::Result;
use crate::js::{JsObject, JsValue};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::series::{DataPoint, DataShape};
use crate::validate::{self, Toggle};

/// Properties every series type accepts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesCommon {
    pub id: Option<String>,
    pub name: Option<String>,
    pub index: Option<u32>,
    pub legend_index: Option<u32>,
    pub z_index: Option<f64>,
    pub visible: Option<bool>,
    pub show_in_legend: Option<bool>,
    pub color: Option<String>,
    pub class_name: Option<String>,
    pub description: Option<String>,
    opacity: Option<f64>,
    pub selected: Option<bool>,
    pub cursor: Option<String>,
    pub enable_mouse_tracking: Option<bool>,
    pub turbo_threshold: Option<u32>,
    /// Point property names for array-form data, e.g. `['hc-key', 'value']`.
    pub keys: Option<Vec<String>>,
    /// One data label configuration or a list of them.
    pub data_labels: Option<JsValue>,
    pub events: Option<JsObject>,
    /// Rendered as `point: {events: ...}`.
    pub point_events: Option<JsObject>,
    pub states: Option<JsObject>,
    pub tooltip: Option<JsObject>,
    pub custom: Option<JsObject>,
    pub animation: Option<Toggle>,
    pub data: Option<Vec<DataPoint>>,
}

impl SeriesCommon {
    #[inline] pub fn opacity(&self) -> Option<f64> { self.opacity }

    pub fn set_opacity(&mut self, opacity: Option<f64>) -> Result<()> {
        self.opacity = validate::fraction("opacity", opacity)?;
        Ok(())
    }

    /// Read the common members, interpreting array-form data as `shape` lays it out.
    pub(crate) fn read(f: &Fields<'_>, shape: DataShape) -> Result<Self> {
        let point_events = match f.get("point") {
            Some(JsValue::Object(point)) => Fields::new(point).parse("events")?,
            _ => None,
        };
        let data = match (f.get("data"), f.parse::<Vec<String>>("keys")?) {
            (Some(JsValue::Array(items)), Some(keys)) => Some(keyed_points(items, &keys)?),
            (Some(value), _) => Some(DataPoint::from_collection(shape, value)?),
            (None, _) => None,
        };
        Ok(Self {
            id: f.text("id")?,
            name: f.text("name")?,
            index: f.parse("index")?,
            legend_index: f.parse("legendIndex")?,
            z_index: f.parse("zIndex")?,
            visible: f.parse("visible")?,
            show_in_legend: f.parse("showInLegend")?,
            color: f.parse("color")?,
            class_name: f.parse("className")?,
            description: f.parse("description")?,
            opacity: validate::fraction("opacity", f.parse("opacity")?)?,
            selected: f.parse("selected")?,
            cursor: f.parse("cursor")?,
            enable_mouse_tracking: f.parse("enableMouseTracking")?,
            turbo_threshold: f.parse("turboThreshold")?,
            keys: f.parse("keys")?,
            data_labels: f.raw("dataLabels"),
            events: f.parse("events")?,
            point_events,
            states: f.parse("states")?,
            tooltip: f.parse("tooltip")?,
            custom: f.parse("custom")?,
            animation: f.parse("animation")?,
            data,
        })
    }
}

/// Array rows named by `keys` become point objects.
fn keyed_points(items: &[JsValue], keys: &[String]) -> Result<Vec<DataPoint>> {
    items.iter()
        .map(|item| match item {
            JsValue::Array(row) => {
                let obj: JsObject = keys.iter().cloned().zip(row.iter().cloned()).collect();
                DataPoint::from_js_object(&obj)
            }
            other => DataPoint::from_array(DataShape::Cartesian, other),
        })
        .collect()
}

impl HighchartsMeta for SeriesCommon {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(&Fields::new(obj), DataShape::Cartesian) }

    fn to_untrimmed(&self) -> JsObject {
        let point = self.point_events.as_ref().map(|events| {
            let mut point = JsObject::new();
            point.insert("events".into(), JsValue::Object(events.clone()));
            point
        });
        ObjectBuilder::new()
            .set("id", &self.id)
            .set("name", &self.name)
            .set("index", &self.index)
            .set("legendIndex", &self.legend_index)
            .set("zIndex", &self.z_index)
            .set("visible", &self.visible)
            .set("showInLegend", &self.show_in_legend)
            .set("color", &self.color)
            .set("className", &self.class_name)
            .set("description", &self.description)
            .set("opacity", &self.opacity)
            .set("selected", &self.selected)
            .set("cursor", &self.cursor)
            .set("enableMouseTracking", &self.enable_mouse_tracking)
            .set("turboThreshold", &self.turbo_threshold)
            .set("keys", &self.keys)
            .set("dataLabels", &self.data_labels)
            .set("events", &self.events)
            .set("point", &point)
            .set("states", &self.states)
            .set("tooltip", &self.tooltip)
            .set("custom", &self.custom)
            .set("animation", &self.animation)
            .models("data", &self.data)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_rows_become_points() {
        let common = SeriesCommon::from_js_literal("{keys: ['hc-key', 'value'], data: [['fr', 3], ['de', 4]]}").unwrap();
        let data = common.data.unwrap();
        assert_eq!(data[1].value, Some(4.0));
        assert_eq!(data[1].extra.get("hc-key"), Some(&JsValue::String("de".into())));
    }

    #[test]
    fn point_events_nest_under_point() {
        let common = SeriesCommon::from_js_literal("{point: {events: {click: function (e) {\nreturn e;\n}}}}").unwrap();
        assert!(common.point_events.is_some());
        assert!(common.to_js_literal().contains("point: {\n    events: {\n      click: function (e)"));
    }

    #[test]
    fn opacity_is_a_fraction() {
        assert!(SeriesCommon::from_js_literal("{opacity: 2}").is_err());
        let mut common = SeriesCommon::default();
        common.set_opacity(Some(0.25)).unwrap();
        assert_eq!(common.opacity(), Some(0.25));
    }
}
