use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, js_enum};
use crate::options::{Align, VerticalAlign};

js_enum! {
    pub enum LegendLayout ("layout") {
        Horizontal => "horizontal",
        Vertical => "vertical",
        Proximate => "proximate",
    }
}

/// The legend box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Legend {
    pub enabled: Option<bool>,
    pub layout: Option<LegendLayout>,
    pub align: Option<Align>,
    pub vertical_align: Option<VerticalAlign>,
    pub floating: Option<bool>,
    pub title: Option<JsObject>,
}

impl HighchartsMeta for Legend {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            enabled: f.parse("enabled")?,
            layout: f.parse("layout")?,
            align: f.parse("align")?,
            vertical_align: f.parse("verticalAlign")?,
            floating: f.parse("floating")?,
            title: f.parse("title")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("enabled", &self.enabled)
            .set("layout", &self.layout)
            .set("align", &self.align)
            .set("verticalAlign", &self.vertical_align)
            .set("floating", &self.floating)
            .set("title", &self.title)
            .build()
    }
}

/// Credits label; `credits: false` is shorthand for `{enabled: false}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credits {
    pub enabled: Option<bool>,
    pub href: Option<String>,
    pub text: Option<String>,
}

impl HighchartsMeta for Credits {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self { enabled: f.parse("enabled")?, href: f.parse("href")?, text: f.text("text")? })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("enabled", &self.enabled)
            .set("href", &self.href)
            .set("text", &self.text)
            .build()
    }

    fn from_js_value(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Bool(enabled) => Ok(Self { enabled: Some(*enabled), ..Self::default() }),
            JsValue::Object(obj) => Self::from_js_object(obj),
            other => Err(Error::value(format!("credits expects a boolean or an object, received {}", other.describe()))),
        }
    }
}
