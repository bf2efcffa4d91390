use crate::error::Result;
use crate::js::JsObject;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};

/// Localized strings (`lang`), including the map navigation button labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Language {
    pub zoom_in: Option<String>,
    pub zoom_out: Option<String>,
    pub decimal_point: Option<String>,
    pub thousands_sep: Option<String>,
    pub no_data: Option<String>,
    pub loading: Option<String>,
}

impl HighchartsMeta for Language {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            zoom_in: f.parse("zoomIn")?,
            zoom_out: f.parse("zoomOut")?,
            decimal_point: f.parse("decimalPoint")?,
            thousands_sep: f.parse("thousandsSep")?,
            no_data: f.parse("noData")?,
            loading: f.parse("loading")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("zoomIn", &self.zoom_in)
            .set("zoomOut", &self.zoom_out)
            .set("decimalPoint", &self.decimal_point)
            .set("thousandsSep", &self.thousands_sep)
            .set("noData", &self.no_data)
            .set("loading", &self.loading)
            .build()
    }
}
