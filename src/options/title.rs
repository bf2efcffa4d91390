use crate::error::Result;
use crate::js::JsObject;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, js_enum};

js_enum! {
    /// Horizontal alignment.
    pub enum Align ("align") {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

js_enum! {
    pub enum VerticalAlign ("vertical_align") {
        Top => "top",
        Middle => "middle",
        Bottom => "bottom",
    }
}

/// Chart title or subtitle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleOptions {
    pub text: Option<String>,
    pub align: Option<Align>,
    pub floating: Option<bool>,
    pub style: Option<JsObject>,
    pub use_html: Option<bool>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl TitleOptions {
    pub fn new(text: &str) -> Self { Self { text: Some(text.to_string()), ..Self::default() } }
}

impl HighchartsMeta for TitleOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            text: f.text("text")?,
            align: f.parse("align")?,
            floating: f.parse("floating")?,
            style: f.parse("style")?,
            use_html: f.parse("useHTML")?,
            x: f.parse("x")?,
            y: f.parse("y")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("text", &self.text)
            .set("align", &self.align)
            .set("floating", &self.floating)
            .set("style", &self.style)
            .set("useHTML", &self.use_html)
            .set("x", &self.x)
            .set("y", &self.y)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_html_key_is_exact() {
        let title = TitleOptions { use_html: Some(true), ..TitleOptions::new("Population") };
        let dict = title.to_dict();
        assert_eq!(dict["useHTML"], true);
        assert_eq!(TitleOptions::from_dict(&dict).unwrap(), title);
        assert_eq!(TitleOptions::from_json(r#"{"use_html": true}"#).unwrap().use_html, Some(true));
    }

    #[test]
    fn numeric_text_is_accepted() {
        assert_eq!(TitleOptions::from_json(r#"{"text": 2024}"#).unwrap().text.as_deref(), Some("2024"));
    }
}
