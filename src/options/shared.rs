use std::path::Path;

use crate::error::Result;
use crate::js::{JsObject, render};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::options::{HighchartsMapsOptions, Language};

/// Options applied to every chart on a page through `Highcharts.setOptions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedMapsOptions {
    pub options: HighchartsMapsOptions,
    pub lang: Option<Language>,
}

impl SharedMapsOptions {
    /// Write the `Highcharts.setOptions(...)` statement to `path`.
    pub fn write_js_literal(&self, path: impl AsRef<Path>) -> Result<String> {
        let literal = self.to_js_literal();
        crate::common::write_atomic(path.as_ref(), literal.as_bytes())?;
        Ok(literal)
    }
}

impl HighchartsMeta for SharedMapsOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        Ok(Self {
            options: HighchartsMapsOptions::read(obj, &["lang"])?,
            lang: Fields::new(obj).model("lang")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        self.options.untrimmed_with(ObjectBuilder::new().model("lang", &self.lang).build())
    }

    fn to_js_literal(&self) -> String { format!("Highcharts.setOptions({});", render(&self.to_js_value())) }

    fn from_js_literal(source: &str) -> Result<Self> {
        let trimmed = source.trim().trim_end_matches(';').trim_end();
        let inner = trimmed.strip_prefix("Highcharts.setOptions(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        match crate::js::parse_literal(inner)? {
            crate::js::JsValue::Object(obj) => Self::from_js_object(&obj),
            other => Err(crate::error::Error::value(format!(
                "SharedMapsOptions expects an object, received {}",
                other.describe()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_options_statement() {
        let shared = SharedMapsOptions::from_js_literal("{lang: {zoomIn: 'Zoom in'}, mapNavigation: {enabled: true}}").unwrap();
        let literal = shared.to_js_literal();
        assert_eq!(
            literal,
            "Highcharts.setOptions({\n  mapNavigation: {\n    enabled: true\n  },\n  lang: {\n    zoomIn: 'Zoom in'\n  }\n});"
        );
        assert_eq!(SharedMapsOptions::from_js_literal(&literal).unwrap(), shared);
    }

    #[test]
    fn written_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.js");
        let shared = SharedMapsOptions { lang: Some(Language { loading: Some("...".into()), ..Language::default() }), ..Default::default() };
        let literal = shared.write_js_literal(&path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), literal);
    }
}
