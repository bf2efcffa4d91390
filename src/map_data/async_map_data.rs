use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::js::{CallbackFunction, JsObject, JsValue};
use crate::map_data::FetchConfiguration;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder};
use crate::validate;

/// Map geometry that the browser downloads with `fetch()` before the chart is built.
///
/// The URL is mirrored into the fetch configuration; whichever of the two was
/// written last wins.
#[derive(Clone, Debug, PartialEq)]
pub struct AsyncMapData {
    url: String,
    selector: Option<CallbackFunction>,
    fetch_config: Option<FetchConfiguration>,
    fetch_counter: u32,
}

impl AsyncMapData {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self { url: validate::url("url", url)?, selector: None, fetch_config: None, fetch_counter: 0 })
    }

    /// Build from a URL and request settings; the explicit `url` replaces the one in `fetch_config`.
    pub fn with_config(url: &str, fetch_config: FetchConfiguration) -> Result<Self> {
        let mut data = Self::new(url)?;
        data.fetch_config = Some(FetchConfiguration { url: data.url.clone(), ..fetch_config });
        Ok(data)
    }

    pub fn with_selector(mut self, selector: CallbackFunction) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_fetch_counter(mut self, counter: u32) -> Self {
        self.fetch_counter = counter;
        self
    }

    #[inline] pub fn url(&self) -> &str { &self.url }
    #[inline] pub fn selector(&self) -> Option<&CallbackFunction> { self.selector.as_ref() }
    #[inline] pub fn fetch_config(&self) -> Option<&FetchConfiguration> { self.fetch_config.as_ref() }
    #[inline] pub fn fetch_counter(&self) -> u32 { self.fetch_counter }

    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.url = validate::url("url", url)?;
        if let Some(config) = &mut self.fetch_config {
            config.url = self.url.clone();
        }
        Ok(())
    }

    /// Replace the request settings, adopting their URL.
    pub fn set_fetch_config(&mut self, config: Option<FetchConfiguration>) {
        if let Some(config) = &config {
            self.url = config.url.clone();
        }
        self.fetch_config = config;
    }

    pub fn set_selector(&mut self, selector: Option<CallbackFunction>) { self.selector = selector; }

    pub fn set_fetch_counter(&mut self, counter: u32) { self.fetch_counter = counter; }

    /// Name of the variable holding the fetched topology: `topology`, `topology1`, ...
    pub fn variable_name(&self) -> String { suffixed("topology", self.fetch_counter) }

    /// Name of the variable holding the selector function.
    pub fn selector_name(&self) -> String { suffixed("selector", self.fetch_counter) }

    /// The request this slot issues.
    pub fn request(&self) -> FetchConfiguration {
        match &self.fetch_config {
            Some(config) => FetchConfiguration { url: self.url.clone(), ..config.clone() },
            None => FetchConfiguration { url: self.url.clone(), ..FetchConfiguration::default() },
        }
    }

    /// Dictionary form used when the slot is serialized to JSON.
    pub fn to_json_map(&self) -> Map<String, Value> { self.to_dict() }
}

fn suffixed(base: &str, counter: u32) -> String {
    if counter == 0 { base.to_string() } else { format!("{base}{counter}") }
}

impl HighchartsMeta for AsyncMapData {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let url: Option<String> = f.parse("url")?;
        let fetch_config: Option<FetchConfiguration> = match f.get("fetchConfig") {
            None => None,
            Some(JsValue::Object(config)) => {
                let mut config = config.clone();
                if let Some(url) = &url {
                    config.insert("url".into(), JsValue::String(url.clone()));
                }
                Some(FetchConfiguration::from_js_object(&config)?)
            }
            Some(other) => return Err(Error::value(format!(
                "fetch_config expects an object, received {}", other.describe()
            ))),
        };

        let mut data = match (url, fetch_config) {
            (Some(url), Some(config)) => Self::with_config(&url, config)?,
            (Some(url), None) => Self::new(&url)?,
            (None, Some(config)) => {
                let mut data = Self::new(&config.url)?;
                data.fetch_config = Some(config);
                data
            }
            (None, None) => return Err(Error::value("AsyncMapData expects a url")),
        };
        data.selector = f.parse("selector")?;
        data.fetch_counter = f.parse("fetchCounter")?.unwrap_or(0);
        Ok(data)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .value("url", JsValue::String(self.url.clone()))
            .set("selector", &self.selector)
            .model("fetchConfig", &self.fetch_config)
            .set("fetchCounter", &(self.fetch_counter > 0).then_some(self.fetch_counter))
            .build()
    }

    /// Embedded in an options tree the slot stays a fetch node until a chart resolves it.
    fn to_js_value(&self) -> JsValue { JsValue::Fetch(Box::new(self.clone())) }

    fn from_js_value(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Fetch(data) => Ok((**data).clone()),
            JsValue::Object(obj) => Self::from_js_object(obj),
            JsValue::String(s) if validate::is_url(s) => Self::new(s),
            JsValue::String(s) => Self::from_js_literal(s),
            other => Err(Error::value(format!("AsyncMapData expects an object or a URL, received {}", other.describe()))),
        }
    }

    /// The awaited fetch statement, preceded by the selector definition when one is set.
    fn to_js_literal(&self) -> String {
        let fetch = self.request().to_js_literal();
        match &self.selector {
            Some(selector) => format!(
                "const {selector_name} = {selector};\nconst {topology} = await {fetch}.then(response => {selector_name}(response.json()));",
                selector_name = self.selector_name(),
                topology = self.variable_name(),
            ),
            None => format!(
                "const {} = await {fetch}.then(response => response.json());",
                self.variable_name()
            ),
        }
    }

    /// Accepts an object literal or a dictionary in JSON form.
    fn from_js_literal(source: &str) -> Result<Self> {
        match crate::js::parse_literal(source)? {
            JsValue::Object(obj) => Self::from_js_object(&obj),
            other => Err(Error::value(format!("AsyncMapData expects an object, received {}", other.describe()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_data::HttpMethod;

    const URL: &str = "https://code.highcharts.com/mapdata/custom/world.topo.json";

    #[test]
    fn counter_names() {
        let data = AsyncMapData::new(URL).unwrap();
        assert!(data.to_js_literal().starts_with(&format!("const topology = await fetch(\"{URL}\"")));

        let data = data.with_fetch_counter(2);
        assert_eq!(data.variable_name(), "topology2");
        assert!(data.to_js_literal().contains("const topology2 = await fetch("));
    }

    #[test]
    fn selector_statement() {
        let selector = CallbackFunction::anonymous(&["topology"], "return topology.objects.default;");
        let data = AsyncMapData::new(URL).unwrap().with_selector(selector).with_fetch_counter(1);
        let literal = data.to_js_literal();
        let mut lines = literal.lines();
        assert_eq!(lines.next(), Some("const selector1 = function (topology) {"));
        assert!(literal.ends_with("const topology1 = await fetch(\"https://code.highcharts.com/mapdata/custom/world.topo.json\").then(response => selector1(response.json()));"));
        assert!(!literal.contains("then(data =>"));
    }

    #[test]
    fn url_is_mirrored_into_fetch_config() {
        let mut config = FetchConfiguration::new("https://other.example/x.json").unwrap();
        config.method = Some(HttpMethod::Get);
        let mut data = AsyncMapData::with_config(URL, config).unwrap();
        assert_eq!(data.fetch_config().unwrap().url, URL);

        data.set_url("https://x/a.json").unwrap();
        assert_eq!(data.fetch_config().unwrap().url, "https://x/a.json");

        data.set_fetch_config(Some(FetchConfiguration::new("https://x/b.json").unwrap()));
        assert_eq!(data.url(), "https://x/b.json");
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(AsyncMapData::new("not a url").is_err());
        assert!(AsyncMapData::from_json("{}").is_err());
    }

    #[test]
    fn dict_round_trip() {
        let data = AsyncMapData::with_config(URL, FetchConfiguration::new(URL).unwrap())
            .unwrap()
            .with_selector(CallbackFunction::anonymous(&["t"], "return t;"))
            .with_fetch_counter(3);
        let dict = data.to_dict();
        assert_eq!(dict["fetchCounter"], 3);
        assert_eq!(AsyncMapData::from_dict(&dict).unwrap(), data);
    }

    #[test]
    fn embeds_as_fetch_node() {
        let data = AsyncMapData::new(URL).unwrap();
        assert!(matches!(data.to_js_value(), JsValue::Fetch(_)));
        assert_eq!(AsyncMapData::from_js_value(&data.to_js_value()).unwrap(), data);
    }
}
