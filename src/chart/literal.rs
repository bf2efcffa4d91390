//! Reading chart scripts back into a [`Chart`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::chart::{Chart, DEFAULT_CONTAINER};
use crate::error::{Error, Result};
use crate::js::parse::parse_value_at;
use crate::js::{CallbackFunction, JsValue, VariableName};
use crate::map_data::{AsyncMapData, FetchConfiguration};
use crate::meta::{FromJs, HighchartsMeta};
use crate::options::{CustomProjection, HighchartsMapsOptions, Options};

static CONSTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:var\s+([A-Za-z_$][\w$.]*)\s*=\s*)?Highcharts\.(mapChart|chart)\(").expect("valid constructor regex")
});

static FETCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"const\s+(topology\d*)\s*=\s*await\s+fetch\(").expect("valid fetch regex")
});

static SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"const\s+(selector\d*)\s*=").expect("valid selector regex")
});

static THEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*\.then\(\s*response\s*=>\s*(?:(selector\d*)\(\s*response\.json\(\s*\)\s*\)|response\.json\(\s*\))\s*\)",
    )
    .expect("valid then regex")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bclass\s+[A-Za-z_$]").expect("valid class regex"));

static REGISTRATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Highcharts\.Projection\.add\(\s*['"]((?:[^'"\\]|\\.)*)['"]\s*,\s*([A-Za-z_$][\w$]*)\s*\)"#)
        .expect("valid registration regex")
});

fn skip_whitespace(source: &str, pos: usize) -> usize {
    pos + source[pos..].len() - source[pos..].trim_start().len()
}

fn expect_char(source: &str, pos: usize, c: char) -> Result<usize> {
    let pos = skip_whitespace(source, pos);
    if source[pos..].starts_with(c) {
        Ok(pos + c.len_utf8())
    } else {
        Err(Error::JsParse { position: pos, message: format!("expected '{c}'") })
    }
}

fn counter(variable: &str, base: &str) -> u32 {
    variable.strip_prefix(base).and_then(|n| n.parse().ok()).unwrap_or(0)
}

/// Parse a page script as emitted by [`Chart`]'s `to_js_literal`.
pub(crate) fn parse_chart(source: &str) -> Result<Chart> {
    let call = CONSTRUCTOR_RE.captures(source).ok_or_else(|| {
        Error::JavaScript("expected a Highcharts.chart or Highcharts.mapChart call".into())
    })?;
    let (Some(whole), Some(constructor)) = (call.get(0), call.get(2)) else {
        return Err(Error::JavaScript("expected a Highcharts.chart or Highcharts.mapChart call".into()));
    };
    let prelude = &source[..whole.start()];

    let (container, pos) = parse_value_at(source, whole.end())?;
    let pos = expect_char(source, pos, ',')?;
    let (options, pos) = parse_value_at(source, pos)?;
    let pos = skip_whitespace(source, pos);
    let (callback, pos) = match source[pos..].starts_with(',') {
        true => {
            let (callback, end) = parse_value_at(source, pos + 1)?;
            (Some(CallbackFunction::from_js(&callback)?), end)
        }
        false => (None, pos),
    };
    expect_char(source, pos, ')')?;

    let mut chart = Chart::new();
    chart.container = match container {
        JsValue::String(s) if s == DEFAULT_CONTAINER => None,
        JsValue::String(s) => Some(s),
        JsValue::Null | JsValue::Undefined => None,
        other => return Err(Error::value(format!("container expects a string, received {}", other.describe()))),
    };
    chart.variable_name = call.get(1).map(|m| VariableName::new(m.as_str())).transpose()?;
    chart.callback = callback;
    let is_maps_chart = constructor.as_str() == "mapChart";
    if is_maps_chart {
        chart.set_is_maps_chart(true)?;
    }

    let fetches = parse_fetches(prelude)?;
    let mut options = options;
    restore_fetches(&mut options, &fetches);
    let options = match &options {
        JsValue::Object(obj) if obj.is_empty() => None,
        JsValue::Object(obj) if is_maps_chart => Some(Options::Maps(HighchartsMapsOptions::from_js_object(obj)?)),
        other => Some(Options::from_js_value(other)?),
    };
    chart.set_options(options);

    if let Some(projection) = parse_projection(prelude)? {
        chart.set_custom_projection(projection);
    }
    Ok(chart)
}

/// The awaited fetch statements, keyed by the variable each one assigns.
fn parse_fetches(prelude: &str) -> Result<HashMap<String, AsyncMapData>> {
    let mut selectors = HashMap::new();
    for m in SELECTOR_RE.captures_iter(prelude) {
        let (Some(whole), Some(name)) = (m.get(0), m.get(1)) else { continue };
        let (function, _) = parse_value_at(prelude, whole.end())?;
        selectors.insert(name.as_str().to_string(), CallbackFunction::from_js(&function)?);
    }

    let mut fetches = HashMap::new();
    for m in FETCH_RE.captures_iter(prelude) {
        let (Some(whole), Some(variable)) = (m.get(0), m.get(1)) else { continue };
        let (url, pos) = parse_value_at(prelude, whole.end())?;
        let JsValue::String(url) = url else {
            return Err(Error::JavaScript(format!("{} fetches something other than a URL", variable.as_str())));
        };
        let pos = skip_whitespace(prelude, pos);
        let (init, pos) = match prelude[pos..].starts_with(',') {
            true => {
                let (init, end) = parse_value_at(prelude, pos + 1)?;
                (Some(init), end)
            }
            false => (None, pos),
        };
        let pos = expect_char(prelude, pos, ')')?;

        let mut data = match init {
            Some(JsValue::Object(mut init)) => {
                init.insert("url".into(), JsValue::String(url.clone()));
                AsyncMapData::with_config(&url, FetchConfiguration::from_js_object(&init)?)?
            }
            Some(other) => {
                return Err(Error::value(format!("fetch_config expects an object, received {}", other.describe())));
            }
            None => AsyncMapData::new(&url)?,
        };
        let selector = THEN_RE.captures(&prelude[pos..])
            .and_then(|then| then.get(1))
            .and_then(|name| selectors.get(name.as_str()).cloned());
        if let Some(selector) = selector {
            data = data.with_selector(selector);
        }
        let data = data.with_fetch_counter(counter(variable.as_str(), "topology"));
        log::debug!("[chart] {} <- {}", variable.as_str(), data.url());
        fetches.insert(variable.as_str().to_string(), data);
    }
    Ok(fetches)
}

fn restore_fetches(value: &mut JsValue, fetches: &HashMap<String, AsyncMapData>) {
    match value {
        JsValue::Identifier(variable) => {
            if let Some(data) = fetches.get(variable.as_str()) {
                *value = JsValue::Fetch(Box::new(data.clone()));
            }
        }
        JsValue::Array(items) => items.iter_mut().for_each(|item| restore_fetches(item, fetches)),
        JsValue::Object(obj) => obj.values_mut().for_each(|item| restore_fetches(item, fetches)),
        _ => {}
    }
}

/// The class declared ahead of the chart and the name it is registered under.
fn parse_projection(prelude: &str) -> Result<Option<CustomProjection>> {
    let Some(declaration) = CLASS_RE.find(prelude) else { return Ok(None) };
    let JsValue::Class(class) = parse_value_at(prelude, declaration.start())?.0 else {
        return Err(Error::JavaScript("expected a class declaration".into()));
    };
    let name = REGISTRATION_RE.captures_iter(prelude)
        .find(|c| c.get(2).is_some_and(|m| m.as_str() == class.class_name))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace("\\'", "'"));
    CustomProjection::from_class(name.as_deref(), class).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Series, SeriesType};

    const SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function() {
(async () => {
const selector1 = function (topology) {
return topology;
};
const topology = await fetch("https://x/a.json").then(response => response.json());
const topology1 = await fetch("https://x/b.json", {"method": "POST"}).then(response => selector1(response.json()));
var worldChart = Highcharts.mapChart('target',
{
  title: {
    text: 'World'
  },
  series: [
    {
      type: 'map',
      mapData: topology
    },
    {
      type: 'mapline',
      mapData: topology1
    }
  ]
},
function (chart) {
console.log(chart);
});
})();
});"#;

    #[test]
    fn parses_async_script() {
        let chart = parse_chart(SCRIPT).unwrap();
        assert!(chart.is_maps_chart());
        assert_eq!(chart.container.as_deref(), Some("target"));
        assert_eq!(chart.variable_name.as_ref().map(VariableName::as_str), Some("worldChart"));
        assert_eq!(chart.callback.as_ref().map(|c| c.argument_count()), Some(1));

        let series = chart.options().unwrap().base().series.clone().unwrap();
        assert_eq!(series[1].series_type(), SeriesType::MapLine);
        let slots = series[1].async_slots();
        assert_eq!(slots[0].url(), "https://x/b.json");
        assert_eq!(slots[0].fetch_counter(), 1);
        assert!(slots[0].selector().is_some());
        assert!(slots[0].fetch_config().is_some());
    }

    #[test]
    fn emitted_script_is_stable() {
        let chart = parse_chart(SCRIPT).unwrap();
        let literal = chart.to_js_literal();
        assert_eq!(parse_chart(&literal).unwrap().to_js_literal(), literal);
        assert!(literal.contains("const topology1 = await fetch(\"https://x/b.json\", {\"method\":\"POST\"})"));
    }

    #[test]
    fn round_trips_custom_projection() {
        let mut chart = Chart::from_series([Series::new(SeriesType::Map)]);
        chart.set_custom_projection(
            CustomProjection::from_js_literal(
                "class Flat { constructor() {} forward(lonLat) { return lonLat; } inverse(point) { return point; } }",
                Some("flat"),
            )
            .unwrap(),
        );
        let parsed = parse_chart(&chart.to_js_literal()).unwrap();
        assert_eq!(parsed.custom_projection().map(CustomProjection::name), Some("flat"));
        assert_eq!(parsed, chart);
    }

    #[test]
    fn missing_constructor() {
        assert!(matches!(parse_chart("var x = 1;"), Err(Error::JavaScript(_))));
    }
}
