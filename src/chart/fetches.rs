//! Hoisting of client-side map fetches out of an options tree.

use crate::js::{JsValue, VariableName};
use crate::map_data::AsyncMapData;

/// Fetch statements hoisted from an options tree, one per distinct URL.
#[derive(Debug, Default)]
pub(crate) struct Fetches {
    requests: Vec<AsyncMapData>,
}

impl Fetches {
    /// Replace every fetch slot in `tree` with the variable its data is bound to.
    ///
    /// Slots are visited depth-first in key order. Distinct URLs are numbered
    /// 0, 1, 2... in first-seen order; a repeated URL reuses the first
    /// fetch's variable.
    pub(crate) fn hoist(tree: &mut JsValue) -> Self {
        let mut fetches = Self::default();
        fetches.visit(tree);
        fetches
    }

    fn visit(&mut self, value: &mut JsValue) {
        match value {
            JsValue::Fetch(data) => {
                let variable = self.bind(data);
                *value = JsValue::Identifier(variable);
            }
            JsValue::Array(items) => items.iter_mut().for_each(|item| self.visit(item)),
            JsValue::Object(obj) => obj.values_mut().for_each(|item| self.visit(item)),
            _ => {}
        }
    }

    fn bind(&mut self, data: &AsyncMapData) -> VariableName {
        if let Some(first) = self.requests.iter().find(|r| r.url() == data.url()) {
            if first.fetch_config() != data.fetch_config() || first.selector() != data.selector() {
                log::warn!("[chart] {} is fetched once; later request settings for it are ignored", data.url());
            }
            return VariableName::trusted(first.variable_name());
        }
        let counter = self.requests.len() as u32;
        let request = data.clone().with_fetch_counter(counter);
        let variable = VariableName::trusted(request.variable_name());
        self.requests.push(request);
        variable
    }

    #[inline] pub(crate) fn is_empty(&self) -> bool { self.requests.is_empty() }

    pub(crate) fn requests(&self) -> &[AsyncMapData] { &self.requests }

    /// The awaited `const topology<N> = ...` statements, in order.
    pub(crate) fn statements(&self) -> Vec<String> {
        use crate::meta::HighchartsMeta;
        self.requests.iter().map(HighchartsMeta::to_js_literal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::{JsObject, render_compact};

    fn slot(url: &str) -> JsValue { JsValue::Fetch(Box::new(AsyncMapData::new(url).unwrap())) }

    fn make_tree() -> JsValue {
        let mut chart = JsObject::new();
        chart.insert("map".into(), slot("https://x/a.json"));
        let series: Vec<JsValue> = ["https://x/b.json", "https://x/a.json", "https://x/c.json"]
            .iter()
            .map(|url| {
                let mut s = JsObject::new();
                s.insert("mapData".into(), slot(url));
                JsValue::Object(s)
            })
            .collect();
        let mut root = JsObject::new();
        root.insert("chart".into(), JsValue::Object(chart));
        root.insert("series".into(), JsValue::Array(series));
        JsValue::Object(root)
    }

    #[test]
    fn distinct_urls_numbered_in_order() {
        let mut tree = make_tree();
        let fetches = Fetches::hoist(&mut tree);
        let names: Vec<_> = fetches.requests().iter().map(AsyncMapData::variable_name).collect();
        assert_eq!(names, vec!["topology", "topology1", "topology2"]);
        assert_eq!(
            render_compact(&tree),
            "{chart: {map: topology}, series: [{mapData: topology1}, {mapData: topology}, {mapData: topology2}]}"
        );
    }

    #[test]
    fn one_statement_per_url() {
        let mut tree = make_tree();
        let statements = Fetches::hoist(&mut tree).statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("const topology = await fetch(\"https://x/a.json\")"));
    }

    #[test]
    fn placeholder_text_in_user_strings_is_left_alone() {
        let mut obj = JsObject::new();
        obj.insert("name".into(), "HCP: REPLACE-WITH-topology".into());
        let mut tree = JsValue::Object(obj);
        assert!(Fetches::hoist(&mut tree).is_empty());
        assert_eq!(render_compact(&tree), "{name: 'HCP: REPLACE-WITH-topology'}");
    }
}
