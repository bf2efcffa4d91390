use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue, object_to_json};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, js_enum};
use crate::validate;

js_enum! {
    /// HTTP request method.
    pub enum HttpMethod ("method") {
        Get => "GET",
        Head => "HEAD",
        Post => "POST",
        Put => "PUT",
        Delete => "DELETE",
        Connect => "CONNECT",
        Options => "OPTIONS",
        Trace => "TRACE",
        Patch => "PATCH",
    }
}

js_enum! {
    pub enum RequestMode ("mode") {
        Cors => "cors",
        NoCors => "no-cors",
        SameOrigin => "same-origin",
    }
}

js_enum! {
    pub enum RequestCredentials ("credentials") {
        Omit => "omit",
        SameOrigin => "same-origin",
        Include => "include",
    }
}

js_enum! {
    pub enum RequestCache ("cache") {
        Default => "default",
        NoStore => "no-store",
        Reload => "reload",
        NoCache => "no-cache",
        ForceCache => "force-cache",
        OnlyIfCached => "only-if-cached",
    }
}

js_enum! {
    pub enum RequestRedirect ("redirect") {
        Follow => "follow",
        Error => "error",
        Manual => "manual",
    }
}

js_enum! {
    pub enum ReferrerPolicy ("referrer_policy") {
        NoReferrer => "no-referrer",
        NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
        SameOrigin => "same-origin",
        Origin => "origin",
        StrictOrigin => "strict-origin",
        OriginWhenCrossOrigin => "origin-when-cross-origin",
        StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
        UnsafeUrl => "unsafe-url",
    }
}

/// Settings for a client-side `fetch()` request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchConfiguration {
    pub url: String,
    pub method: Option<HttpMethod>,
    pub headers: Option<IndexMap<String, String>>,
    pub body: Option<String>,
    pub mode: Option<RequestMode>,
    pub credentials: Option<RequestCredentials>,
    pub cache: Option<RequestCache>,
    pub redirect: Option<RequestRedirect>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<ReferrerPolicy>,
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
}

impl FetchConfiguration {
    /// A plain GET of `url`.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self { url: validate::url("url", url)?, ..Self::default() })
    }

    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.url = validate::url("url", url)?;
        Ok(())
    }

    /// Request options other than the URL, as a JSON object.
    fn init_json(&self) -> serde_json::Map<String, Value> {
        let mut members = self.to_untrimmed();
        members.shift_remove("url");
        object_to_json(&members)
    }
}

fn parse_headers(value: Option<&JsValue>) -> Result<Option<IndexMap<String, String>>> {
    let Some(value) = value else { return Ok(None) };
    let JsValue::Object(obj) = value else {
        return Err(Error::value(format!("headers expects an object, received {}", value.describe())));
    };
    obj.iter()
        .map(|(key, item)| match item {
            JsValue::String(s) => Ok((key.clone(), s.clone())),
            other => Err(Error::value(format!("header values must be strings. Received a: {}", other.type_name()))),
        })
        .collect::<Result<IndexMap<_, _>>>()
        .map(|headers| (!headers.is_empty()).then_some(headers))
}

fn parse_body(value: Option<&JsValue>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(JsValue::String(s)) => Ok(Some(s.clone())),
        Some(JsValue::Object(obj)) => Ok(Some(Value::Object(object_to_json(obj)).to_string())),
        Some(other) => Err(Error::value(format!("body expects a string or an object, received {}", other.describe()))),
    }
}

impl HighchartsMeta for FetchConfiguration {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let url: String = f.parse("url")?
            .ok_or_else(|| Error::value("url expects a valid URL. Received: nothing"))?;
        Ok(Self {
            url: validate::url("url", &url)?,
            method: f.parse("method")?,
            headers: parse_headers(f.get("headers"))?,
            body: parse_body(f.get("body"))?,
            mode: f.parse("mode")?,
            credentials: f.parse("credentials")?,
            cache: f.parse("cache")?,
            redirect: f.parse("redirect")?,
            referrer: f.parse("referrer")?,
            referrer_policy: f.parse("referrerPolicy")?,
            integrity: f.parse("integrity")?,
            keepalive: f.parse("keepalive")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        let headers = self.headers.as_ref().map(|h| {
            h.iter().map(|(k, v)| (k.clone(), JsValue::String(v.clone()))).collect::<JsObject>()
        });
        ObjectBuilder::new()
            .value("url", JsValue::String(self.url.clone()))
            .set("method", &self.method)
            .set("headers", &headers)
            .set("body", &self.body)
            .set("mode", &self.mode)
            .set("credentials", &self.credentials)
            .set("cache", &self.cache)
            .set("redirect", &self.redirect)
            .set("referrer", &self.referrer)
            .set("referrerPolicy", &self.referrer_policy)
            .set("integrity", &self.integrity)
            .set("keepalive", &self.keepalive)
            .build()
    }

    /// The `fetch(...)` call expression.
    fn to_js_literal(&self) -> String {
        let url = Value::String(self.url.clone());
        let init = self.init_json();
        if init.is_empty() {
            format!("fetch({url})")
        } else {
            format!("fetch({url}, {})", Value::Object(init))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_fetch() {
        let config = FetchConfiguration::new("https://x/a.json").unwrap();
        assert_eq!(config.to_js_literal(), r#"fetch("https://x/a.json")"#);
    }

    #[test]
    fn fetch_with_init() {
        let config = FetchConfiguration::from_json(
            r#"{"url": "https://x/a.json", "method": "post", "referrerPolicy": "origin", "keepalive": true}"#,
        ).unwrap();
        assert_eq!(config.method, Some(HttpMethod::Post));
        assert_eq!(
            config.to_js_literal(),
            r#"fetch("https://x/a.json", {"method":"POST","referrerPolicy":"origin","keepalive":true})"#
        );
    }

    #[test]
    fn enum_values_are_validated() {
        let err = FetchConfiguration::from_json(r#"{"url": "https://x", "mode": "sideways"}"#).unwrap_err();
        assert!(err.to_string().starts_with("mode expects one of cors, no-cors, same-origin"));

        let err = FetchConfiguration::from_json(r#"{"url": "https://x", "method": "FETCH"}"#).unwrap_err();
        assert!(err.to_string().starts_with("method expects one of GET"));
    }

    #[test]
    fn headers_must_be_strings() {
        let err = FetchConfiguration::from_json(r#"{"url": "https://x", "headers": {"X-Count": 3}}"#).unwrap_err();
        assert_eq!(err.to_string(), "header values must be strings. Received a: number");
    }

    #[test]
    fn object_bodies_are_serialized() {
        let config = FetchConfiguration::from_json(r#"{"url": "https://x", "body": {"q": 1}}"#).unwrap();
        assert_eq!(config.body.as_deref(), Some(r#"{"q":1}"#));
    }

    #[test]
    fn dict_round_trip() {
        let mut config = FetchConfiguration::new("https://x/a.json").unwrap();
        config.cache = Some(RequestCache::NoStore);
        config.headers = Some(IndexMap::from([("Accept".to_string(), "application/json".to_string())]));
        assert_eq!(FetchConfiguration::from_dict(&config.to_dict()).unwrap(), config);
    }
}
