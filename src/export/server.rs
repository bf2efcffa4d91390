use std::path::Path;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::export::env::{DOMAIN_VAR, PATH_VAR, PORT_VAR, Settings};
use crate::js::{CallbackFunction, JsObject, object_to_json};
use crate::meta::{HighchartsMeta, js_enum};
use crate::options::{Options, SharedMapsOptions};
use crate::validate;

const DEFAULT_URL: &str = "https://export.highcharts.com";

js_enum! {
    /// Output format requested from the export server.
    pub enum ExportFormat ("format") {
        Png => "png",
        Jpeg => "jpeg",
        Pdf => "pdf",
        Svg => "svg",
    }
}

js_enum! {
    /// Highcharts constructor the export server builds the chart with.
    pub enum Constructor ("constructor") {
        Chart => "chart",
        MapChart => "mapChart",
    }
}

/// Connection and rendering settings for a Highcharts export server.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportServer {
    url: String,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Passed to the HTTP client; no timeout when unset.
    pub timeout: Option<Duration>,
    pub format: ExportFormat,
    scale: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Ask for a base64 response body; it is decoded before returning.
    pub use_base64: bool,
    pub no_download: bool,
    pub async_rendering: bool,
    pub constructor: Option<Constructor>,
    pub callback: Option<CallbackFunction>,
    pub global_options: Option<SharedMapsOptions>,
    pub custom_code: Option<CallbackFunction>,
    /// `js`, `css` and `files` to inject into the rendering page.
    pub resources: Option<JsObject>,
}

impl Default for ExportServer {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            port: None,
            path: None,
            username: None,
            password: None,
            timeout: None,
            format: ExportFormat::Png,
            scale: 1.0,
            width: None,
            height: None,
            use_base64: false,
            no_download: false,
            async_rendering: false,
            constructor: None,
            callback: None,
            global_options: None,
            custom_code: None,
            resources: None,
        }
    }
}

impl ExportServer {
    /// A server at `url` (scheme and domain) with default settings.
    pub fn new(url: &str) -> Result<Self> {
        let mut server = Self::default();
        server.set_url(url)?;
        Ok(server)
    }

    /// Configure from `HIGHCHARTS_EXPORT_SERVER_DOMAIN`, `_PORT` and `_PATH`,
    /// falling back to a `.env` file in the working directory, then to
    /// `export.highcharts.com`.
    pub fn from_env() -> Result<Self> {
        let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
        Self::from_settings(&Settings::load(&dir))
    }

    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let mut server = Self::default();
        if let Some(domain) = settings.get(DOMAIN_VAR) {
            let url = if domain.contains("://") { domain } else { format!("https://{domain}") };
            server.set_url(&url)?;
        }
        if let Some(port) = settings.get(PORT_VAR) {
            let port = port.trim().parse::<u16>()
                .map_err(|_| Error::value(format!("port expects an integer between 0 and 65535. Received: \"{port}\"")))?;
            server.port = Some(port);
        }
        server.path = settings.get(PATH_VAR);
        log::debug!("[export] server at {}", server.endpoint());
        Ok(server)
    }

    #[inline] pub fn url(&self) -> &str { &self.url }
    #[inline] pub fn scale(&self) -> f64 { self.scale }

    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.url = validate::url("url", url)?.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        self.scale = validate::numeric("scale", scale, Some(0.1), Some(5.0))?;
        Ok(())
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> String {
        let mut endpoint = self.url.clone();
        if let Some(port) = self.port {
            endpoint.push_str(&format!(":{port}"));
        }
        if let Some(path) = self.path.as_deref().map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            endpoint.push('/');
            endpoint.push_str(path);
        }
        endpoint
    }

    /// The JSON body of an export request for `options`.
    pub fn payload(&self, options: &Options) -> Value {
        let constructor = self.constructor.unwrap_or(if options.is_maps() { Constructor::MapChart } else { Constructor::Chart });
        let mut payload = Map::new();
        payload.insert("infile".into(), Value::Object(options.to_dict()));
        payload.insert("type".into(), Value::String(self.format.as_str().into()));
        payload.insert("constr".into(), Value::String(constructor.as_str().into()));
        payload.insert("scale".into(), crate::js::number_to_json(self.scale));
        if let Some(width) = self.width {
            payload.insert("width".into(), width.into());
        }
        if let Some(height) = self.height {
            payload.insert("height".into(), height.into());
        }
        if let Some(callback) = &self.callback {
            payload.insert("callback".into(), Value::String(callback.to_string()));
        }
        if let Some(global_options) = &self.global_options {
            payload.insert("globalOptions".into(), Value::Object(global_options.to_dict()));
        }
        if let Some(custom_code) = &self.custom_code {
            payload.insert("customCode".into(), Value::String(custom_code.to_string()));
        }
        payload.insert("b64".into(), self.use_base64.into());
        payload.insert("noDownload".into(), self.no_download.into());
        payload.insert("asyncRendering".into(), self.async_rendering.into());
        if let Some(resources) = &self.resources {
            payload.insert("resources".into(), Value::Object(object_to_json(resources)));
        }
        Value::Object(payload)
    }

    /// Render `options` on the server, returning the exported bytes and
    /// writing them to `filename` when given.
    #[cfg(feature = "download")]
    pub fn request_chart(&self, options: &Options, filename: Option<&Path>) -> Result<Vec<u8>> {
        use anyhow::Context;
        use base64::Engine;

        let endpoint = self.endpoint();
        log::debug!("[export] POST {endpoint} ({})", self.format);
        let mut request = crate::common::http_client(self.timeout)?
            .post(&endpoint)
            .json(&self.payload(options));
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }
        let body = request.send()
            .with_context(|| format!("[export] POST {endpoint}"))?
            .error_for_status()
            .with_context(|| format!("[export] POST {endpoint} returned error status"))?
            .bytes()
            .with_context(|| format!("[export] read response from {endpoint}"))?;

        let bytes = if self.use_base64 {
            let text = String::from_utf8_lossy(&body);
            base64::engine::general_purpose::STANDARD
                .decode(text.trim())
                .context("[export] decode base64 response")?
        } else {
            body.to_vec()
        };
        if let Some(filename) = filename {
            crate::common::write_atomic(filename, &bytes)?;
        }
        Ok(bytes)
    }

    #[cfg(not(feature = "download"))]
    pub fn request_chart(&self, _options: &Options, _filename: Option<&Path>) -> Result<Vec<u8>> {
        Err(Error::missing_feature("ExportServer::request_chart", "download"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{HighchartsMapsOptions, HighchartsOptions};

    fn settings(text: &str) -> Settings {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), text).unwrap();
        Settings::load(dir.path())
    }

    #[test]
    fn endpoint_parts() {
        let mut server = ExportServer::new("https://charts.example.com/").unwrap();
        assert_eq!(server.endpoint(), "https://charts.example.com");
        server.port = Some(7801);
        server.path = Some("/export/".into());
        assert_eq!(server.endpoint(), "https://charts.example.com:7801/export");
        assert!(ExportServer::new("charts.example.com").is_err());
    }

    #[test]
    fn dotenv_configuration() {
        // Only meaningful when the real variables are not exported by the test environment.
        if std::env::var(DOMAIN_VAR).is_ok() || std::env::var(PORT_VAR).is_ok() {
            return;
        }
        let server = ExportServer::from_settings(&settings(&format!("{DOMAIN_VAR}=charts.example.com\n{PORT_VAR}=7801\n"))).unwrap();
        assert_eq!(server.url(), "https://charts.example.com");
        assert_eq!(server.port, Some(7801));

        let err = ExportServer::from_settings(&settings(&format!("{PORT_VAR}=http\n"))).unwrap_err();
        assert!(err.to_string().starts_with("port expects an integer"));
    }

    #[test]
    fn payload_members() {
        let mut server = ExportServer { format: ExportFormat::Svg, width: Some(800), use_base64: true, ..ExportServer::default() };
        server.set_scale(2.0).unwrap();
        let payload = server.payload(&Options::Maps(HighchartsMapsOptions::default()));
        assert_eq!(payload["type"], "svg");
        assert_eq!(payload["constr"], "mapChart");
        assert_eq!(payload["scale"], 2);
        assert_eq!(payload["width"], 800);
        assert_eq!(payload["b64"], true);
        assert!(payload.get("height").is_none());
        assert!(payload["infile"].is_object());

        let payload = server.payload(&Options::Standard(HighchartsOptions::default()));
        assert_eq!(payload["constr"], "chart");
    }

    #[test]
    fn scale_bounds() {
        let mut server = ExportServer::default();
        assert!(server.set_scale(0.0).is_err());
        assert_eq!(server.scale(), 1.0);
        assert_eq!("JPEG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
