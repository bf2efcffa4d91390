//! Export-server settings from the process environment and `.env` files.

use std::collections::HashMap;
use std::path::Path;

pub(crate) const DOMAIN_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_DOMAIN";
pub(crate) const PORT_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_PORT";
pub(crate) const PATH_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_PATH";

/// `KEY=VALUE` lines; blank lines, `#` comments and an `export ` prefix are tolerated.
pub(crate) fn parse_dotenv(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = value.strip_prefix('"').and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Reads a variable from the environment, then from `.env` in `dir`.
pub(crate) struct Settings {
    dotenv: HashMap<String, String>,
}

impl Settings {
    pub(crate) fn load(dir: &Path) -> Self {
        let path = dir.join(".env");
        let dotenv = match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("[export::env] read {}", path.display());
                parse_dotenv(&text)
            }
            Err(_) => HashMap::new(),
        };
        Self { dotenv }
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
            .or_else(|| self.dotenv.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines() {
        let vars = parse_dotenv("# export server\nHIGHCHARTS_EXPORT_SERVER_DOMAIN=charts.example.com\n\nexport HIGHCHARTS_EXPORT_SERVER_PORT = \"7801\"\nbroken line\n");
        assert_eq!(vars.get("HIGHCHARTS_EXPORT_SERVER_DOMAIN").map(String::as_str), Some("charts.example.com"));
        assert_eq!(vars.get("HIGHCHARTS_EXPORT_SERVER_PORT").map(String::as_str), Some("7801"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn settings_fall_back_to_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "HIGHMAPS_TEST_ONLY_SETTING=from-file\n").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.get("HIGHMAPS_TEST_ONLY_SETTING").as_deref(), Some("from-file"));
        assert_eq!(settings.get("HIGHMAPS_TEST_UNSET_SETTING"), None);
    }
}
