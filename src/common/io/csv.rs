//! CSV reading through polars.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvParseOptions, CsvReadOptions}};

/// Reader settings for chart data files.
#[derive(Clone, Debug)]
pub(crate) struct CsvSettings {
    pub has_header: bool,
    pub separator: u8,
}

impl Default for CsvSettings {
    fn default() -> Self { Self { has_header: true, separator: b',' } }
}

impl CsvSettings {
    fn options(&self) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_parse_options(CsvParseOptions::default().with_separator(self.separator))
    }
}

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path, settings: &CsvSettings) -> Result<DataFrame> {
    log::debug!("[io::csv] read {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("[io::csv] Failed to open CSV file: {}", path.display()))?;
    settings.options()
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv] Failed to read CSV from {}", path.display()))
}

/// Reads CSV text into a Polars DataFrame.
pub(crate) fn read_csv_string(csv: &str, settings: &CsvSettings) -> Result<DataFrame> {
    settings.options()
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes().to_vec()))
        .finish()
        .context("[io::csv] Failed to read CSV from string")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_rows() {
        let df = read_csv_string("name,value\nFrance,3\nSpain,4.5\n", &CsvSettings::default()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names().iter().map(|c| c.as_str()).collect::<Vec<_>>(), vec!["name", "value"]);
    }

    #[test]
    fn custom_separator() {
        let settings = CsvSettings { separator: b';', ..CsvSettings::default() };
        let df = read_csv_string("a;b\n1;2\n", &settings).unwrap();
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_file_is_tagged() {
        let err = read_csv(Path::new("/nope/missing.csv"), &CsvSettings::default()).unwrap_err();
        assert!(err.to_string().starts_with("[io::csv]"));
    }
}
