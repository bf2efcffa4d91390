//! Building series from arrays, CSV files and data frames.

use std::path::Path;

use geojson::FeatureCollection;
use indexmap::IndexMap;

use crate::error::Result;
#[cfg(not(feature = "dataframe"))]
use crate::error::Error;
use crate::js::JsValue;
use crate::series::{DataPoint, Series, SeriesType};

/// Data-point property name (camelCase or snake_case) → column name.
pub type PropertyMap = IndexMap<String, String>;

/// Settings for [`Series::from_csv`].
#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub has_header: bool,
    pub separator: u8,
    /// Keep only the series at this position among those generated.
    pub series_index: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self { Self { has_header: true, separator: b',', series_index: None } }
}

impl Series {
    /// A series of `series_type` whose data is read from `values` in that type's layout.
    pub fn from_array(series_type: &str, values: &JsValue) -> Result<Series> {
        let series_type: SeriesType = series_type.parse()?;
        let mut series = Series::new(series_type);
        series.common.data = Some(DataPoint::from_collection(series_type.data_shape(), values)?);
        Ok(series)
    }

    #[cfg(feature = "dataframe")]
    pub fn from_csv(
        path: impl AsRef<Path>,
        property_map: Option<&PropertyMap>,
        series_type: &str,
        options: &CsvOptions,
    ) -> Result<Vec<Series>> {
        let series_type: SeriesType = series_type.parse()?;
        let df = crate::common::read_csv(path.as_ref(), &settings(options))?;
        frame::series_from_frame(&df, property_map, series_type, options.series_index)
    }

    #[cfg(not(feature = "dataframe"))]
    pub fn from_csv(
        _path: impl AsRef<Path>,
        _property_map: Option<&PropertyMap>,
        series_type: &str,
        _options: &CsvOptions,
    ) -> Result<Vec<Series>> {
        series_type.parse::<SeriesType>()?;
        Err(Error::missing_feature("Series::from_csv", "dataframe"))
    }

    /// Like [`Series::from_csv`], reading CSV text.
    #[cfg(feature = "dataframe")]
    pub fn from_csv_str(
        csv: &str,
        property_map: Option<&PropertyMap>,
        series_type: &str,
        options: &CsvOptions,
    ) -> Result<Vec<Series>> {
        let series_type: SeriesType = series_type.parse()?;
        let df = crate::common::read_csv_string(csv, &settings(options))?;
        frame::series_from_frame(&df, property_map, series_type, options.series_index)
    }

    #[cfg(not(feature = "dataframe"))]
    pub fn from_csv_str(
        _csv: &str,
        _property_map: Option<&PropertyMap>,
        series_type: &str,
        _options: &CsvOptions,
    ) -> Result<Vec<Series>> {
        series_type.parse::<SeriesType>()?;
        Err(Error::missing_feature("Series::from_csv_str", "dataframe"))
    }

    /// One series per CSV row; see [`Series::from_dataframe_in_rows`].
    #[cfg(feature = "dataframe")]
    pub fn from_csv_in_rows(path: impl AsRef<Path>, series_type: &str, options: &CsvOptions) -> Result<Vec<Series>> {
        let series_type: SeriesType = series_type.parse()?;
        let df = crate::common::read_csv(path.as_ref(), &settings(options))?;
        frame::series_from_rows(&df, series_type, options.series_index)
    }

    #[cfg(not(feature = "dataframe"))]
    pub fn from_csv_in_rows(_path: impl AsRef<Path>, series_type: &str, _options: &CsvOptions) -> Result<Vec<Series>> {
        series_type.parse::<SeriesType>()?;
        Err(Error::missing_feature("Series::from_csv_in_rows", "dataframe"))
    }

    /// A series with one point per feature, read from the feature properties.
    ///
    /// A property map selects and renames properties (point property → feature
    /// property); without one every property is taken as is.
    pub fn from_features(
        features: &FeatureCollection,
        property_map: Option<&PropertyMap>,
        series_type: &str,
    ) -> Result<Series> {
        let series_type: SeriesType = series_type.parse()?;
        let data = features.features.iter()
            .map(|feature| {
                let properties = feature.properties.clone().unwrap_or_default();
                let mut point = DataPoint::default();
                match property_map {
                    Some(map) => {
                        for (property, source) in map {
                            let value = properties.get(source).map_or(JsValue::Null, JsValue::from_json);
                            point.set_property(property, value)?;
                        }
                    }
                    None => {
                        for (key, value) in &properties {
                            point.set_property(key, JsValue::from_json(value))?;
                        }
                    }
                }
                Ok(point)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::new(series_type).with_data(data))
    }

    /// Series from data frame columns.
    ///
    /// With a property map there is one series whose points take each mapped
    /// column; unknown property names land in each point's `extra`. Without
    /// one, map-type series take every column whose name is a point property
    /// (others become join keys), and other types take the first column as
    /// `x` (or `name`, if it holds strings) and each remaining numeric column
    /// as its own series.
    #[cfg(feature = "dataframe")]
    pub fn from_dataframe(
        df: &polars::frame::DataFrame,
        property_map: Option<&PropertyMap>,
        series_type: &str,
        series_index: Option<usize>,
    ) -> Result<Vec<Series>> {
        frame::series_from_frame(df, property_map, series_type.parse()?, series_index)
    }

    /// One series per data frame row: x categories from column names, values
    /// from the row, and the name from the first string column (or the row index).
    #[cfg(feature = "dataframe")]
    pub fn from_dataframe_in_rows(
        df: &polars::frame::DataFrame,
        series_type: &str,
        series_index: Option<usize>,
    ) -> Result<Vec<Series>> {
        frame::series_from_rows(df, series_type.parse()?, series_index)
    }
}

#[cfg(feature = "dataframe")]
fn settings(options: &CsvOptions) -> crate::common::CsvSettings {
    crate::common::CsvSettings { has_header: options.has_header, separator: options.separator }
}

#[cfg(feature = "dataframe")]
pub(crate) mod frame {
    use polars::prelude::{AnyValue, Column, DataFrame, DataType};

    use crate::error::{Error, Result};
    use crate::js::{JsObject, JsValue};
    use crate::meta::{HighchartsMeta, camel_case};
    use crate::series::{DataPoint, DataShape, PropertyMap, Series, SeriesType};

    const POINT_KEYS: &[&str] = &[
        "id", "name", "x", "y", "z", "value", "lat", "lon", "from", "to", "weight", "color",
        "path", "middleX", "middleY", "labelRank", "selected", "description", "drilldown",
    ];

    fn any_to_js(value: AnyValue<'_>) -> JsValue {
        match value {
            AnyValue::Null => JsValue::Null,
            AnyValue::Boolean(b) => JsValue::Bool(b),
            AnyValue::String(s) => JsValue::String(s.to_string()),
            AnyValue::StringOwned(s) => JsValue::String(s.to_string()),
            other => match other.extract::<f64>() {
                Some(n) => JsValue::Number(n),
                None => JsValue::String(other.to_string()),
            },
        }
    }

    fn cell(column: &Column, row: usize) -> Result<JsValue> {
        let value = column.get(row)
            .map_err(|e| Error::value(format!("[series::frame] row {row} of \"{}\": {e}", column.name())))?;
        Ok(any_to_js(value))
    }

    fn is_numeric(column: &Column) -> bool {
        matches!(
            column.dtype(),
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
                | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
                | DataType::Float32 | DataType::Float64
        )
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
        df.column(name).map_err(|_| Error::value(format!("column \"{name}\" not found in the data frame")))
    }

    /// Property receiving a lone value in `shape`.
    fn value_key(shape: DataShape) -> Result<&'static str> {
        match shape {
            DataShape::Value | DataShape::Grid => Ok("value"),
            DataShape::Z | DataShape::Xyz => Ok("z"),
            DataShape::LatLon | DataShape::Cartesian | DataShape::Named => Ok("y"),
            DataShape::Connection | DataShape::None => {
                Err(Error::value("unable to infer data columns for this series type; supply a property map"))
            }
        }
    }

    fn select(mut series: Vec<Series>, series_index: Option<usize>) -> Result<Vec<Series>> {
        match series_index {
            None => Ok(series),
            Some(i) if i < series.len() => Ok(vec![series.swap_remove(i)]),
            Some(i) => Err(Error::value(format!(
                "series_index {i} is out of range for {} generated series",
                series.len()
            ))),
        }
    }

    fn points(df: &DataFrame, columns: &[(String, &Column)]) -> Result<Vec<DataPoint>> {
        (0..df.height())
            .map(|row| {
                let mut obj = JsObject::new();
                for (key, column) in columns {
                    obj.insert(key.clone(), cell(column, row)?);
                }
                DataPoint::from_js_object(&obj)
            })
            .collect()
    }

    pub(crate) fn series_from_frame(
        df: &DataFrame,
        property_map: Option<&PropertyMap>,
        series_type: SeriesType,
        series_index: Option<usize>,
    ) -> Result<Vec<Series>> {
        log::debug!("[series::frame] {} rows × {} columns as {series_type}", df.height(), df.width());

        if let Some(property_map) = property_map {
            let columns = property_map.iter()
                .map(|(property, name)| Ok((property.clone(), column(df, name)?)))
                .collect::<Result<Vec<_>>>()?;
            let series = Series::new(series_type).with_data(points(df, &columns)?);
            return select(vec![series], series_index);
        }

        if series_type.is_geographic() {
            let columns: Vec<(String, &Column)> = df.get_columns().iter()
                .map(|c| {
                    let camel = camel_case(c.name().as_str());
                    let key = if POINT_KEYS.contains(&camel.as_str()) { camel } else { c.name().to_string() };
                    (key, c)
                })
                .collect();
            if !columns.iter().any(|(key, _)| POINT_KEYS.contains(&key.as_str())) {
                return Err(Error::value("unable to infer data columns: no column is named after a point property"));
            }
            let series = Series::new(series_type).with_data(points(df, &columns)?);
            return select(vec![series], series_index);
        }

        let key = value_key(series_type.data_shape())?;
        let all = df.get_columns();
        let (first, rest) = match all.split_first() {
            Some((first, rest)) if !rest.is_empty() => (Some(first), rest),
            Some((only, _)) => (None, std::slice::from_ref(only)),
            None => return Ok(Vec::new()),
        };
        let x_key = match first {
            Some(c) if is_numeric(c) => "x",
            _ => "name",
        };
        let series = rest.iter()
            .filter(|c| is_numeric(c))
            .map(|c| {
                let mut columns = vec![(key.to_string(), c)];
                if let Some(first) = first {
                    columns.insert(0, (x_key.to_string(), first));
                }
                let mut series = Series::new(series_type).with_data(points(df, &columns)?);
                series.common.name = Some(c.name().to_string());
                Ok(series)
            })
            .collect::<Result<Vec<_>>>()?;
        select(series, series_index)
    }

    pub(crate) fn series_from_rows(
        df: &DataFrame,
        series_type: SeriesType,
        series_index: Option<usize>,
    ) -> Result<Vec<Series>> {
        let key = value_key(series_type.data_shape())?;
        let columns = df.get_columns();
        let label = columns.iter().find(|c| matches!(c.dtype(), DataType::String));
        let values: Vec<&Column> = columns.iter().filter(|c| is_numeric(c)).collect();

        let series = (0..df.height())
            .map(|row| {
                let data = values.iter()
                    .map(|c| {
                        let mut obj = JsObject::new();
                        obj.insert("name".into(), JsValue::String(c.name().to_string()));
                        obj.insert(key.into(), cell(c, row)?);
                        DataPoint::from_js_object(&obj)
                    })
                    .collect::<Result<Vec<_>>>()?;
                let name = match label {
                    Some(c) => match cell(c, row)? {
                        JsValue::String(s) => s,
                        _ => row.to_string(),
                    },
                    None => row.to_string(),
                };
                let mut series = Series::new(series_type).with_data(data);
                series.common.name = Some(name);
                Ok(series)
            })
            .collect::<Result<Vec<_>>>()?;
        select(series, series_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::parse_literal;

    #[test]
    fn from_array_uses_type_layout() {
        let series = Series::from_array("mapbubble", &parse_literal("[['fr', 4], ['de', 9]]").unwrap()).unwrap();
        assert_eq!(series.common.data.unwrap()[1].z, Some(9.0));

        let triples = parse_literal("[[1, 2, 30], [3, 4, 50]]").unwrap();
        let series = Series::from_array("bubble", &triples).unwrap();
        assert_eq!(series.common.data.unwrap()[1].x, Some(3.0));
        assert!(Series::from_array("mapbubble", &triples).is_err());
    }

    #[test]
    fn invalid_series_type_from_every_factory() {
        let expected = "series_type expects a valid Highcharts series type. Received: choropleth";
        let values = parse_literal("[1, 2]").unwrap();
        assert_eq!(Series::from_array("choropleth", &values).unwrap_err().to_string(), expected);
        let options = CsvOptions::default();
        assert_eq!(Series::from_csv("missing.csv", None, "choropleth", &options).unwrap_err().to_string(), expected);
        assert_eq!(Series::from_csv_str("a,b\n1,2\n", None, "choropleth", &options).unwrap_err().to_string(), expected);
        assert_eq!(Series::from_csv_in_rows("missing.csv", "choropleth", &options).unwrap_err().to_string(), expected);
        let features = FeatureCollection { bbox: None, features: Vec::new(), foreign_members: None };
        assert_eq!(Series::from_features(&features, None, "choropleth").unwrap_err().to_string(), expected);
    }

    #[test]
    fn feature_properties_become_points() {
        let features: FeatureCollection = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"name": "Texas", "value": 29, "fips": "48"}}
        ]}"#.parse().unwrap();
        let series = Series::from_features(&features, None, "map").unwrap();
        let point = &series.common.data.as_ref().unwrap()[0];
        assert_eq!(point.name.as_deref(), Some("Texas"));
        assert_eq!(point.value, Some(29.0));
        assert_eq!(point.extra.get("fips"), Some(&JsValue::String("48".into())));

        let mut map = PropertyMap::new();
        map.insert("value".into(), "value".into());
        let series = Series::from_features(&features, Some(&map), "map").unwrap();
        let point = &series.common.data.as_ref().unwrap()[0];
        assert_eq!((point.name.as_deref(), point.value), (None, Some(29.0)));
    }

    #[cfg(feature = "dataframe")]
    mod frames {
        use super::*;

        const CSV: &str = "year,exports,imports\n2020,10,12\n2021,11,15\n";

        #[test]
        fn one_series_per_numeric_column() {
            let series = Series::from_csv_str(CSV, None, "line", &CsvOptions::default()).unwrap();
            assert_eq!(series.len(), 2);
            assert_eq!(series[1].common.name.as_deref(), Some("imports"));
            let data = series[0].common.data.as_ref().unwrap();
            assert_eq!((data[1].x, data[1].y), (Some(2021.0), Some(11.0)));
        }

        #[test]
        fn series_index_selects() {
            let options = CsvOptions { series_index: Some(1), ..CsvOptions::default() };
            let series = Series::from_csv_str(CSV, None, "column", &options).unwrap();
            assert_eq!(series.len(), 1);
            assert_eq!(series[0].common.name.as_deref(), Some("imports"));

            let options = CsvOptions { series_index: Some(5), ..CsvOptions::default() };
            assert!(Series::from_csv_str(CSV, None, "column", &options).is_err());
        }

        #[test]
        fn property_map_with_join_key() {
            let mut map = PropertyMap::new();
            map.insert("hc-key".into(), "code".into());
            map.insert("value".into(), "population".into());
            let csv = "code,population\nfr,68\nde,84\n";
            let series = Series::from_csv_str(csv, Some(&map), "map", &CsvOptions::default()).unwrap();
            let data = series[0].common.data.as_ref().unwrap();
            assert_eq!(data[0].value, Some(68.0));
            assert_eq!(data[0].extra.get("hc-key"), Some(&JsValue::String("fr".into())));

            map.insert("name".into(), "country".into());
            assert!(Series::from_csv_str(csv, Some(&map), "map", &CsvOptions::default()).is_err());
        }

        #[test]
        fn map_series_infer_point_columns() {
            let csv = "hc-key,name,value\nfr,France,68\n";
            let series = Series::from_csv_str(csv, None, "map", &CsvOptions::default()).unwrap();
            let point = &series[0].common.data.as_ref().unwrap()[0];
            assert_eq!(point.name.as_deref(), Some("France"));
            assert_eq!(point.extra.get("hc-key"), Some(&JsValue::String("fr".into())));
        }

        #[test]
        fn rows_become_series() {
            let csv = "country,2020,2021\nFrance,1,2\nSpain,3,4\n";
            let df = crate::common::read_csv_string(csv, &crate::common::CsvSettings::default()).unwrap();
            let series = Series::from_dataframe_in_rows(&df, "column", None).unwrap();
            assert_eq!(series.len(), 2);
            assert_eq!(series[1].common.name.as_deref(), Some("Spain"));
            let data = series[1].common.data.as_ref().unwrap();
            assert_eq!((data[0].name.as_deref(), data[0].y), (Some("2020"), Some(3.0)));
        }
    }
}
