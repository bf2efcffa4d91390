use std::{fmt, str::FromStr};

use crate::error::{Error, Result};
use crate::js::JsValue;
use crate::meta::{FromJs, ToJs};

/// Series types understood by Highcharts Maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeriesType {
    Area,
    AreaSpline,
    Bar,
    Bubble,
    Column,
    Heatmap,
    Line,
    Pie,
    Scatter,
    Spline,
    Map,
    MapBubble,
    MapLine,
    MapPoint,
    Flowmap,
    GeoHeatmap,
    TiledWebMap,
}

/// How bare numbers and arrays in a series' `data` map onto point properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataShape {
    /// `value`, or `[name, value]`.
    Value,
    /// `z`, `[z]`, or `[name, z]`.
    Z,
    /// `z`, `[z]`, `[name, z]`, or `[x, y, z]`.
    Xyz,
    /// `y`, or `[name, y]`; objects may carry `lat`/`lon`.
    LatLon,
    /// `y`, or `[x, y]`.
    Cartesian,
    /// `value`, or `[x, y, value]`.
    Grid,
    /// `y`, or `[name, y]`.
    Named,
    /// `[from, to]` or `[from, to, weight]`.
    Connection,
    /// No data accepted.
    None,
}

impl SeriesType {
    pub const ALL: &'static [SeriesType] = &[
        SeriesType::Area, SeriesType::AreaSpline, SeriesType::Bar, SeriesType::Bubble,
        SeriesType::Column, SeriesType::Heatmap, SeriesType::Line, SeriesType::Pie,
        SeriesType::Scatter, SeriesType::Spline, SeriesType::Map, SeriesType::MapBubble,
        SeriesType::MapLine, SeriesType::MapPoint, SeriesType::Flowmap, SeriesType::GeoHeatmap,
        SeriesType::TiledWebMap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesType::Area => "area",
            SeriesType::AreaSpline => "areaspline",
            SeriesType::Bar => "bar",
            SeriesType::Bubble => "bubble",
            SeriesType::Column => "column",
            SeriesType::Heatmap => "heatmap",
            SeriesType::Line => "line",
            SeriesType::Pie => "pie",
            SeriesType::Scatter => "scatter",
            SeriesType::Spline => "spline",
            SeriesType::Map => "map",
            SeriesType::MapBubble => "mapbubble",
            SeriesType::MapLine => "mapline",
            SeriesType::MapPoint => "mappoint",
            SeriesType::Flowmap => "flowmap",
            SeriesType::GeoHeatmap => "geoheatmap",
            SeriesType::TiledWebMap => "tiledwebmap",
        }
    }

    /// Types that are drawn with the maps constructor.
    pub fn is_maps_series(&self) -> bool {
        matches!(
            self,
            SeriesType::Map
                | SeriesType::MapBubble
                | SeriesType::MapLine
                | SeriesType::MapPoint
                | SeriesType::Heatmap
                | SeriesType::Pie
                | SeriesType::Flowmap
                | SeriesType::GeoHeatmap
                | SeriesType::TiledWebMap
        )
    }

    /// Types whose geometry comes from map data rather than axes.
    pub(crate) fn is_geographic(&self) -> bool {
        matches!(
            self,
            SeriesType::Map
                | SeriesType::MapBubble
                | SeriesType::MapLine
                | SeriesType::MapPoint
                | SeriesType::Flowmap
                | SeriesType::GeoHeatmap
        )
    }

    /// Highcharts module (path under `code.highcharts.com`, no extension) the type needs
    /// beyond the core library.
    pub fn required_module(&self) -> Option<&'static str> {
        match self {
            SeriesType::Bubble | SeriesType::MapBubble => Some("highcharts-more"),
            SeriesType::Heatmap => Some("modules/heatmap"),
            SeriesType::Flowmap => Some("modules/flowmap"),
            SeriesType::GeoHeatmap => Some("modules/geoheatmap"),
            SeriesType::TiledWebMap => Some("modules/tiledwebmap"),
            _ => None,
        }
    }

    pub fn data_shape(&self) -> DataShape {
        match self {
            SeriesType::Map | SeriesType::GeoHeatmap | SeriesType::MapLine => DataShape::Value,
            SeriesType::Bubble => DataShape::Xyz,
            SeriesType::MapBubble => DataShape::Z,
            SeriesType::MapPoint => DataShape::LatLon,
            SeriesType::Heatmap => DataShape::Grid,
            SeriesType::Pie => DataShape::Named,
            SeriesType::Flowmap => DataShape::Connection,
            SeriesType::TiledWebMap => DataShape::None,
            SeriesType::Area
            | SeriesType::AreaSpline
            | SeriesType::Bar
            | SeriesType::Column
            | SeriesType::Line
            | SeriesType::Scatter
            | SeriesType::Spline => DataShape::Cartesian,
        }
    }
}

impl FromStr for SeriesType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        SeriesType::ALL.iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| Error::value(format!("series_type expects a valid Highcharts series type. Received: {s}")))
    }
}

impl fmt::Display for SeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromJs for SeriesType {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::String(s) => s.parse(),
            other => Err(Error::value(format!(
                "series_type expects a valid Highcharts series type. Received: {}",
                other.describe()
            ))),
        }
    }
}

impl ToJs for SeriesType {
    fn to_js(&self) -> JsValue { JsValue::String(self.as_str().to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for t in SeriesType::ALL {
            assert_eq!(t.as_str().parse::<SeriesType>().unwrap(), *t);
        }
        assert_eq!("MapBubble".parse::<SeriesType>().unwrap(), SeriesType::MapBubble);
    }

    #[test]
    fn unknown_type() {
        let err = "choropleth".parse::<SeriesType>().unwrap_err();
        assert_eq!(err.to_string(), "series_type expects a valid Highcharts series type. Received: choropleth");
    }

    #[test]
    fn maps_series() {
        assert!(SeriesType::Map.is_maps_series());
        assert!(SeriesType::TiledWebMap.is_maps_series());
        assert!(!SeriesType::Line.is_maps_series());
        assert_eq!(SeriesType::Flowmap.required_module(), Some("modules/flowmap"));
        assert_eq!(SeriesType::Column.required_module(), None);
    }
}
