#![doc = "Highcharts Maps configuration model: typed options, map data, and chart scripts"]
mod chart;
mod common;
mod error;
mod export;
mod geography;
mod js;
mod map_data;
mod meta;
mod options;
mod series;
mod validate;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use meta::{FromJs, HighchartsMeta, ToJs};

#[doc(inline)]
pub use js::{CallbackFunction, JavaScriptClass, JsObject, JsValue, REPLACE_PREFIX, VariableName, parse_literal, render, render_compact};

#[doc(inline)]
pub use validate::{BoundingArray, BoundingValue, Extent, NumberOrString, Toggle, is_url};

#[doc(inline)]
pub use geography::looks_like_topology;

#[doc(inline)]
pub use map_data::{
    AsyncMapData, FetchConfiguration, HttpMethod, MapData, MapSource, ReferrerPolicy, RequestCache,
    RequestCredentials, RequestMode, RequestRedirect,
};

#[doc(inline)]
pub use options::*;

#[doc(inline)]
pub use series::*;

#[doc(inline)]
pub use chart::{Chart, DEFAULT_CONTAINER};

#[doc(inline)]
pub use export::{Constructor, ExportFormat, ExportServer};

#[doc(inline)]
pub use topograph::Topology;
