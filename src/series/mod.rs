//! Series: the type registry, shared properties, capability groups, data
//! points, and ingestion.

mod capabilities;
mod common;
mod data_point;
mod flowmap;
mod ingest;
#[allow(clippy::module_inception)]
mod series;
mod types;

pub use capabilities::{
    BubbleFields, CartesianFields, GridFields, JoinBy, MapFields, MapLineFields, MapPointFields,
    NullInteraction, PieFields, Provider, SizeBy, Stacking, TiledWebMapFields,
};
pub use common::SeriesCommon;
pub use data_point::{DataPoint, Endpoint};
pub use flowmap::{FlowmapFields, FlowmapMarker, MarkerType};
pub use ingest::{CsvOptions, PropertyMap};
pub use series::Series;
pub use types::{DataShape, SeriesType};
