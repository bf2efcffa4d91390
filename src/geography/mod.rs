//! Conversions between geographic documents and the object model.
//!
//! GeoJSON values and TopoJSON topologies take part in the same
//! dict / JSON / JavaScript-literal conversions as every option type.

mod geojson;
mod topojson;

pub use topojson::looks_like_topology;
