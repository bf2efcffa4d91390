//! Self-contained TopoJSON topology model.
//!
//! Reads and writes the TopoJSON document format, decodes arcs (including
//! quantized, delta-encoded arcs) into GeoJSON features, and extracts arcs
//! from GeoJSON geometries.

pub mod decode;
pub mod encode;
pub mod error;
pub mod topology;

pub use error::TopoError;
pub use topology::{ArcRef, Position, Shape, TopoGeometry, Topology, Transform};
