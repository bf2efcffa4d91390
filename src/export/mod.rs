//! Client for a Highcharts export server, which renders chart options to
//! images and documents.

mod env;
mod server;

pub use server::{Constructor, ExportFormat, ExportServer};
