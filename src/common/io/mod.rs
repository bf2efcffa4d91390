#[cfg(feature = "dataframe")]
mod csv;
#[cfg(feature = "shapefile")]
mod shp;

#[cfg(feature = "dataframe")]
pub(crate) use csv::*;
#[cfg(feature = "shapefile")]
pub(crate) use shp::*;
