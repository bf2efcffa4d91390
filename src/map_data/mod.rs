//! Map geometry: inline topologies, client-side fetches, and the slot that holds either.

mod async_map_data;
mod fetch;
#[allow(clippy::module_inception)]
mod map_data;
mod source;

pub use async_map_data::AsyncMapData;
pub use fetch::{
    FetchConfiguration, HttpMethod, ReferrerPolicy, RequestCache, RequestCredentials, RequestMode,
    RequestRedirect,
};
pub use map_data::MapData;
pub use source::MapSource;
