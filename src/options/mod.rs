//! The options tree: top-level options and the objects under them.

mod chart;
mod color_axis;
mod drilldown;
mod highcharts;
mod language;
mod legend;
mod map_navigation;
mod map_views;
mod plot_options;
mod projections;
mod shared;
mod title;

pub use chart::ChartOptions;
pub use color_axis::{ColorAxis, ColorAxisType, ColorStop};
pub use drilldown::Drilldown;
pub use highcharts::{HighchartsMapsOptions, HighchartsOptions, Options};
pub use language::Language;
pub use legend::{Credits, Legend, LegendLayout};
pub use map_navigation::{AlignTo, MapNavigationOptions, NavigationButton, NavigationButtons};
pub use map_views::{Inset, InsetOptions, InsetUnits, MapViewOptions, RelativeTo};
pub use plot_options::PlotOptions;
pub use projections::{CustomProjection, ProjectionOptions};
pub use shared::SharedMapsOptions;
pub use title::{Align, TitleOptions, VerticalAlign};
