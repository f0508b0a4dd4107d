pub mod palette;
pub mod polar;

pub use polar::{render_sky_chart, ChartStyle};
