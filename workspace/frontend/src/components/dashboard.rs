mod forecast_chart;
mod forecast_table;
mod raw_chart;
mod view;

pub use forecast_chart::ForecastChart;
pub use forecast_table::ForecastTable;
pub use raw_chart::RawChart;
pub use view::Dashboard;
