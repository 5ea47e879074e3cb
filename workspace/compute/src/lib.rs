pub mod error;
pub mod forecast;
pub mod prices;

pub use error::{ComputeError, Result};
pub use forecast::{ForecastRun, forecast_prices, tail_preview};
pub use prices::{PriceBar, build_price_table, empty_price_table};

use forecast::{DecompositionModel, ModelConfig};

/// Returns the forecasting model used by the application.
///
/// Every setting is left at its default: 25 changepoints in the first 80% of
/// the history, automatic yearly and weekly seasonality, 80% intervals.
pub fn default_model() -> DecompositionModel {
    DecompositionModel::new(ModelConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_settings() {
        let model = default_model();
        let config = model.config();
        assert_eq!(config.n_changepoints, 25);
        assert_eq!(config.changepoint_range, 0.8);
        assert_eq!(config.changepoint_prior_scale, 0.05);
        assert_eq!(config.seasonality_prior_scale, 10.0);
        assert_eq!(config.interval_width, 0.8);
    }
}
