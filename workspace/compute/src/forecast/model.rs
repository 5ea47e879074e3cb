use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use tracing::{debug, info, instrument, trace};

use super::linalg::{normal_quantile, solve_ridge};
use super::seasonality::{Seasonality, detect_seasonalities};
use super::trend::{future_trend_sd, hinge, place_changepoints};
use super::{
    ADDITIVE_TERMS, DS, TREND, TREND_LOWER, TREND_UPPER, WEEKLY, Y, YEARLY, YHAT, YHAT_LOWER,
    YHAT_UPPER,
};
use crate::error::{ComputeError, Result};
use crate::prices::{date_column, f64_column};

/// Minimum number of non-null observations needed to fit.
pub const MIN_OBSERVATIONS: usize = 2;

/// Lower bound on the noise variance used to weight the priors, in scaled units.
const MIN_NOISE_VARIANCE: f64 = 1e-6;

/// Prior scale of the trend offset and base rate.
const TREND_PRIOR_SCALE: f64 = 5.0;

/// Hyperparameters of the decomposition model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub n_changepoints: usize,
    /// Share of the history in which changepoints may be placed
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    /// Coverage of the uncertainty interval
    pub interval_width: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
        }
    }
}

/// Additive decomposition model: piecewise-linear trend plus Fourier
/// seasonalities, fitted by maximum a posteriori estimation.
#[derive(Debug, Clone, Default)]
pub struct DecompositionModel {
    config: ModelConfig,
}

impl DecompositionModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Fits the model to a `(ds, y)` frame. Rows with a null `y` are ignored
    /// for fitting but stay on the history axis.
    #[instrument(skip(self, frame), fields(rows = frame.height()))]
    pub fn fit(&self, frame: &DataFrame) -> Result<FittedModel> {
        let ds = date_column(frame, DS)?;
        let y = f64_column(frame, Y)?;

        let mut history_dates = ds.clone();
        history_dates.sort_unstable();
        history_dates.dedup();

        let mut observations: Vec<(NaiveDate, f64)> = ds
            .into_iter()
            .zip(y)
            .filter_map(|(date, value)| value.filter(|v| v.is_finite()).map(|v| (date, v)))
            .collect();
        observations.sort_by_key(|(date, _)| *date);

        if observations.len() < MIN_OBSERVATIONS {
            return Err(ComputeError::InsufficientData {
                required: MIN_OBSERVATIONS,
                found: observations.len(),
            });
        }

        let start = observations[0].0;
        let end = observations[observations.len() - 1].0;
        let span_days = (end - start).num_days();
        if span_days == 0 {
            return Err(ComputeError::DegenerateSeries(
                "all observations share a single date".to_string(),
            ));
        }

        let (min_y, max_y) = observations
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
        if max_y - min_y == 0.0 {
            return Err(ComputeError::DegenerateSeries(
                "all observed values are identical".to_string(),
            ));
        }
        let y_scale = min_y.abs().max(max_y.abs());

        let dates: Vec<NaiveDate> = observations.iter().map(|(d, _)| *d).collect();
        let t: Vec<f64> = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days as f64)
            .collect();
        let y_scaled: Vec<f64> = observations.iter().map(|(_, v)| v / y_scale).collect();

        let changepoints = place_changepoints(
            &t,
            self.config.n_changepoints,
            self.config.changepoint_range,
        );
        let seasonalities = detect_seasonalities(&dates);
        debug!(
            "Fitting {} observations with {} changepoints and seasonalities {:?}",
            observations.len(),
            changepoints.len(),
            seasonalities.iter().map(|s| s.name).collect::<Vec<_>>()
        );

        let layout = FeatureLayout::new(changepoints, seasonalities);
        let rows: Vec<Vec<f64>> = dates
            .iter()
            .zip(&t)
            .map(|(date, t)| layout.row(*date, *t))
            .collect();

        // Prior weights are relative to the noise variance, which is first
        // taken from a straight-line fit and then from the full fit.
        let line_rows: Vec<Vec<f64>> = t.iter().map(|t| vec![1.0, *t]).collect();
        let line = solve_ridge(&line_rows, &y_scaled, &[1e-9, 1e-9])?;
        let mut noise_variance = residual_variance(&line_rows, &y_scaled, &line);

        let mut theta = solve_ridge(&rows, &y_scaled, &layout.penalty(&self.config, noise_variance))?;
        noise_variance = residual_variance(&rows, &y_scaled, &theta);
        trace!("First pass residual variance {:e}", noise_variance);

        theta = solve_ridge(&rows, &y_scaled, &layout.penalty(&self.config, noise_variance))?;
        noise_variance = residual_variance(&rows, &y_scaled, &theta);
        trace!("Final residual variance {:e}", noise_variance);

        let deltas = layout.deltas(&theta);
        let mean_abs_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        };

        info!(
            "Model fitted on {} observations from {} to {}",
            observations.len(),
            start,
            end
        );

        Ok(FittedModel {
            interval_width: self.config.interval_width,
            start,
            span_days,
            y_scale,
            layout,
            theta,
            sigma_obs: noise_variance.sqrt(),
            mean_abs_delta,
            history_dates,
            observations,
        })
    }
}

/// Column layout of the design matrix: offset, rate, one hinge per
/// changepoint, then the Fourier features of each seasonality.
#[derive(Debug, Clone)]
struct FeatureLayout {
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
}

impl FeatureLayout {
    fn new(changepoints: Vec<f64>, seasonalities: Vec<Seasonality>) -> Self {
        Self {
            changepoints,
            seasonalities,
        }
    }

    fn trend_width(&self) -> usize {
        2 + self.changepoints.len()
    }

    fn width(&self) -> usize {
        self.trend_width() + self.seasonalities.iter().map(Seasonality::width).sum::<usize>()
    }

    fn row(&self, date: NaiveDate, t: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|cp| hinge(t, *cp)));
        for seasonality in &self.seasonalities {
            row.extend(seasonality.features(date));
        }
        row
    }

    fn penalty(&self, config: &ModelConfig, noise_variance: f64) -> Vec<f64> {
        let noise = noise_variance.max(MIN_NOISE_VARIANCE);
        // Laplace(b) on rate changes, matched by variance: 2b²
        let delta_variance = 2.0 * config.changepoint_prior_scale.powi(2);
        let seasonal_variance = config.seasonality_prior_scale.powi(2);
        let trend_variance = TREND_PRIOR_SCALE.powi(2);

        let mut penalty = vec![noise / trend_variance; 2];
        penalty.extend(std::iter::repeat_n(noise / delta_variance, self.changepoints.len()));
        penalty.extend(std::iter::repeat_n(
            noise / seasonal_variance,
            self.width() - self.trend_width(),
        ));
        penalty
    }

    fn deltas<'a>(&self, theta: &'a [f64]) -> &'a [f64] {
        &theta[2..self.trend_width()]
    }

    /// Trend and per-seasonality contributions at one point, in scaled units.
    fn components(&self, theta: &[f64], date: NaiveDate, t: f64) -> (f64, Vec<f64>) {
        let row = self.row(date, t);
        let trend_width = self.trend_width();
        let trend = dot(&row[..trend_width], &theta[..trend_width]);

        let mut offset = trend_width;
        let seasonal = self
            .seasonalities
            .iter()
            .map(|s| {
                let end = offset + s.width();
                let value = dot(&row[offset..end], &theta[offset..end]);
                offset = end;
                value
            })
            .collect();
        (trend, seasonal)
    }
}

/// A fitted decomposition model, ready to extrapolate.
#[derive(Debug, Clone)]
pub struct FittedModel {
    interval_width: f64,
    start: NaiveDate,
    span_days: i64,
    y_scale: f64,
    layout: FeatureLayout,
    theta: Vec<f64>,
    sigma_obs: f64,
    mean_abs_delta: f64,
    history_dates: Vec<NaiveDate>,
    observations: Vec<(NaiveDate, f64)>,
}

impl FittedModel {
    /// Dates of the input frame, sorted and unique.
    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history_dates
    }

    /// Non-null observations the model was fitted on.
    pub fn observations(&self) -> &[(NaiveDate, f64)] {
        &self.observations
    }

    pub fn seasonalities(&self) -> Vec<&'static str> {
        self.layout.seasonalities.iter().map(|s| s.name).collect()
    }

    pub fn changepoint_count(&self) -> usize {
        self.layout.changepoints.len()
    }

    /// History axis followed by `days` consecutive days after its last date.
    pub fn make_future_dates(&self, days: usize) -> Vec<NaiveDate> {
        let mut dates = self.history_dates.clone();
        if let Some(last) = self.history_dates.last().copied() {
            dates.extend((1..=days as i64).map(|d| last + Duration::days(d)));
        }
        dates
    }

    /// [`make_future_dates`](Self::make_future_dates) as a single-column `ds` frame.
    pub fn make_future_dataframe(&self, days: usize) -> Result<DataFrame> {
        let dates = self.make_future_dates(days);
        Ok(DataFrame::new(vec![Column::new(DS.into(), dates)])?)
    }

    /// Predicts every date of a `ds` frame.
    #[instrument(skip(self, future), fields(rows = future.height()))]
    pub fn predict(&self, future: &DataFrame) -> Result<DataFrame> {
        let dates = date_column(future, DS)?;
        let z = normal_quantile(0.5 + self.interval_width / 2.0);
        let changepoint_count = self.layout.changepoints.len();

        let mut trend = Vec::with_capacity(dates.len());
        let mut trend_lower = Vec::with_capacity(dates.len());
        let mut trend_upper = Vec::with_capacity(dates.len());
        let mut yhat = Vec::with_capacity(dates.len());
        let mut yhat_lower = Vec::with_capacity(dates.len());
        let mut yhat_upper = Vec::with_capacity(dates.len());
        let mut additive = Vec::with_capacity(dates.len());
        let mut seasonal: Vec<Vec<f64>> = vec![Vec::with_capacity(dates.len()); self.layout.seasonalities.len()];

        for date in &dates {
            let t = (*date - self.start).num_days() as f64 / self.span_days as f64;
            let (trend_value, components) = self.layout.components(&self.theta, *date, t);
            let additive_value: f64 = components.iter().sum();

            let trend_sd = future_trend_sd(t - 1.0, changepoint_count, self.mean_abs_delta);
            let total_sd = (self.sigma_obs.powi(2) + trend_sd.powi(2)).sqrt();
            let point = trend_value + additive_value;

            trend.push(trend_value * self.y_scale);
            trend_lower.push((trend_value - z * trend_sd) * self.y_scale);
            trend_upper.push((trend_value + z * trend_sd) * self.y_scale);
            yhat.push(point * self.y_scale);
            yhat_lower.push((point - z * total_sd) * self.y_scale);
            yhat_upper.push((point + z * total_sd) * self.y_scale);
            additive.push(additive_value * self.y_scale);
            for (column, value) in seasonal.iter_mut().zip(&components) {
                column.push(value * self.y_scale);
            }
        }

        let component_column = |name: &str| -> Vec<Option<f64>> {
            match self.layout.seasonalities.iter().position(|s| s.name == name) {
                Some(idx) => seasonal[idx].iter().copied().map(Some).collect(),
                None => vec![None; dates.len()],
            }
        };
        let weekly = component_column(WEEKLY);
        let yearly = component_column(YEARLY);

        let df = DataFrame::new(vec![
            Column::new(DS.into(), dates),
            Column::new(TREND.into(), trend),
            Column::new(TREND_LOWER.into(), trend_lower),
            Column::new(TREND_UPPER.into(), trend_upper),
            Column::new(YHAT_LOWER.into(), yhat_lower),
            Column::new(YHAT_UPPER.into(), yhat_upper),
            Column::new(ADDITIVE_TERMS.into(), additive),
            Column::new(WEEKLY.into(), weekly),
            Column::new(YEARLY.into(), yearly),
            Column::new(YHAT.into(), yhat),
        ])?;

        Ok(df)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn residual_variance(rows: &[Vec<f64>], y: &[f64], theta: &[f64]) -> f64 {
    let sum: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, target)| (target - dot(row, theta)).powi(2))
        .sum();
    sum / y.len() as f64
}
