use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A periodic component modelled by a truncated Fourier series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seasonality {
    pub name: &'static str,
    /// Period in days
    pub period: f64,
    pub fourier_order: usize,
}

impl Seasonality {
    pub const fn yearly() -> Self {
        Self {
            name: "yearly",
            period: 365.25,
            fourier_order: 10,
        }
    }

    pub const fn weekly() -> Self {
        Self {
            name: "weekly",
            period: 7.0,
            fourier_order: 3,
        }
    }

    /// Number of design matrix columns taken by this component.
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }

    /// Fourier features `sin(2πkt/P), cos(2πkt/P)` for `k = 1..=order`.
    pub fn features(&self, date: NaiveDate) -> Vec<f64> {
        let t = days_since_epoch(date);
        let mut out = Vec::with_capacity(self.width());
        for k in 1..=self.fourier_order {
            let x = 2.0 * PI * k as f64 * t / self.period;
            out.push(x.sin());
            out.push(x.cos());
        }
        out
    }
}

/// Seasonalities enabled by default for the given observation dates.
///
/// Yearly needs at least two years of history. Weekly needs two weeks of
/// history sampled more often than weekly. Daily is never enabled since the
/// input is at most daily.
pub fn detect_seasonalities(dates: &[NaiveDate]) -> Vec<Seasonality> {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return Vec::new();
    };
    let span = (*last - *first).num_days();
    let min_spacing = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .filter(|d| *d > 0)
        .min();

    let mut seasonalities = Vec::new();
    if span >= 730 {
        seasonalities.push(Seasonality::yearly());
    }
    if span >= 14 && min_spacing.is_some_and(|d| d < 7) {
        seasonalities.push(Seasonality::weekly());
    }
    seasonalities
}

fn days_since_epoch(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}
