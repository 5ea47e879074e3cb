use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest selectable horizon, in years.
pub const MIN_YEARS: u32 = 1;
/// Largest selectable horizon, in years.
pub const MAX_YEARS: u32 = 5;
/// Days per forecast year. No leap-year adjustment.
pub const DAYS_PER_YEAR: u32 = 365;

/// Forecast horizon selected with the years slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("forecast horizon must be between {} and {} years, got {}", MIN_YEARS, MAX_YEARS, .0)]
pub struct HorizonError(pub u32);

impl ForecastHorizon {
    pub fn new(years: u32) -> Result<Self, HorizonError> {
        if (MIN_YEARS..=MAX_YEARS).contains(&years) {
            Ok(Self(years))
        } else {
            Err(HorizonError(years))
        }
    }

    pub fn years(&self) -> u32 {
        self.0
    }

    /// Number of days to extrapolate beyond the last observed date.
    pub fn days(&self) -> usize {
        (self.0 * DAYS_PER_YEAR) as usize
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self(MIN_YEARS)
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = HorizonError;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        Self::new(years)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(horizon: ForecastHorizon) -> Self {
        horizon.0
    }
}
