use polars::error::PolarsError;
use thiserror::Error;
use tracing::warn;

/// Failures while shaping price tables or fitting the forecaster.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// A polars operation on the price or forecast table failed
    #[error("Table error: {0}")]
    Table(String),

    /// The table lacks a column the forecaster reads
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Dataframe has less than {required} non-null rows (found {found})")]
    InsufficientData { required: usize, found: usize },

    /// Nothing to fit: constant values or a single date
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    #[error("Forecast computation error: {0}")]
    ForecastComputation(String),

    /// A date cell was null or out of range
    #[error("Date error: {0}")]
    Date(String),
}

impl From<PolarsError> for ComputeError {
    fn from(error: PolarsError) -> Self {
        let err = match error {
            PolarsError::ColumnNotFound(name) => ComputeError::MissingColumn(name.to_string()),
            other => ComputeError::Table(other.to_string()),
        };
        warn!(?err, "Polars operation failed");
        err
    }
}

pub type Result<T> = std::result::Result<T, ComputeError>;
