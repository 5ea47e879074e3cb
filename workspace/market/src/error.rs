use chrono::NaiveDate;
use thiserror::Error;

/// Error types for market data loading
#[derive(Error, Debug)]
pub enum MarketError {
    /// The symbol is empty after trimming
    #[error("Symbol must not be empty")]
    EmptySymbol,

    /// The requested start date lies after the end date
    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Transport level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider reported an error inside the response body
    #[error("Provider error {code}: {description}")]
    Provider { code: String, description: String },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Building the price table failed
    #[error(transparent)]
    Compute(#[from] compute::ComputeError),
}

/// Type alias for Result with MarketError
pub type Result<T> = std::result::Result<T, MarketError>;
