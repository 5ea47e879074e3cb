//! Market data loading.
//!
//! A [`PriceProvider`] turns `(symbol, start, end)` into a daily price table.
//! [`YahooProvider`] implements it on top of the Yahoo Finance chart API.

pub mod error;
pub mod provider;
pub mod yahoo;

pub use error::{MarketError, Result};
pub use provider::{PriceProvider, normalize_symbol};
pub use yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, YahooProvider};
