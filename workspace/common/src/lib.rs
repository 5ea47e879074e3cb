//! Common transport-layer types shared between backend and frontend.
//! These structs mirror the backend handlers' request/response payloads
//! so the frontend can deserialize API responses without duplicating shapes.

mod forecast;
mod horizon;
mod prices;

pub use forecast::{ForecastPoint, ForecastResponse, ObservedPoint, TAIL_PREVIEW_ROWS};
pub use horizon::{ForecastHorizon, HorizonError, DAYS_PER_YEAR, MAX_YEARS, MIN_YEARS};
pub use prices::{PricePoint, PriceTable};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Ticker symbols listed as help text next to the symbol input.
pub const COMMON_SYMBOLS: [&str; 16] = [
    "AAPL", "ABNB", "SNAP", "TSLA", "IBM", "AMZN", "WMT", "MSFT", "GOOG", "JPM", "JNJ", "ORCL",
    "KO", "MCD", "ADBE", "NFLX",
];

/// The symbol help list as served by `/api/v1/symbols`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SymbolList {
    pub symbols: Vec<String>,
}

impl Default for SymbolList {
    fn default() -> Self {
        Self {
            symbols: COMMON_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Result of one full dashboard rerun.
///
/// Sections below the inputs are gated: `prices` is `None` until a symbol is
/// entered, and `forecast` is `None` whenever the loaded price table is empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardResponse {
    pub symbol: String,
    pub prices: Option<PriceTable>,
    pub forecast: Option<ForecastResponse>,
}

impl DashboardResponse {
    /// Response for a rerun where no symbol has been entered yet.
    pub fn idle() -> Self {
        Self {
            symbol: String::new(),
            prices: None,
            forecast: None,
        }
    }

    /// Whether the raw data chart should be drawn.
    pub fn shows_raw_chart(&self) -> bool {
        self.prices.as_ref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_list_matches_help_text() {
        let list = SymbolList::default();
        assert_eq!(list.symbols.len(), 16);
        assert_eq!(list.symbols.first().map(String::as_str), Some("AAPL"));
        assert_eq!(list.symbols.last().map(String::as_str), Some("NFLX"));
    }

    #[test]
    fn test_idle_dashboard_renders_nothing() {
        let response = DashboardResponse::idle();
        assert!(!response.shows_raw_chart());
        assert!(response.forecast.is_none());
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse {
            data: SymbolList::default(),
            message: "ok".to_string(),
            success: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["symbols"][3], "TSLA");
    }
}
