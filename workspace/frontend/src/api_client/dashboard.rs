use chrono::NaiveDate;
use common::{ApiResponse, DashboardResponse, ForecastHorizon, SymbolList};
use crate::api_client;

/// Inputs of the sidebar
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardInputs {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub horizon: ForecastHorizon,
}

impl DashboardInputs {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            symbol: String::new(),
            start_date: today,
            end_date: today,
            horizon: ForecastHorizon::default(),
        }
    }

    /// Whether a symbol has been entered.
    pub fn is_ready(&self) -> bool {
        !self.symbol.trim().is_empty()
    }

    /// Query parameters of `/dashboard` for these inputs.
    pub fn query_params(&self) -> [(&'static str, String); 4] {
        [
            ("symbol", self.symbol.trim().to_string()),
            ("start_date", self.start_date.to_string()),
            ("end_date", self.end_date.to_string()),
            ("years", self.horizon.years().to_string()),
        ]
    }
}

pub async fn get_dashboard(inputs: &DashboardInputs) -> Result<ApiResponse<DashboardResponse>, String> {
    log::trace!("Fetching dashboard for {:?}", inputs);

    let result = api_client::get::<DashboardResponse>("/dashboard", &inputs.query_params()).await;

    if let Err(ref e) = result {
        log::error!("Failed to fetch dashboard: {}", e);
    } else {
        log::info!("Successfully fetched dashboard for {}", inputs.symbol);
    }

    result
}

pub async fn get_symbols() -> Result<SymbolList, String> {
    log::trace!("Fetching symbol suggestions");
    api_client::get::<SymbolList>("/symbols", &[]).await.map(|r| r.data)
}
