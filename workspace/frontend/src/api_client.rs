pub mod dashboard;

use gloo_net::http::Request;
use serde::Deserialize;
use crate::settings;

pub use common::ApiResponse;

/// Error body of a failed API call
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub success: bool,
}

/// Message shown to the user for a non-OK response.
fn describe_failure(status: u16, body: Option<ErrorResponse>) -> String {
    match body {
        Some(err) => match err.code.as_str() {
            "PROVIDER_ERROR" => format!("Market data provider failed: {}", err.error),
            "FORECAST_FAILED" => format!("Forecast failed: {}", err.error),
            _ => err.error,
        },
        None => format!("HTTP error: {}", status),
    }
}

/// GET `endpoint` under the API base with `params` as the query and unwrap the response envelope.
pub async fn get<T>(endpoint: &str, params: &[(&str, String)]) -> Result<ApiResponse<T>, String>
where
    T: for<'de> Deserialize<'de>,
{
    let url = format!("{}{}", settings::get_settings().api_base_url(), endpoint);
    log::debug!("GET request to: {}", url);

    let response = Request::get(&url)
        .query(params.iter().map(|(key, value)| (*key, value.as_str())))
        .send()
        .await
        .map_err(|e| {
            let error_msg = format!("Request failed: {}", e);
            log::error!("GET {} - {}", endpoint, error_msg);
            error_msg
        })?;

    if !response.ok() {
        let status = response.status();
        let body = response.json::<ErrorResponse>().await.ok();
        if let Some(err) = &body {
            log::warn!("GET {} - {} {}: {}", endpoint, status, err.code, err.error);
        }
        let error_msg = describe_failure(status, body);
        log::error!("GET {} - {}", endpoint, error_msg);
        return Err(error_msg);
    }

    let api_response: ApiResponse<T> = response.json().await.map_err(|e| {
        let error_msg = format!("Failed to parse response: {}", e);
        log::error!("GET {} - {}", endpoint, error_msg);
        error_msg
    })?;

    log::info!("GET {} - {}", endpoint, api_response.message);
    Ok(api_response)
}
