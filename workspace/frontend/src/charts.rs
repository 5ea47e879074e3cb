//! Plotly figures of the dashboard.

use common::{ForecastResponse, PriceTable};
use plotly::common::{Fill, Line, Marker, Mode, Title};
use plotly::layout::{Axis, RangeSlider};
use plotly::{Layout, Plot, Scatter};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    fn newPlot(div_id: &str, data: JsValue, layout: JsValue);
}

pub const RAW_CHART_TITLE: &str = "Time Series data";
pub const FORECAST_CHART_WIDTH: usize = 900;
pub const FORECAST_CHART_HEIGHT: usize = 600;

const BAND_COLOR: &str = "rgba(0, 114, 178, 0.2)";
const FORECAST_COLOR: &str = "rgb(0, 114, 178)";

/// Open and close prices over time with a range slider.
pub fn raw_data_plot(table: &PriceTable) -> Plot {
    let dates: Vec<String> = table.rows.iter().map(|r| r.date.to_string()).collect();
    let open: Vec<Option<f64>> = table.rows.iter().map(|r| r.open).collect();
    let close: Vec<Option<f64>> = table.rows.iter().map(|r| r.close).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(dates.clone(), open)
            .mode(Mode::Lines)
            .name("stock_open"),
    );
    plot.add_trace(
        Scatter::new(dates, close)
            .mode(Mode::Lines)
            .name("stock_close"),
    );
    plot.set_layout(
        Layout::new()
            .title(Title::with_text(RAW_CHART_TITLE))
            .x_axis(Axis::new().range_slider(RangeSlider::new().visible(true))),
    );
    plot
}

/// Observed closes, the predicted line and its uncertainty band.
pub fn forecast_plot(forecast: &ForecastResponse) -> Plot {
    let observed_dates: Vec<String> = forecast.observed.iter().map(|p| p.ds.to_string()).collect();
    let observed: Vec<f64> = forecast.observed.iter().map(|p| p.y).collect();

    let dates: Vec<String> = forecast.rows.iter().map(|r| r.ds.to_string()).collect();
    let yhat: Vec<f64> = forecast.rows.iter().map(|r| r.yhat).collect();
    let lower: Vec<f64> = forecast.rows.iter().map(|r| r.yhat_lower).collect();
    let upper: Vec<f64> = forecast.rows.iter().map(|r| r.yhat_upper).collect();

    let mut plot = Plot::new();
    // Band: lower bound first, the upper bound fills down to it
    plot.add_trace(
        Scatter::new(dates.clone(), lower)
            .mode(Mode::Lines)
            .name("yhat_lower")
            .line(Line::new().width(0.0))
            .show_legend(false),
    );
    plot.add_trace(
        Scatter::new(dates.clone(), upper)
            .mode(Mode::Lines)
            .name("yhat_upper")
            .line(Line::new().width(0.0))
            .fill(Fill::ToNextY)
            .fill_color(BAND_COLOR)
            .show_legend(false),
    );
    plot.add_trace(
        Scatter::new(dates, yhat)
            .mode(Mode::Lines)
            .name("yhat")
            .line(Line::new().color(FORECAST_COLOR).width(2.0)),
    );
    plot.add_trace(
        Scatter::new(observed_dates, observed)
            .mode(Mode::Markers)
            .name("y")
            .marker(Marker::new().size(3).color("black")),
    );
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text("Close")))
            .width(FORECAST_CHART_WIDTH)
            .height(FORECAST_CHART_HEIGHT),
    );
    plot
}

/// Draws `plot` into the element with id `div_id`.
pub fn render_plot(div_id: &str, plot: &Plot) -> Result<(), String> {
    let data_json = serde_json::to_string(plot.data())
        .map_err(|e| format!("Failed to serialize chart data: {}", e))?;
    let layout_json = serde_json::to_string(plot.layout())
        .map_err(|e| format!("Failed to serialize chart layout: {}", e))?;

    let data_js = js_sys::JSON::parse(&data_json)
        .map_err(|e| format!("Failed to parse chart data: {:?}", e))?;
    let layout_js = js_sys::JSON::parse(&layout_json)
        .map_err(|e| format!("Failed to parse chart layout: {:?}", e))?;

    log::trace!("Rendering chart into #{}", div_id);
    newPlot(div_id, data_js, layout_js);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::{ForecastPoint, ObservedPoint, PricePoint};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_raw_data_plot() {
        let table = PriceTable {
            symbol: "AAPL".to_string(),
            start_date: day(1),
            end_date: day(5),
            rows: (2..4)
                .map(|d| PricePoint {
                    date: day(d),
                    open: Some(1.0),
                    high: Some(2.0),
                    low: Some(0.5),
                    close: Some(1.5),
                    adj_close: Some(1.5),
                    volume: Some(10),
                })
                .collect(),
        };

        let json = raw_data_plot(&table).to_json();
        assert!(json.contains("stock_open"));
        assert!(json.contains("stock_close"));
        assert!(json.contains(RAW_CHART_TITLE));
        assert!(json.contains("rangeslider"));
        assert!(json.contains("2020-01-03"));
    }

    #[test]
    fn test_forecast_plot() {
        let forecast = ForecastResponse {
            symbol: "AAPL".to_string(),
            years: 1,
            days: 365,
            observed: vec![ObservedPoint { ds: day(2), y: 1.0 }],
            rows: (2..5)
                .map(|d| ForecastPoint {
                    ds: day(d),
                    trend: 1.0,
                    trend_lower: 1.0,
                    trend_upper: 1.0,
                    yhat_lower: 0.5,
                    yhat_upper: 1.5,
                    additive_terms: 0.0,
                    weekly: Some(0.0),
                    yearly: None,
                    yhat: 1.0,
                })
                .collect(),
        };

        let plot = forecast_plot(&forecast);
        let json = plot.to_json();
        assert!(json.contains("yhat_upper"));
        assert!(json.contains("tonexty"));
        assert!(json.contains("\"width\":900"));
        assert!(json.contains("\"height\":600"));
        assert!(json.contains("Close"));
    }
}
