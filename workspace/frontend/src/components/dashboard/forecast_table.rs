use common::{ForecastPoint, ForecastResponse};
use yew::prelude::*;

const HEADERS: [&str; 10] = [
    "ds",
    "trend",
    "trend_lower",
    "trend_upper",
    "yhat_lower",
    "yhat_upper",
    "additive_terms",
    "weekly",
    "yearly",
    "yhat",
];

fn format_value(value: f64) -> String {
    format!("{:.6}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "None".to_string())
}

fn row_cells(point: &ForecastPoint) -> [String; 10] {
    [
        point.ds.to_string(),
        format_value(point.trend),
        format_value(point.trend_lower),
        format_value(point.trend_upper),
        format_value(point.yhat_lower),
        format_value(point.yhat_upper),
        format_value(point.additive_terms),
        format_optional(point.weekly),
        format_optional(point.yearly),
        format_value(point.yhat),
    ]
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub forecast: ForecastResponse,
}

/// Preview of the last rows of the forecast table.
#[function_component(ForecastTable)]
pub fn forecast_table(props: &Props) -> Html {
    html! {
        <>
            <h2 class="text-lg font-semibold mb-2">{"Forecast data"}</h2>
            <div class="overflow-x-auto">
                <table class="table table-zebra table-sm">
                    <thead>
                        <tr>
                            { for HEADERS.iter().map(|h| html! { <th>{*h}</th> }) }
                        </tr>
                    </thead>
                    <tbody>
                        { for props.forecast.tail().iter().map(|point| html! {
                            <tr>
                                { for row_cells(point).into_iter().map(|cell| html! { <td class="font-mono">{cell}</td> }) }
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_row_cells_follow_headers() {
        let point = ForecastPoint {
            ds: NaiveDate::from_ymd_opt(2021, 12, 30).unwrap(),
            trend: 1.5,
            trend_lower: 1.25,
            trend_upper: 1.75,
            yhat_lower: 1.0,
            yhat_upper: 2.0,
            additive_terms: 0.1,
            weekly: Some(0.1),
            yearly: None,
            yhat: 1.6,
        };

        let cells = row_cells(&point);
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[0], "2021-12-30");
        assert_eq!(cells[1], "1.500000");
        assert_eq!(cells[7], "0.100000");
        assert_eq!(cells[8], "None");
        assert_eq!(cells[9], "1.600000");
    }
}
