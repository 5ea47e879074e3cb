use chrono::NaiveDate;
use common::{ForecastHorizon, MAX_YEARS, MIN_YEARS};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client::dashboard::DashboardInputs;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub inputs: DashboardInputs,
    pub on_change: Callback<DashboardInputs>,
    /// The years slider only appears once a price table has been loaded
    #[prop_or_default]
    pub show_horizon: bool,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[function_component(Sidebar)]
pub fn sidebar(props: &Props) -> Html {
    let on_symbol_change = {
        let inputs = props.inputs.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = inputs.clone();
            next.symbol = input.value();
            log::debug!("Symbol changed to '{}'", next.symbol);
            on_change.emit(next);
        })
    };

    let on_start_change = {
        let inputs = props.inputs.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match parse_date(&input.value()) {
                Some(date) => {
                    let mut next = inputs.clone();
                    next.start_date = date;
                    on_change.emit(next);
                }
                None => log::warn!("Ignoring unparsable start date '{}'", input.value()),
            }
        })
    };

    let on_end_change = {
        let inputs = props.inputs.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match parse_date(&input.value()) {
                Some(date) => {
                    let mut next = inputs.clone();
                    next.end_date = date;
                    on_change.emit(next);
                }
                None => log::warn!("Ignoring unparsable end date '{}'", input.value()),
            }
        })
    };

    let on_years_change = {
        let inputs = props.inputs.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let horizon = input
                .value()
                .parse::<u32>()
                .ok()
                .and_then(|years| ForecastHorizon::new(years).ok());
            if let Some(horizon) = horizon {
                let mut next = inputs.clone();
                next.horizon = horizon;
                on_change.emit(next);
            }
        })
    };

    let inputs = &props.inputs;

    html! {
        <div class="drawer-side z-50">
            <label aria-label="close sidebar" class="drawer-overlay" for="inputs-drawer"></label>
            <div class="p-4 w-80 min-h-full bg-base-100 text-base-content border-r border-base-300 space-y-4">
                <div class="flex items-center gap-3 px-2 mb-4">
                    <div class="w-10 h-10 rounded-lg bg-primary flex items-center justify-center text-primary-content font-bold text-2xl">
                        <i class="fas fa-chart-line"></i>
                    </div>
                    <span class="text-2xl font-bold tracking-tight">{"Stockcast"}</span>
                </div>

                <div class="form-control">
                    <label class="label" for="symbol-input">
                        <span class="label-text">{"Enter stock symbol:"}</span>
                    </label>
                    <input
                        id="symbol-input"
                        type="text"
                        class="input input-bordered w-full"
                        value={inputs.symbol.clone()}
                        onchange={on_symbol_change}
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="start-date-input">
                        <span class="label-text">{"Select start date:"}</span>
                    </label>
                    <input
                        id="start-date-input"
                        type="date"
                        class="input input-bordered w-full"
                        value={inputs.start_date.format("%Y-%m-%d").to_string()}
                        onchange={on_start_change}
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="end-date-input">
                        <span class="label-text">{"Select end date:"}</span>
                    </label>
                    <input
                        id="end-date-input"
                        type="date"
                        class="input input-bordered w-full"
                        value={inputs.end_date.format("%Y-%m-%d").to_string()}
                        onchange={on_end_change}
                    />
                </div>

                {if props.show_horizon {
                    html! {
                        <div class="form-control">
                            <label class="label" for="years-input">
                                <span class="label-text">{"Select number of years to predict:"}</span>
                                <span class="label-text-alt font-semibold">{inputs.horizon.years()}</span>
                            </label>
                            <input
                                id="years-input"
                                type="range"
                                class="range range-primary"
                                min={MIN_YEARS.to_string()}
                                max={MAX_YEARS.to_string()}
                                step="1"
                                value={inputs.horizon.years().to_string()}
                                onchange={on_years_change}
                            />
                            <div class="w-full flex justify-between text-xs px-2">
                                { for (MIN_YEARS..=MAX_YEARS).map(|y| html! { <span>{y}</span> }) }
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_input_value() {
        assert_eq!(parse_date("2020-01-31"), NaiveDate::from_ymd_opt(2020, 1, 31));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("31/01/2020"), None);
    }
}
