use chrono::Local;
use common::DashboardResponse;
use yew::prelude::*;

use super::{ForecastChart, ForecastTable, RawChart};
use crate::api_client::dashboard::{get_dashboard, get_symbols, DashboardInputs};
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch_with_deps;
use crate::common::loading::Loading;
use crate::common::toast::ToastContext;
use crate::components::layout::{Layout, Sidebar};
use crate::hooks::FetchState;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let inputs = use_state(|| DashboardInputs::new(Local::now().date_naive()));
    let toast_ctx = use_context::<ToastContext>();

    // Nothing is requested until a symbol has been entered
    let deps = inputs.is_ready().then(|| (*inputs).clone());
    let dashboard_state = use_fetch_with_deps(deps, |inputs: DashboardInputs| async move {
        get_dashboard(&inputs).await.map(|response| response.data)
    });
    let symbols_state = use_fetch_with_deps(Some(()), |_: ()| get_symbols());

    use_effect_with(dashboard_state.data().cloned(), move |response| {
        if let Some(DashboardResponse { symbol, prices: Some(prices), .. }) = response {
            if prices.is_empty() {
                log::info!("No price rows for {}", symbol);
                if let Some(toast_ctx) = &toast_ctx {
                    toast_ctx.show_info(format!("No price data found for {}", symbol));
                }
            }
        }
        || ()
    });

    let on_change = {
        let inputs = inputs.clone();
        Callback::from(move |next: DashboardInputs| {
            log::trace!("Dashboard inputs changed: {:?}", next);
            inputs.set(next);
        })
    };

    let symbols = symbols_state
        .data()
        .cloned()
        .unwrap_or_default()
        .symbols
        .join(", ");
    let show_horizon = shows_horizon(&dashboard_state);

    let sidebar = html! {
        <Sidebar inputs={(*inputs).clone()} on_change={on_change} show_horizon={show_horizon} />
    };

    html! {
        <Layout title="Stockcast" sidebar={sidebar}>
            <div class="card bg-base-100 shadow mb-6">
                <div class="card-body">
                    <h2 class="card-title text-3xl">{"Stock Prediction"}</h2>
                    <p class="text-sm opacity-70">{format!("Commonly used symbols: {}", symbols)}</p>
                </div>
            </div>

            {match &*dashboard_state {
                FetchState::NotStarted => html! {},
                FetchState::Loading => html! {
                    <Loading status="Loading data..." />
                },
                FetchState::Error(error) => html! {
                    <ErrorDisplay message={error.clone()} symbol={Some(inputs.symbol.clone())} />
                },
                FetchState::Success(response) => render_sections(response),
            }}
        </Layout>
    }
}

/// The years slider is offered only while a non-empty price table is shown.
fn shows_horizon(state: &FetchState<DashboardResponse>) -> bool {
    state.data().is_some_and(DashboardResponse::shows_raw_chart)
}

fn render_sections(response: &DashboardResponse) -> Html {
    let raw = match &response.prices {
        Some(prices) if response.shows_raw_chart() => html! {
            <div class="card bg-base-100 shadow mb-6">
                <div class="card-body">
                    <h2 class="card-title">{"Raw data"}</h2>
                    <RawChart table={prices.clone()} />
                </div>
            </div>
        },
        _ => html! {},
    };

    let forecast = match &response.forecast {
        Some(forecast) => html! {
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <ForecastTable forecast={forecast.clone()} />
                    <ForecastChart forecast={forecast.clone()} />
                </div>
            </div>
        },
        None => html! {},
    };

    html! {
        <>
            <p class="text-sm mb-4">{"Done!"}</p>
            {raw}
            {forecast}
        </>
    }
}
