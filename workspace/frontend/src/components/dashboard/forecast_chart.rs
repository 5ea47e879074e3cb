use common::ForecastResponse;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::charts::{forecast_plot, render_plot};

const FORECAST_CHART_ID: &str = "forecast-chart";

#[derive(Properties, PartialEq)]
pub struct Props {
    pub forecast: ForecastResponse,
}

/// Caption and figure of the fitted forecast.
#[function_component(ForecastChart)]
pub fn forecast_chart(props: &Props) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.forecast.clone()),
        move |(container_ref, forecast)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(FORECAST_CHART_ID);
                if let Err(e) = render_plot(FORECAST_CHART_ID, &forecast_plot(forecast)) {
                    log::error!("Failed to draw forecast chart: {}", e);
                }
            }
            || ()
        },
    );

    html! {
        <>
            <p class="text-sm opacity-70 mb-2">{props.forecast.caption()}</p>
            <div ref={container_ref} class="overflow-x-auto"></div>
        </>
    }
}
