use common::PriceTable;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::charts::{raw_data_plot, render_plot};

const RAW_CHART_ID: &str = "raw-data-chart";

#[derive(Properties, PartialEq)]
pub struct Props {
    pub table: PriceTable,
}

#[function_component(RawChart)]
pub fn raw_chart(props: &Props) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.table.clone()),
        move |(container_ref, table)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(RAW_CHART_ID);
                log::debug!("Drawing raw data chart for {} rows", table.len());
                if let Err(e) = render_plot(RAW_CHART_ID, &raw_data_plot(table)) {
                    log::error!("Failed to draw raw data chart: {}", e);
                }
            }
            || ()
        },
    );

    html! {
        <div ref={container_ref} style="width:100%; min-height:450px;"></div>
    }
}
