use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Symbol of the failed rerun, if one was entered
    #[prop_or_default]
    pub symbol: Option<String>,
}

fn heading(symbol: Option<&str>) -> String {
    match symbol.map(str::trim).filter(|s| !s.is_empty()) {
        Some(symbol) => format!("Could not load {}", symbol.to_uppercase()),
        None => "Could not load data".to_string(),
    }
}

/// Failure of a rerun, shown in place of the charts.
#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    log::warn!("Displaying error to user: {}", props.message);

    html! {
        <div class="alert alert-error max-w-2xl">
            <i class="fas fa-exclamation-circle text-2xl"></i>
            <div class="flex flex-col gap-1">
                <span class="font-semibold">{heading(props.symbol.as_deref())}</span>
                <span class="text-sm">{&props.message}</span>
            </div>
        </div>
    }
}
