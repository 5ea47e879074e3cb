use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    /// Status line next to the spinner
    pub status: AttrValue,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex items-center gap-3 py-6" role="status">
            <span class="loading loading-dots loading-md"></span>
            <p class="text-sm">{&props.status}</p>
        </div>
    }
}
