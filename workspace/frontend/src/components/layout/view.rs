use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub children: Children,
    pub title: String,
    pub sidebar: Html,
}

#[function_component(Layout)]
pub fn layout(props: &Props) -> Html {
    html! {
        <div class="drawer lg:drawer-open">
            <input id="inputs-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col min-h-screen bg-base-200 transition-all duration-300">
                <div class="navbar bg-base-100 shadow-sm z-40 sticky top-0">
                    <div class="flex-none lg:hidden">
                        <label aria-label="open sidebar" class="btn btn-square btn-ghost" for="inputs-drawer">
                            <i class="fas fa-bars text-xl"></i>
                        </label>
                    </div>
                    <div class="flex-1 px-4">
                        <h1 class="text-xl font-bold" id="page-title">{ &props.title }</h1>
                    </div>
                </div>
                <main class="flex-1 p-6 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
            { props.sidebar.clone() }
        </div>
    }
}
