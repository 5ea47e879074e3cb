use yew::prelude::*;
use std::future::Future;
use crate::hooks::FetchState;
use crate::common::toast::ToastContext;

/// Runs `fetch_fn` whenever `deps` change and tracks the result.
///
/// While `deps` is `None` nothing is fetched and the state stays
/// [`FetchState::NotStarted`].
#[hook]
pub fn use_fetch_with_deps<D, T, F, Fut>(deps: Option<D>, fetch_fn: F) -> UseStateHandle<FetchState<T>>
where
    D: Clone + PartialEq + 'static,
    T: 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let fetch_state = use_state(|| FetchState::NotStarted);
    let toast_ctx = use_context::<ToastContext>();

    {
        let fetch_state = fetch_state.clone();
        use_effect_with(deps, move |deps| {
            match deps.clone() {
                None => fetch_state.set(FetchState::NotStarted),
                Some(deps) => {
                    fetch_state.set(FetchState::Loading);
                    wasm_bindgen_futures::spawn_local(async move {
                        match fetch_fn(deps).await {
                            Ok(data) => fetch_state.set(FetchState::Success(data)),
                            Err(err) => {
                                if let Some(toast_ctx) = &toast_ctx {
                                    toast_ctx.show_error(err.clone());
                                }
                                fetch_state.set(FetchState::Error(err));
                            }
                        }
                    });
                }
            }
            || ()
        });
    }

    fetch_state
}
