use gloo_timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

use crate::settings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    fn alert_class(self) -> &'static str {
        match self {
            ToastKind::Info => "alert-info",
            ToastKind::Error => "alert-error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "fas fa-info-circle",
            ToastKind::Error => "fas fa-exclamation-circle",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: usize,
    pub message: String,
    pub kind: ToastKind,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(usize),
}

/// Toasts on screen, oldest first.
#[derive(Debug, Default, PartialEq)]
pub struct ToastStack {
    pub toasts: Vec<Toast>,
}

impl Reducible for ToastStack {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        match action {
            ToastAction::Push(toast) => toasts.push(toast),
            ToastAction::Dismiss(id) => toasts.retain(|t| t.id != id),
        }
        Rc::new(Self { toasts })
    }
}

/// Handle for raising toasts from any component below [`ToastProvider`].
#[derive(Clone, PartialEq)]
pub struct ToastContext {
    push: Callback<(String, ToastKind)>,
}

impl ToastContext {
    pub fn show_info(&self, message: String) {
        self.push.emit((message, ToastKind::Info));
    }

    pub fn show_error(&self, message: String) {
        self.push.emit((message, ToastKind::Error));
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let stack = use_reducer(ToastStack::default);
    let next_id = use_mut_ref(|| 0usize);

    let push = {
        let dispatcher = stack.dispatcher();
        Callback::from(move |(message, kind): (String, ToastKind)| {
            let id = {
                let mut next = next_id.borrow_mut();
                *next += 1;
                *next
            };
            log::debug!("Toast {}: {}", id, message);
            dispatcher.dispatch(ToastAction::Push(Toast { id, message, kind }));

            // Dismissed automatically after the configured duration
            let dispatcher = dispatcher.clone();
            let duration = settings::get_settings().toast_duration_ms;
            Timeout::new(duration, move || dispatcher.dispatch(ToastAction::Dismiss(id))).forget();
        })
    };

    html! {
        <ContextProvider<ToastContext> context={ToastContext { push }}>
            {props.children.clone()}
            <div class="toast toast-top toast-end z-50">
                {for stack.toasts.iter().map(|toast| {
                    let id = toast.id;
                    let on_close = {
                        let dispatcher = stack.dispatcher();
                        Callback::from(move |_| dispatcher.dispatch(ToastAction::Dismiss(id)))
                    };

                    html! {
                        <div key={id} class={classes!("alert", toast.kind.alert_class(), "shadow-lg")}>
                            <i class={toast.kind.icon()}></i>
                            <span>{&toast.message}</span>
                            <button class="btn btn-sm btn-ghost btn-circle" onclick={on_close}>
                                <i class="fas fa-times"></i>
                            </button>
                        </div>
                    }
                })}
            </div>
        </ContextProvider<ToastContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: usize, kind: ToastKind) -> Toast {
        Toast {
            id,
            message: format!("toast {}", id),
            kind,
        }
    }

    #[test]
    fn test_push_then_dismiss() {
        let stack = Rc::new(ToastStack::default())
            .reduce(ToastAction::Push(toast(1, ToastKind::Info)))
            .reduce(ToastAction::Push(toast(2, ToastKind::Error)));
        assert_eq!(stack.toasts.len(), 2);

        let stack = stack.reduce(ToastAction::Dismiss(1));
        assert_eq!(stack.toasts, vec![toast(2, ToastKind::Error)]);

        // Unknown ids leave the stack untouched
        let stack = stack.reduce(ToastAction::Dismiss(9));
        assert_eq!(stack.toasts.len(), 1);
    }
}
