use dioxus::prelude::*;

use crate::components::LoadingSpinner;
use crate::state::use_session_view;
use crate::views::Unauthorized;

/// Renders `children` only for a signed-in user, the 401 page otherwise.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let view = use_session_view();

    if !view.read().restored {
        return rsx! { LoadingSpinner { message: "Checking your session...".to_string() } };
    }
    if !view.read().session.is_authenticated() {
        return rsx! { Unauthorized {} };
    }
    rsx! { {children} }
}
