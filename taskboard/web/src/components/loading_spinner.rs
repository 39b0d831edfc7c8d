use dioxus::prelude::*;

/// Placeholder shown while a page waits on the API.
#[component]
pub fn LoadingSpinner(message: String) -> Element {
    rsx! {
        div { class: "flex flex-col items-center gap-3 py-16", aria_live: "polite",
            div { class: "h-10 w-10 rounded-full border-4 border-indigo-200 border-t-indigo-600 animate-spin" }
            span { class: "text-sm text-gray-500", "{message}" }
        }
    }
}
