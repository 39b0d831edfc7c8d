use dioxus::prelude::*;

use crate::Route;

/// Shown for protected pages when nobody is signed in.
#[component]
pub fn Unauthorized() -> Element {
    rsx! {
        div { class: "max-w-xl mx-auto text-center py-16 px-6",
            div { class: "text-6xl mb-4", "🔒" }
            h1 { class: "text-3xl font-bold text-gray-900 mb-2", "Please log in" }
            p { class: "text-gray-600 mb-6", "You need to be signed in to see this page." }
            Link {
                to: Route::Login {},
                class: "bg-indigo-600 text-white px-6 py-3 rounded-lg font-semibold hover:bg-indigo-700 transition-colors",
                "Log in"
            }
        }
    }
}
