use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");

    rsx! {
        div { class: "max-w-xl mx-auto text-center py-16 px-6",
            div { class: "text-6xl mb-4", "🔍" }
            h1 { class: "text-3xl font-bold text-gray-900 mb-2", "Page not found" }
            p { class: "text-gray-600 mb-6", "There is nothing at /{path}." }
            Link {
                to: Route::Home {},
                class: "bg-indigo-600 text-white px-6 py-3 rounded-lg font-semibold hover:bg-indigo-700 transition-colors",
                "Back to home"
            }
        }
    }
}
