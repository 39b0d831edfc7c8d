use dioxus::prelude::*;

use crate::components::Hero;
use crate::state::use_session_view;

#[component]
pub fn Home() -> Element {
    let view = use_session_view();
    let signed_in = view.read().session.is_authenticated();

    rsx! {
        Hero { signed_in }
        section { class: "max-w-4xl mx-auto px-6 py-12 grid grid-cols-1 md:grid-cols-3 gap-6",
            Feature { icon: "📝", title: "Capture", text: "Add tasks with a title, description, category and due date." }
            Feature { icon: "🚦", title: "Prioritise", text: "Mark what matters with low, medium and high priority." }
            Feature { icon: "📊", title: "Review", text: "See what is open, overdue and done on your dashboard." }
        }
    }
}

#[component]
fn Feature(icon: &'static str, title: &'static str, text: &'static str) -> Element {
    rsx! {
        div { class: "bg-white rounded-lg shadow-md p-6 text-center",
            div { class: "text-4xl mb-3", "{icon}" }
            h3 { class: "text-lg font-semibold text-gray-900 mb-2", "{title}" }
            p { class: "text-gray-600", "{text}" }
        }
    }
}
