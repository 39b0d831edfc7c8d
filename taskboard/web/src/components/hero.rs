use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Hero(signed_in: bool) -> Element {
    rsx! {
        section { class: "bg-gradient-to-br from-indigo-600 to-blue-600 text-white py-16 px-6",
            div { class: "max-w-4xl mx-auto text-center",
                h2 { class: "text-5xl font-bold mb-6", "Welcome to Taskboard" }
                p { class: "text-xl mb-8 leading-relaxed",
                    "Keep track of what needs doing, what is in progress and what is done. "
                    "Sort tasks by priority, group them by category and never miss a due date."
                }
                div { class: "flex flex-col sm:flex-row gap-4 justify-center",
                    if signed_in {
                        Link {
                            to: Route::Tasks {},
                            class: "bg-white text-indigo-600 px-8 py-3 rounded-lg font-semibold text-lg hover:bg-gray-100 transition-colors",
                            "Go to my tasks"
                        }
                        Link {
                            to: Route::Dashboard {},
                            class: "border-2 border-white text-white px-8 py-3 rounded-lg font-semibold text-lg hover:bg-white hover:text-indigo-600 transition-colors",
                            "Dashboard"
                        }
                    } else {
                        Link {
                            to: Route::Register {},
                            class: "bg-white text-indigo-600 px-8 py-3 rounded-lg font-semibold text-lg hover:bg-gray-100 transition-colors",
                            "Create an account"
                        }
                        Link {
                            to: Route::Login {},
                            class: "border-2 border-white text-white px-8 py-3 rounded-lg font-semibold text-lg hover:bg-white hover:text-indigo-600 transition-colors",
                            "Log in"
                        }
                    }
                }
            }
        }
    }
}
