use dioxus::prelude::*;

use crate::state::{use_services, use_session_view};
use crate::Route;

#[component]
pub fn Header() -> Element {
    let services = use_services();
    let view = use_session_view();
    let mut logging_out = use_signal(|| false);

    let user = view.read().session.identity().cloned();
    let logout = move |_: MouseEvent| {
        let auth = services.auth.clone();
        logging_out.set(true);
        spawn(async move {
            auth.logout().await;
            logging_out.set(false);
        });
    };

    rsx! {
        header { class: "bg-white shadow-sm",
            nav { class: "max-w-6xl mx-auto px-6 py-4 flex items-center justify-between",
                Link { to: Route::Home {}, class: "text-2xl font-bold text-indigo-600", "Taskboard" }
                div { class: "flex items-center gap-6",
                    if let Some(user) = user {
                        Link { to: Route::Tasks {}, class: "text-gray-700 hover:text-indigo-600", "Tasks" }
                        Link { to: Route::Dashboard {}, class: "text-gray-700 hover:text-indigo-600", "Dashboard" }
                        span { class: "text-sm text-gray-500", "{user.display_name()}" }
                        button {
                            class: "bg-gray-100 text-gray-700 px-4 py-2 rounded-lg font-medium hover:bg-gray-200 disabled:opacity-50",
                            disabled: logging_out(),
                            onclick: logout,
                            "Log out"
                        }
                    } else {
                        Link { to: Route::Login {}, class: "text-gray-700 hover:text-indigo-600", "Log in" }
                        Link {
                            to: Route::Register {},
                            class: "bg-indigo-600 text-white px-4 py-2 rounded-lg font-medium hover:bg-indigo-700",
                            "Sign up"
                        }
                    }
                }
            }
        }
    }
}
