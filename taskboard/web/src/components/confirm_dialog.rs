use dioxus::prelude::*;

/// Modal asking the user to confirm a destructive action.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    confirm_label: String,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "fixed inset-0 bg-black/40 flex items-center justify-center z-50",
            div { class: "bg-white rounded-lg shadow-xl p-6 w-full max-w-md",
                h2 { class: "text-xl font-semibold text-gray-900 mb-2", "{title}" }
                p { class: "text-gray-600 mb-6", "{message}" }
                div { class: "flex justify-end gap-3",
                    button {
                        class: "px-4 py-2 rounded-lg border border-gray-300 text-gray-700 hover:bg-gray-50",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 rounded-lg bg-red-600 text-white font-medium hover:bg-red-700 disabled:opacity-50",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}
