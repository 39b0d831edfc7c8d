use dioxus::prelude::*;

/// Notification for a failed API call, showing the text from
/// `ApiError::user_message`.
#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        div {
            role: "alert",
            class: "bg-red-50 border-l-4 border-red-500 rounded-md px-5 py-4",
            p { class: "font-semibold text-red-800", "Something went wrong" }
            p { class: "text-sm text-red-700 mt-1", "{message}" }
        }
    }
}
