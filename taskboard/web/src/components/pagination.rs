use dioxus::prelude::*;

/// Previous/next controls for a 1-based page number.
#[component]
pub fn Pagination(page: u32, total_pages: u32, on_change: EventHandler<u32>) -> Element {
    let has_previous = page > 1;
    let has_next = page < total_pages;

    rsx! {
        nav { class: "flex items-center justify-between pt-6",
            button {
                class: "px-4 py-2 rounded-lg border border-gray-300 text-gray-700 hover:bg-gray-50 disabled:opacity-50",
                disabled: !has_previous,
                onclick: move |_| on_change.call(page - 1),
                "Previous"
            }
            span { class: "text-sm text-gray-600", "Page {page} of {total_pages}" }
            button {
                class: "px-4 py-2 rounded-lg border border-gray-300 text-gray-700 hover:bg-gray-50 disabled:opacity-50",
                disabled: !has_next,
                onclick: move |_| on_change.call(page + 1),
                "Next"
            }
        }
    }
}
