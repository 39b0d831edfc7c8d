use dioxus::prelude::*;

#[component]
pub fn Privacy() -> Element {
    rsx! {
        article { class: "max-w-3xl mx-auto px-6 space-y-4 text-gray-700",
            h1 { class: "text-3xl font-bold text-gray-900", "Privacy Policy" }
            p { "Taskboard stores the tasks you create and the email address and username you register with. Nothing else is collected." }
            p { "Your session is kept in cookies set by the Taskboard server. This browser also remembers your preferred page size and the last email you logged in with; clear site data to remove them." }
            p { "Your data is never shared with third parties." }
        }
    }
}

#[component]
pub fn Terms() -> Element {
    rsx! {
        article { class: "max-w-3xl mx-auto px-6 space-y-4 text-gray-700",
            h1 { class: "text-3xl font-bold text-gray-900", "Terms of Service" }
            p { "Taskboard is provided as is, without warranty of any kind." }
            p { "You are responsible for the content of your tasks and for keeping your password secret." }
            p { "Accounts that abuse the service may be suspended." }
        }
    }
}
