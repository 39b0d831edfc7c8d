use dioxus::prelude::*;
use taskboard_core::FieldErrors;

/// First message recorded for `field`, shown under its input.
#[component]
pub fn FieldError(errors: FieldErrors, field: String) -> Element {
    rsx! {
        if let Some(message) = errors.field(&field) {
            p { class: "mt-1 text-sm text-red-600", "{message}" }
        }
    }
}

/// Messages not tied to a single input, shown above the form.
#[component]
pub fn GeneralErrors(errors: FieldErrors) -> Element {
    rsx! {
        if !errors.general.is_empty() {
            div { class: "bg-red-50 border border-red-200 rounded-lg p-4 mb-4",
                for message in errors.general.iter() {
                    p { class: "text-sm text-red-600", "{message}" }
                }
            }
        }
    }
}
