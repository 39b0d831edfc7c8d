use dioxus::prelude::*;
use taskboard_core::{FormPhase, RegisterAction, RegisterForm};

use crate::components::{FieldError, GeneralErrors};
use crate::state::{dispatch, use_services};
use crate::Route;

#[component]
pub fn Register() -> Element {
    let services = use_services();
    let form = use_signal(RegisterForm::default);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        dispatch(form, RegisterAction::Submit, RegisterForm::reduce);
        if form.read().phase != FormPhase::Submitting {
            return;
        }
        let auth = services.auth.clone();
        let registration = form.read().registration.clone();
        spawn(async move {
            match auth.register(&registration).await {
                Ok(()) => dispatch(form, RegisterAction::Succeeded, RegisterForm::reduce),
                Err(err) => {
                    dispatch(form, RegisterAction::Failed(err.form_errors()), RegisterForm::reduce)
                }
            }
        });
    };

    let current = form.read().clone();
    let submitting = current.phase == FormPhase::Submitting;
    let errors = current.errors.clone();

    if current.phase == FormPhase::Succeeded {
        return rsx! {
            div { class: "max-w-md mx-auto px-6",
                div { class: "bg-white rounded-lg shadow-md p-8 text-center",
                    div { class: "text-5xl mb-4", "🎉" }
                    h1 { class: "text-2xl font-bold text-gray-900 mb-2", "Account created" }
                    p { class: "text-gray-600 mb-6", "You can now log in with {current.registration.email}." }
                    Link {
                        to: Route::Login {},
                        class: "bg-indigo-600 text-white px-6 py-3 rounded-lg font-semibold hover:bg-indigo-700",
                        "Log in"
                    }
                }
            }
        };
    }

    rsx! {
        div { class: "max-w-md mx-auto px-6",
            div { class: "bg-white rounded-lg shadow-md p-8",
                h1 { class: "text-3xl font-bold text-gray-900 mb-6 text-center", "Create an account" }
                GeneralErrors { errors: errors.clone() }
                form { class: "space-y-4", onsubmit,
                    TextField {
                        id: "email",
                        label: "Email",
                        kind: "email",
                        value: current.registration.email.clone(),
                        error: errors.field("email").map(str::to_owned),
                        oninput: move |value: String| dispatch(form, RegisterAction::SetEmail(value), RegisterForm::reduce),
                    }
                    TextField {
                        id: "username",
                        label: "Username",
                        kind: "text",
                        value: current.registration.username.clone(),
                        error: errors.field("username").map(str::to_owned),
                        oninput: move |value: String| dispatch(form, RegisterAction::SetUsername(value), RegisterForm::reduce),
                    }
                    TextField {
                        id: "password",
                        label: "Password",
                        kind: "password",
                        value: current.registration.password.clone(),
                        error: errors.field("password").map(str::to_owned),
                        oninput: move |value: String| dispatch(form, RegisterAction::SetPassword(value), RegisterForm::reduce),
                    }
                    div {
                        TextField {
                            id: "password2",
                            label: "Confirm password",
                            kind: "password",
                            value: current.registration.password2.clone(),
                            error: None,
                            oninput: move |value: String| {
                                dispatch(form, RegisterAction::SetPasswordConfirmation(value), RegisterForm::reduce)
                            },
                        }
                        FieldError { errors: errors.clone(), field: "password2" }
                    }
                    button {
                        r#type: "submit",
                        class: "w-full bg-indigo-600 text-white py-2 rounded-lg font-semibold hover:bg-indigo-700 disabled:opacity-50",
                        disabled: submitting,
                        if submitting { "Creating account..." } else { "Sign up" }
                    }
                }
                p { class: "mt-6 text-center text-sm text-gray-600",
                    "Already registered? "
                    Link { to: Route::Login {}, class: "text-indigo-600 hover:underline", "Log in" }
                }
            }
        }
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    value: String,
    error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: id, "{label}" }
            input {
                id,
                r#type: kind,
                class: "w-full border border-gray-300 rounded-lg px-3 py-2",
                value,
                oninput: move |evt| oninput.call(evt.value()),
            }
            if let Some(message) = error {
                p { class: "mt-1 text-sm text-red-600", "{message}" }
            }
        }
    }
}
