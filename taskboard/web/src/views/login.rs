use dioxus::prelude::*;
use taskboard_core::{FormPhase, LoginAction, LoginForm};

use crate::components::{FieldError, GeneralErrors};
use crate::state::{dispatch, use_preferences, use_services};
use crate::Route;

/// Login page. Navigation to the task list happens through the `SignedIn`
/// session event.
#[component]
pub fn Login() -> Element {
    let services = use_services();
    let mut preferences = use_preferences();
    let form = use_signal(|| LoginForm::with_email(preferences.get().last_email));

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        dispatch(form, LoginAction::Submit, LoginForm::reduce);
        if form.read().phase != FormPhase::Submitting {
            return;
        }
        let auth = services.auth.clone();
        let (email, password) = {
            let current = form.read();
            (current.email.clone(), current.password.clone())
        };
        spawn(async move {
            match auth.login(&email, &password).await {
                Ok(user) => {
                    preferences.update(|prefs| prefs.last_email = user.email.clone());
                    dispatch(form, LoginAction::Succeeded, LoginForm::reduce);
                }
                Err(err) => {
                    tracing::info!(error = %err, "login rejected");
                    dispatch(form, LoginAction::Failed(err.form_errors()), LoginForm::reduce);
                }
            }
        });
    };

    let submitting = form.read().phase == FormPhase::Submitting;
    let errors = form.read().errors.clone();

    rsx! {
        div { class: "max-w-md mx-auto px-6",
            div { class: "bg-white rounded-lg shadow-md p-8",
                h1 { class: "text-3xl font-bold text-gray-900 mb-6 text-center", "Log in" }
                GeneralErrors { errors: errors.clone() }
                form { class: "space-y-4", onsubmit,
                    div {
                        label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: "email", "Email" }
                        input {
                            id: "email",
                            r#type: "email",
                            class: "w-full border border-gray-300 rounded-lg px-3 py-2",
                            value: "{form.read().email}",
                            oninput: move |evt| dispatch(form, LoginAction::SetEmail(evt.value()), LoginForm::reduce),
                        }
                        FieldError { errors: errors.clone(), field: "email" }
                    }
                    div {
                        label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: "password", "Password" }
                        input {
                            id: "password",
                            r#type: "password",
                            class: "w-full border border-gray-300 rounded-lg px-3 py-2",
                            value: "{form.read().password}",
                            oninput: move |evt| dispatch(form, LoginAction::SetPassword(evt.value()), LoginForm::reduce),
                        }
                        FieldError { errors: errors.clone(), field: "password" }
                    }
                    button {
                        r#type: "submit",
                        class: "w-full bg-indigo-600 text-white py-2 rounded-lg font-semibold hover:bg-indigo-700 disabled:opacity-50",
                        disabled: submitting,
                        if submitting { "Logging in..." } else { "Log in" }
                    }
                }
                p { class: "mt-6 text-center text-sm text-gray-600",
                    "No account yet? "
                    Link { to: Route::Register {}, class: "text-indigo-600 hover:underline", "Sign up" }
                }
            }
        }
    }
}
