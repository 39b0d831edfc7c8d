use dioxus::prelude::*;
use taskboard_core::{FormPhase, TaskForm, TaskFormAction, TaskPriority, TaskStatus};

use crate::components::{ErrorMessage, FieldError, GeneralErrors, LoadingSpinner, RequireAuth};
use crate::state::{dispatch, use_services};
use crate::Route;

#[component]
pub fn TaskNew() -> Element {
    rsx! {
        RequireAuth { TaskEditor { id: None } }
    }
}

#[component]
pub fn TaskEdit(id: u64) -> Element {
    rsx! {
        RequireAuth { TaskEditor { id: Some(id) } }
    }
}

/// Create form when `id` is `None`, edit form for task `id` otherwise.
#[component]
fn TaskEditor(id: Option<u64>) -> Element {
    let services = use_services();
    let navigator = use_navigator();
    let form = use_signal(TaskForm::default);
    let mut loading = use_signal(|| id.is_some());
    let mut load_error = use_signal(|| None::<String>);

    let repository = services.tasks.clone();
    use_effect(move || {
        let Some(id) = id else {
            return;
        };
        let repository = repository.clone();
        spawn(async move {
            match repository.get(id).await {
                Ok(task) => dispatch(form, TaskFormAction::Load(task), TaskForm::reduce),
                Err(err) => load_error.set(Some(err.user_message())),
            }
            loading.set(false);
        });
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        dispatch(form, TaskFormAction::Submit, TaskForm::reduce);
        if form.read().phase != FormPhase::Submitting {
            return;
        }
        let draft = match form.read().draft() {
            Ok(draft) => draft,
            Err(_) => return,
        };
        let editing = form.read().editing;
        let repository = services.tasks.clone();
        spawn(async move {
            let saved = match editing {
                Some(id) => repository.update(id, &draft).await,
                None => repository.create(&draft).await,
            };
            match saved {
                Ok(task) => {
                    tracing::info!(task_id = task.id, "task saved");
                    dispatch(form, TaskFormAction::Succeeded(task), TaskForm::reduce);
                    navigator.push(Route::Tasks {});
                }
                Err(err) => dispatch(form, TaskFormAction::Failed(err.form_errors()), TaskForm::reduce),
            }
        });
    };

    if loading() {
        return rsx! { LoadingSpinner { message: "Loading task...".to_string() } };
    }
    if let Some(message) = load_error() {
        return rsx! {
            div { class: "max-w-2xl mx-auto px-6", ErrorMessage { message } }
        };
    }

    let current = form.read().clone();
    let errors = current.errors.clone();
    let submitting = current.phase == FormPhase::Submitting;
    let heading = if id.is_some() { "Edit task" } else { "New task" };
    let input_class = "w-full border border-gray-300 rounded-lg px-3 py-2";
    let label_class = "block text-sm font-medium text-gray-700 mb-1";

    rsx! {
        div { class: "max-w-2xl mx-auto px-6",
            div { class: "bg-white rounded-lg shadow-md p-8",
                h1 { class: "text-3xl font-bold text-gray-900 mb-6", "{heading}" }
                GeneralErrors { errors: errors.clone() }
                form { class: "space-y-5", onsubmit,
                    div {
                        label { class: label_class, r#for: "title", "Title" }
                        input {
                            id: "title",
                            class: input_class,
                            value: "{current.title}",
                            oninput: move |evt| dispatch(form, TaskFormAction::SetTitle(evt.value()), TaskForm::reduce),
                        }
                        FieldError { errors: errors.clone(), field: "title" }
                    }
                    div {
                        label { class: label_class, r#for: "description", "Description" }
                        textarea {
                            id: "description",
                            class: input_class,
                            rows: "4",
                            value: "{current.description}",
                            oninput: move |evt| dispatch(form, TaskFormAction::SetDescription(evt.value()), TaskForm::reduce),
                        }
                        FieldError { errors: errors.clone(), field: "description" }
                    }
                    div { class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                        div {
                            label { class: label_class, r#for: "status", "Status" }
                            select {
                                id: "status",
                                class: input_class,
                                value: "{current.status.as_str()}",
                                onchange: move |evt| {
                                    if let Ok(status) = evt.value().parse::<TaskStatus>() {
                                        dispatch(form, TaskFormAction::SetStatus(status), TaskForm::reduce);
                                    }
                                },
                                for status in TaskStatus::ALL {
                                    option {
                                        value: "{status.as_str()}",
                                        selected: status == current.status,
                                        "{status.label()}"
                                    }
                                }
                            }
                            FieldError { errors: errors.clone(), field: "status" }
                        }
                        div {
                            label { class: label_class, r#for: "priority", "Priority" }
                            select {
                                id: "priority",
                                class: input_class,
                                value: "{current.priority.as_str()}",
                                onchange: move |evt| {
                                    if let Ok(priority) = evt.value().parse::<TaskPriority>() {
                                        dispatch(form, TaskFormAction::SetPriority(priority), TaskForm::reduce);
                                    }
                                },
                                for priority in TaskPriority::ALL {
                                    option {
                                        value: "{priority.as_str()}",
                                        selected: priority == current.priority,
                                        "{priority.label()}"
                                    }
                                }
                            }
                            FieldError { errors: errors.clone(), field: "priority" }
                        }
                        div {
                            label { class: label_class, r#for: "category", "Category" }
                            input {
                                id: "category",
                                class: input_class,
                                value: "{current.category}",
                                oninput: move |evt| dispatch(form, TaskFormAction::SetCategory(evt.value()), TaskForm::reduce),
                            }
                            FieldError { errors: errors.clone(), field: "category" }
                        }
                        div {
                            label { class: label_class, r#for: "due_date", "Due date" }
                            input {
                                id: "due_date",
                                r#type: "date",
                                class: input_class,
                                value: "{current.due_date}",
                                oninput: move |evt| dispatch(form, TaskFormAction::SetDueDate(evt.value()), TaskForm::reduce),
                            }
                            FieldError { errors: errors.clone(), field: "due_date" }
                        }
                    }
                    div { class: "flex gap-3 pt-2",
                        button {
                            r#type: "submit",
                            class: "flex-1 bg-indigo-600 text-white py-2 rounded-lg font-semibold hover:bg-indigo-700 disabled:opacity-50",
                            disabled: submitting,
                            if submitting { "Saving..." } else { "Save" }
                        }
                        button {
                            r#type: "button",
                            class: "px-4 py-2 rounded-lg border border-gray-300 text-gray-700 hover:bg-gray-50",
                            disabled: submitting,
                            onclick: move |_: MouseEvent| dispatch(form, TaskFormAction::Reset, TaskForm::reduce),
                            "Reset"
                        }
                        Link {
                            to: Route::Tasks {},
                            class: "px-4 py-2 rounded-lg text-gray-600 hover:text-gray-900",
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}
