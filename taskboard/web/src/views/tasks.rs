use dioxus::prelude::*;
use taskboard_core::{TaskList, TaskListAction};

use crate::components::{
    ConfirmDialog, ErrorMessage, LoadingSpinner, Pagination, RequireAuth, TaskCard,
};
use crate::state::{dispatch, use_preferences, use_services};
use crate::Route;

const PAGE_SIZES: [u32; 3] = [10, 20, 50];

#[component]
pub fn Tasks() -> Element {
    rsx! {
        RequireAuth { TaskListPage {} }
    }
}

#[component]
fn TaskListPage() -> Element {
    let services = use_services();
    let mut preferences = use_preferences();
    let list = use_signal(TaskList::default);
    let mut page = use_signal(|| 1u32);
    let mut loading = use_signal(|| true);

    let repository = services.tasks.clone();
    use_effect(move || {
        let page = page();
        let page_size = preferences.get().page_size;
        let repository = repository.clone();
        loading.set(true);
        spawn(async move {
            match repository.list(page, page_size).await {
                Ok(data) => dispatch(
                    list,
                    TaskListAction::Loaded {
                        page,
                        page_size,
                        data,
                    },
                    TaskList::reduce,
                ),
                Err(err) => dispatch(
                    list,
                    TaskListAction::LoadFailed(err.user_message()),
                    TaskList::reduce,
                ),
            }
            loading.set(false);
        });
    });

    let confirm_delete = move |_: ()| {
        dispatch(list, TaskListAction::ConfirmDelete, TaskList::reduce);
        let Some(id) = list.read().deleting else {
            return;
        };
        let repository = services.tasks.clone();
        spawn(async move {
            match repository.delete(id).await {
                Ok(()) => {
                    dispatch(list, TaskListAction::Deleted(id), TaskList::reduce);
                    let shown = list.read().page;
                    if shown != page() {
                        page.set(shown);
                    }
                }
                Err(err) => dispatch(
                    list,
                    TaskListAction::DeleteFailed(err.user_message()),
                    TaskList::reduce,
                ),
            }
        });
    };

    let current = list.read().clone();
    let pending = current.confirming_task().cloned();

    rsx! {
        div { class: "max-w-6xl mx-auto px-6",
            div { class: "flex justify-between items-center mb-8",
                div {
                    h1 { class: "text-4xl font-bold text-gray-900", "My Tasks" }
                    p { class: "text-gray-600", "{current.count} in total" }
                }
                div { class: "flex items-center gap-4",
                    select {
                        class: "border border-gray-300 rounded-lg px-3 py-2 text-sm",
                        value: "{preferences.get().page_size}",
                        onchange: move |evt| {
                            if let Ok(size) = evt.value().parse::<u32>() {
                                preferences.update(|prefs| prefs.page_size = size);
                                page.set(1);
                            }
                        },
                        for size in PAGE_SIZES {
                            option { value: "{size}", "{size} per page" }
                        }
                    }
                    Link {
                        to: Route::TaskNew {},
                        class: "bg-indigo-600 text-white px-4 py-2 rounded-lg font-medium hover:bg-indigo-700 transition-colors",
                        "New Task"
                    }
                }
            }

            if let Some(message) = current.error.clone() {
                div { class: "mb-6", ErrorMessage { message } }
            }

            if loading() && current.tasks.is_empty() {
                LoadingSpinner { message: "Loading tasks...".to_string() }
            } else if current.tasks.is_empty() {
                div { class: "text-center py-12",
                    div { class: "text-6xl mb-4", "✅" }
                    h2 { class: "text-2xl font-semibold text-gray-900 mb-2", "Nothing to do" }
                    p { class: "text-gray-600", "Create a task to get started." }
                }
            } else {
                div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6",
                    for task in current.tasks.iter().cloned() {
                        TaskCard {
                            key: "{task.id}",
                            busy: current.deleting == Some(task.id),
                            task: task.clone(),
                            on_delete: move |id: u64| dispatch(list, TaskListAction::RequestDelete(id), TaskList::reduce),
                        }
                    }
                }
                Pagination {
                    page: current.page,
                    total_pages: current.total_pages(),
                    on_change: move |next: u32| page.set(next),
                }
            }

            if let Some(task) = pending {
                ConfirmDialog {
                    title: "Delete task?",
                    message: "\"{task.title}\" will be permanently deleted.",
                    confirm_label: "Delete",
                    busy: current.deleting.is_some(),
                    on_confirm: confirm_delete,
                    on_cancel: move |_: ()| dispatch(list, TaskListAction::CancelDelete, TaskList::reduce),
                }
            }
        }
    }
}
