use chrono::Local;
use dioxus::prelude::*;
use taskboard_core::{Task, TaskPriority, TaskStatus};

use crate::Route;

/// One row of the task list with edit and delete actions.
#[component]
pub fn TaskCard(task: Task, busy: bool, on_delete: EventHandler<u64>) -> Element {
    let status_color = match task.status {
        TaskStatus::Open => "bg-blue-100 text-blue-800",
        TaskStatus::InProgress => "bg-yellow-100 text-yellow-800",
        TaskStatus::Done => "bg-green-100 text-green-800",
        TaskStatus::Cancelled => "bg-gray-100 text-gray-800",
    };
    let priority_color = match task.priority {
        TaskPriority::Low => "text-gray-500",
        TaskPriority::Medium => "text-indigo-600",
        TaskPriority::High => "text-red-600 font-semibold",
    };
    let overdue = task.is_overdue(Local::now().date_naive());
    let id = task.id;

    rsx! {
        div { class: "bg-white rounded-lg shadow-md p-6 hover:shadow-lg transition-shadow",
            div { class: "flex justify-between items-start mb-3",
                h3 { class: "text-xl font-semibold text-gray-900", "{task.title}" }
                span { class: "px-2 py-1 rounded-full text-xs font-medium {status_color}",
                    "{task.status}"
                }
            }
            if !task.description.is_empty() {
                p { class: "text-gray-600 mb-3", "{task.description}" }
            }
            div { class: "flex flex-wrap gap-4 text-sm text-gray-600",
                span { class: "{priority_color}", "{task.priority} priority" }
                if !task.category.is_empty() {
                    span { "#{task.category}" }
                }
                if let Some(due) = task.due_date {
                    span { class: if overdue { "text-red-600 font-semibold" } else { "" },
                        if overdue { "Overdue: {due}" } else { "Due {due}" }
                    }
                }
            }
            div { class: "flex gap-3 pt-4",
                Link {
                    to: Route::TaskEdit { id },
                    class: "flex-1 text-center bg-indigo-600 text-white py-2 px-4 rounded-lg font-medium hover:bg-indigo-700 transition-colors",
                    "Edit"
                }
                button {
                    class: "flex-1 bg-white border border-red-300 text-red-600 py-2 px-4 rounded-lg font-medium hover:bg-red-50 transition-colors disabled:opacity-50",
                    disabled: busy,
                    onclick: move |_| on_delete.call(id),
                    if busy { "Deleting..." } else { "Delete" }
                }
            }
        }
    }
}
