use dioxus::prelude::*;
use taskboard_core::{ApiError, TaskStatistics, TaskSummary};

use crate::components::{ErrorMessage, LoadingSpinner, RequireAuth};
use crate::state::use_services;

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        RequireAuth { DashboardPage {} }
    }
}

#[component]
fn DashboardPage() -> Element {
    let services = use_services();
    let figures = use_resource(move || {
        let tasks = services.tasks.clone();
        async move {
            let summary = tasks.summary().await?;
            let statistics = tasks.statistics().await?;
            Ok::<_, ApiError>((summary, statistics))
        }
    });

    rsx! {
        div { class: "max-w-6xl mx-auto px-6 space-y-8",
            h1 { class: "text-4xl font-bold text-gray-900", "Dashboard" }
            match &*figures.read_unchecked() {
                None => rsx! { LoadingSpinner { message: "Loading figures...".to_string() } },
                Some(Err(err)) => rsx! { ErrorMessage { message: err.user_message() } },
                Some(Ok((summary, statistics))) => rsx! {
                    SummaryTiles { summary: summary.clone() }
                    Breakdowns { statistics: statistics.clone() }
                },
            }
        }
    }
}

#[component]
fn SummaryTiles(summary: TaskSummary) -> Element {
    let tiles = [
        ("Total", summary.total, "text-gray-900"),
        ("Open", summary.open, "text-blue-600"),
        ("In progress", summary.in_progress, "text-yellow-600"),
        ("Done", summary.done, "text-green-600"),
        ("Overdue", summary.overdue, "text-red-600"),
    ];

    rsx! {
        div { class: "grid grid-cols-2 md:grid-cols-5 gap-4",
            for (label, value, color) in tiles {
                div { key: "{label}", class: "bg-white rounded-lg shadow-md p-6 text-center",
                    p { class: "text-3xl font-bold {color}", "{value}" }
                    p { class: "text-sm text-gray-600 mt-1", "{label}" }
                }
            }
        }
    }
}

#[component]
fn Breakdowns(statistics: TaskStatistics) -> Element {
    let rate = format!("{:.0}%", statistics.completion_rate);

    rsx! {
        div { class: "bg-white rounded-lg shadow-md p-6",
            h2 { class: "text-xl font-semibold text-gray-900 mb-2", "Completion" }
            div { class: "w-full bg-gray-200 rounded-full h-4",
                div {
                    class: "bg-green-500 h-4 rounded-full",
                    style: "width: {rate}",
                }
            }
            p { class: "text-sm text-gray-600 mt-2", "{rate} of {statistics.total} tasks done" }
        }
        div { class: "grid grid-cols-1 md:grid-cols-3 gap-6",
            Breakdown { title: "By status", counts: statistics.by_status.clone() }
            Breakdown { title: "By priority", counts: statistics.by_priority.clone() }
            Breakdown { title: "By category", counts: statistics.by_category.clone() }
        }
    }
}

#[component]
fn Breakdown(title: &'static str, counts: std::collections::BTreeMap<String, u64>) -> Element {
    rsx! {
        div { class: "bg-white rounded-lg shadow-md p-6",
            h3 { class: "text-lg font-semibold text-gray-900 mb-3", "{title}" }
            if counts.is_empty() {
                p { class: "text-sm text-gray-500", "No data yet" }
            } else {
                ul { class: "space-y-1",
                    for (name, count) in counts {
                        li { key: "{name}", class: "flex justify-between text-sm text-gray-700",
                            span { "{name}" }
                            span { class: "font-medium", "{count}" }
                        }
                    }
                }
            }
        }
    }
}
