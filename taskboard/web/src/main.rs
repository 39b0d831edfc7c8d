use dioxus::prelude::*;
use futures::StreamExt;
use taskboard_core::Destination;

mod components;
mod state;
mod views;

use components::{ErrorMessage, Header};
use state::{use_services, use_session_view, Services, SessionView};
use views::{
    Dashboard, Home, Login, NotFound, Privacy, Register, TaskEdit, TaskNew, Tasks, Terms,
    Unauthorized,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/tasks")]
        Tasks {},
        #[route("/tasks/new")]
        TaskNew {},
        #[route("/tasks/:id/edit")]
        TaskEdit { id: u64 },
        #[route("/dashboard")]
        Dashboard {},
        #[route("/privacy")]
        Privacy {},
        #[route("/terms")]
        Terms {},
        #[route("/unauthorized")]
        Unauthorized {},
        #[route("/:..route")]
        NotFound { route: Vec<String> },
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Home => Route::Home {},
            Destination::Login => Route::Login {},
            Destination::TaskList => Route::Tasks {},
        }
    }
}

const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let services = use_hook(|| Services::connect().map_err(|err| err.to_string()));

    rsx! {
        document::Link { rel: "stylesheet", href: TAILWIND_CSS }

        match services {
            Ok(services) => rsx! { Connected { services } },
            Err(message) => rsx! {
                main { class: "max-w-xl mx-auto py-16 px-6",
                    ErrorMessage { message }
                }
            },
        }
    }
}

/// Makes the API handles and session signal available to every route.
#[component]
fn Connected(services: Services) -> Element {
    use_context_provider(|| services);
    use_context_provider(|| Signal::new(SessionView::default()));

    rsx! {
        Router::<Route> {}
    }
}

/// Layout around every page. Restores the session on load and follows the
/// navigation implied by session events.
#[component]
fn Shell() -> Element {
    let services = use_services();
    let mut view = use_session_view();
    let navigator = use_navigator();

    use_future(move || {
        let services = services.clone();
        async move {
            let mut events = services.session.subscribe();
            services.auth.restore().await;
            view.set(SessionView {
                session: services.session.snapshot(),
                restored: true,
            });

            while let Some(event) = events.next().await {
                tracing::debug!(?event, "session changed");
                view.write().session = services.session.snapshot();
                if let Some(destination) = event.destination() {
                    navigator.push(Route::from(destination));
                }
            }
        }
    });

    rsx! {
        Header {}
        main { class: "min-h-screen bg-gray-50 py-8",
            Outlet::<Route> {}
        }
        footer { class: "border-t border-gray-200 py-6 text-center text-sm text-gray-500 space-x-4",
            Link { to: Route::Privacy {}, class: "hover:text-gray-700", "Privacy" }
            Link { to: Route::Terms {}, class: "hover:text-gray-700", "Terms" }
        }
    }
}
