//! Browser side of cloudstash: a Leptos CSR app mounted by [`run`].

mod api;
mod files;
mod notifications;
mod stats;
mod styles;
mod theme;
mod upload;

use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::{Route, Router, Routes, A};
use wasm_bindgen::prelude::*;

use crate::config::ClientConfig;
use crate::notify::Notice;

pub use api::ClientError;
pub use notifications::{use_notifier, Notifier};

use files::FilesPage;
use notifications::NotificationHost;
use stats::StatsBar;
use styles::StyleProvider;
use theme::ThemeToggle;
use upload::UploadSection;

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();
    let notifier = Notifier::provide();
    install_error_handler(notifier);

    let ClientConfig {
        intake,
        poll,
        files_api_url,
    } = config;

    view! {
        <Title text="cloudstash" />
        <StyleProvider />
        <Router>
            <div class="app">
                <header class="app-header">
                    <div>
                        <h1>"cloudstash"</h1>
                        <nav>
                            <A href="/">"upload"</A>
                            <A href="/files">"files"</A>
                        </nav>
                    </div>
                    <StatsBar config=poll />
                    <ThemeToggle />
                </header>
                <main>
                    <Routes>
                        <Route
                            path="/"
                            view=move || view! { <UploadSection config=intake.clone() /> }
                        />
                        <Route
                            path="/files"
                            view=move || view! { <FilesPage files_api_url=files_api_url.clone() /> }
                        />
                    </Routes>
                </main>
            </div>
            <NotificationHost />
        </Router>
    }
}

/// Logs uncaught script errors and surfaces a generic notification instead
/// of leaving the page silently broken.
fn install_error_handler(notifier: Notifier) {
    let handler = Closure::<dyn FnMut(web_sys::ErrorEvent)>::new(move |event: web_sys::ErrorEvent| {
        log::error!(
            "global error: {} at {}:{}:{}",
            event.message(),
            event.filename(),
            event.lineno(),
            event.colno()
        );
        notifier.notify(Notice::error("An error occurred. Check console."));
    });

    if let Err(err) = window().add_event_listener_with_callback("error", handler.as_ref().unchecked_ref()) {
        log::warn!("could not install global error handler: {:?}", err);
    }
    // lives for the whole page session
    handler.forget();
}

#[wasm_bindgen]
pub fn run() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("cloudstash client starting");

    mount_to_body(|| view! { <App config=ClientConfig::new() /> });
}
