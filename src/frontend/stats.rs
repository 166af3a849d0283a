use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::*;
use web_sys::AbortController;

use super::api;
use crate::config::PollConfig;
use crate::stats::{PollSequence, StatsSnapshot};

/// Polls the stats endpoint. Each poll aborts the previous request, and a
/// response is only applied if no newer poll has started since.
#[derive(Clone)]
struct StatsPoller {
    url: Rc<str>,
    snapshot: RwSignal<Option<StatsSnapshot>>,
    sequence: Rc<RefCell<PollSequence>>,
    in_flight: Rc<RefCell<Option<AbortController>>>,
}

impl StatsPoller {
    fn new(url: &str, snapshot: RwSignal<Option<StatsSnapshot>>) -> Self {
        Self {
            url: Rc::from(url),
            snapshot,
            sequence: Rc::new(RefCell::new(PollSequence::new())),
            in_flight: Rc::new(RefCell::new(None)),
        }
    }

    fn poll(&self) {
        self.abort_in_flight();
        let ticket = self.sequence.borrow_mut().begin();

        let controller = match AbortController::new() {
            Ok(controller) => Some(controller),
            Err(err) => {
                log::warn!("AbortController unavailable: {:?}", err);
                None
            }
        };
        let signal = controller.as_ref().map(AbortController::signal);
        *self.in_flight.borrow_mut() = controller;

        let poller = self.clone();
        spawn_local(async move {
            let result = api::fetch_stats(&poller.url, signal.as_ref()).await;
            if !poller.sequence.borrow().is_current(ticket) {
                log::debug!("discarding superseded stats response");
                return;
            }
            poller.in_flight.borrow_mut().take();

            match result {
                Ok(snapshot) => {
                    poller.snapshot.try_set(Some(snapshot));
                }
                Err(err) => log::warn!("stats update error: {}", err),
            }
        });
    }

    fn abort_in_flight(&self) {
        if let Some(controller) = self.in_flight.borrow_mut().take() {
            controller.abort();
        }
    }

    fn cancel(&self) {
        self.sequence.borrow_mut().cancel_all();
        self.abort_in_flight();
    }
}

#[component]
pub fn StatsBar(config: PollConfig) -> impl IntoView {
    let snapshot = create_rw_signal(None::<StatsSnapshot>);
    let poller = StatsPoller::new(&config.stats_url, snapshot);

    poller.poll();
    let interval = {
        let poller = poller.clone();
        Interval::new(config.refresh_interval_ms, move || poller.poll())
    };

    on_cleanup(move || {
        drop(interval);
        poller.cancel();
    });

    view! {
        <div class="stats-bar">
            <span class="stat">
                <i class="fas fa-folder"></i>
                <span id="fileCount">
                    {move || snapshot.with(|s| s.as_ref().map(|s| s.total_files.to_string()).unwrap_or_else(|| "-".to_string()))}
                </span>
                " files"
            </span>
            <span class="stat">
                <i class="fas fa-hdd"></i>
                <span id="totalSize">
                    {move || snapshot.with(|s| s.as_ref().map(|s| s.total_size_formatted.clone()).unwrap_or_else(|| "-".to_string()))}
                </span>
            </span>
        </div>
    }
}
