use gloo_timers::callback::Timeout;
use leptos::*;

use crate::notify::{Notice, NotificationCenter, Phase};

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Handle for raising flash messages from any component.
#[derive(Clone, Copy)]
pub struct Notifier {
    center: RwSignal<NotificationCenter>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            center: create_rw_signal(NotificationCenter::default()),
        }
    }

    pub fn provide() -> Self {
        let notifier = Self::new();
        provide_context(notifier);
        notifier
    }

    pub fn notify(&self, notice: Notice) {
        let Some(id) = self.center.try_update(|center| center.push(notice, now_ms())) else {
            return;
        };
        let (lifetime, fade) = self
            .center
            .with_untracked(|center| (center.lifetime_ms(), center.fade_ms()));
        log::debug!("scheduled removal of notification {}", id);
        self.sweep_after(lifetime);
        self.sweep_after(lifetime + fade);
    }

    pub fn dismiss(&self, id: u64) {
        let started = self
            .center
            .try_update(|center| center.dismiss(id, now_ms()))
            .unwrap_or(false);
        if started {
            let fade = self.center.with_untracked(|center| center.fade_ms());
            self.sweep_after(fade);
        }
    }

    fn sweep_after(&self, delay_ms: u64) {
        let center = self.center;
        Timeout::new(delay_ms as u32, move || {
            center.try_update(|center| center.sweep(now_ms()));
        })
        .forget();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().unwrap_or_else(Notifier::provide)
}

#[component]
pub fn NotificationHost() -> impl IntoView {
    let notifier = use_notifier();
    let center = notifier.center;

    view! {
        <div class="flash-messages" aria-live="polite">
            <For
                each=move || {
                    center.with(|c| {
                        c.iter()
                            .map(|n| (n.id, n.message.clone(), n.severity))
                            .collect::<Vec<_>>()
                    })
                }
                key=|(id, _, _)| *id
                children=move |(id, message, severity)| {
                    let fading = move || {
                        center.with(|c| c.get(id).map(|n| n.phase() == Phase::Fading).unwrap_or(true))
                    };
                    view! {
                        <div
                            class=format!("flash {}", severity.as_str())
                            class:fading=fading
                            role="status"
                            on:click=move |_| notifier.dismiss(id)
                        >
                            <i class=format!("fas fa-{}", severity.icon())></i>
                            <span>{message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
