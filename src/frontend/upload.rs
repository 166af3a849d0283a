use gloo_timers::callback::{Interval, Timeout};
use leptos::ev::{DragEvent, SubmitEvent};
use leptos::*;
use leptos_router::use_navigate;
use web_sys::File;

use super::api;
use super::notifications::{use_notifier, Notifier};
use crate::config::IntakeConfig;
use crate::intake::{FileSummary, Intake, SelectedFile, UploadOutcome};
use crate::notify::Notice;
use crate::progress::PROGRESS_TICK_MS;

/// Reactive state behind the upload form.
#[derive(Clone, Copy)]
struct UploadState {
    intake: RwSignal<Intake>,
    summary: RwSignal<Option<FileSummary>>,
    preview_src: RwSignal<Option<String>>,
    is_dragging: RwSignal<bool>,
    chosen: StoredValue<Option<File>>,
    selection: StoredValue<u64>,
    ticker: StoredValue<Option<Interval>>,
    redirect: StoredValue<Option<Timeout>>,
}

impl UploadState {
    fn new(config: IntakeConfig) -> Self {
        Self {
            intake: create_rw_signal(Intake::new(config)),
            summary: create_rw_signal(None),
            preview_src: create_rw_signal(None),
            is_dragging: create_rw_signal(false),
            chosen: store_value(None),
            selection: store_value(0),
            ticker: store_value(None),
            redirect: store_value(None),
        }
    }

    /// Single entry point for picker and drop selections.
    fn accept(&self, file: File, notifier: Notifier) {
        let descriptor = SelectedFile::new(file.name(), file.size() as u64, file.type_());
        log::debug!("selected {} ({} bytes)", descriptor.name, descriptor.size);

        match self.intake.try_update(|intake| intake.select(descriptor)) {
            Some(Ok(summary)) => {
                let wants_preview = summary.wants_preview;
                self.summary.set(Some(summary));
                self.preview_src.set(None);
                let selection = self.selection.try_update_value(|n| {
                    *n += 1;
                    *n
                });
                self.chosen.set_value(Some(file.clone()));

                if let (true, Some(selection)) = (wants_preview, selection) {
                    self.load_preview(file, selection);
                }
            }
            Some(Err(err)) => notifier.notify(Notice::error(err.to_string())),
            None => {}
        }
    }

    fn load_preview(&self, file: File, selection: u64) {
        let state = *self;
        let file = gloo_file::File::from(file);
        spawn_local(async move {
            match gloo_file::futures::read_as_data_url(&file).await {
                Ok(data_url) => {
                    // a newer pick replaced this one while it was reading
                    if state.selection.try_with_value(|n| *n == selection).unwrap_or(false) {
                        state.preview_src.set(Some(data_url));
                    }
                }
                Err(err) => log::warn!("could not read preview for {}: {}", file.name(), err),
            }
        });
    }

    fn start_ticker(&self) {
        let intake = self.intake;
        let interval = Interval::new(PROGRESS_TICK_MS, move || {
            intake.try_update(|intake| intake.tick());
        });
        self.ticker.set_value(Some(interval));
    }

    fn stop_ticker(&self) {
        // dropping the interval clears it
        let _ = self.ticker.try_update_value(|ticker| ticker.take());
    }

    fn schedule_redirect(&self, delay_ms: u32, navigate: impl Fn(&str) + 'static) {
        let intake = self.intake;
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(redirect) = intake.try_update(|intake| intake.take_redirect()).flatten() {
                // navigating unmounts this form, which drops the timer; leave its callback first
                spawn_local(async move { navigate(&redirect.url) });
            }
        });
        self.redirect.set_value(Some(timeout));
    }

    fn cancel_redirect(&self) {
        let _ = self.redirect.try_update_value(|redirect| redirect.take());
        self.intake.try_update(|intake| intake.abandon_redirect());
    }
}

#[component]
pub fn UploadSection(config: IntakeConfig) -> impl IntoView {
    let notifier = use_notifier();
    let navigate = use_navigate();
    let upload_url = config.upload_url.clone();
    let form_action = upload_url.clone();
    let state = UploadState::new(config);
    let file_input_ref = create_node_ref::<html::Input>();

    on_cleanup(move || {
        state.stop_ticker();
        state.cancel_redirect();
    });

    let on_file_change = move |_| {
        let Some(input) = file_input_ref.get_untracked() else {
            log::warn!("file input not mounted");
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            state.accept(file, notifier);
        }
    };

    let on_zone_click = move |_| {
        if state.is_dragging.get_untracked() {
            return;
        }
        if let Some(input) = file_input_ref.get_untracked() {
            input.click();
        }
    };

    let on_drag_active = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.is_dragging.set(true);
    };

    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.is_dragging.set(false);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        state.is_dragging.set(false);

        let first = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0));
        if let Some(file) = first {
            state.accept(file, notifier);
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let file = match state.intake.try_update(|intake| intake.begin_submit()) {
            Some(Ok(_)) => state.chosen.get_value(),
            Some(Err(err)) => {
                notifier.notify(Notice::error(err.to_string()));
                return;
            }
            None => return,
        };
        let Some(file) = file else {
            let completion = state
                .intake
                .try_update(|intake| intake.finish(UploadOutcome::Network("no file handle".into())));
            if let Some(completion) = completion {
                notifier.notify(completion.notice);
            }
            return;
        };

        state.start_ticker();
        let url = upload_url.clone();
        let navigate = navigate.clone();

        spawn_local(async move {
            log::info!("uploading {} to {}", file.name(), url);
            let outcome = match api::upload_file(&url, &file).await {
                Ok(status) => UploadOutcome::Status(status),
                Err(err) => UploadOutcome::Network(err.to_string()),
            };
            state.stop_ticker();

            let Some(completion) = state.intake.try_update(|intake| intake.finish(outcome)) else {
                return;
            };
            notifier.notify(completion.notice);

            if let Some(redirect) = completion.redirect {
                state.schedule_redirect(redirect.delay_ms, move |url| navigate(url, Default::default()));
            }
        });
    };

    let progress = move || state.intake.with(|intake| intake.progress());

    view! {
        <div class="upload-section border-container">
            <form id="uploadForm" action=form_action on:submit=on_submit>
                <input
                    type="file"
                    id="fileInput"
                    name="file"
                    ref=file_input_ref
                    on:change=on_file_change
                    style="display: none;"
                />
                <div
                    id="dropArea"
                    class="drop-area"
                    class:dragover=move || state.is_dragging.get()
                    on:click=on_zone_click
                    on:dragenter=on_drag_active
                    on:dragover=on_drag_active
                    on:dragleave=on_drag_leave
                    on:drop=on_drop
                >
                    <i class="fas fa-cloud-upload-alt"></i>
                    <p>"drag & drop a file here, or click to browse"</p>
                    <p class="hint">
                        {move || {
                            state.intake.with(|intake| {
                                format!(
                                    "max {} | {}",
                                    crate::format_file_size(intake.config().max_file_size),
                                    intake.config().allowed_extensions.join(", "),
                                )
                            })
                        }}
                    </p>
                </div>

                <div id="fileInfo" class="file-info">
                    {move || state.summary.get().map(|summary| view! {
                        <p>
                            <i class="fas fa-check-circle"></i>
                            <strong>" File selected: "</strong>
                            {summary.name}
                        </p>
                        <p><i class="fas fa-weight"></i><strong>" Size: "</strong>{summary.size}</p>
                        <p><i class="fas fa-file"></i><strong>" Type: "</strong>{summary.kind}</p>
                    })}
                    {move || state.preview_src.get().map(|src| view! {
                        <div class="image-preview">
                            <img src=src alt="Preview" />
                        </div>
                    })}
                </div>

                <Show when=move || progress().is_some()>
                    <div id="uploadProgress" class="upload-progress">
                        <div class="progress-bar">
                            <div
                                id="progressFill"
                                class="progress-fill"
                                style:width=move || format!("{}%", progress().map(|p| p.percent()).unwrap_or(0))
                            ></div>
                        </div>
                        <div id="progressText" class="progress-text">
                            {move || progress().map(|p| p.label()).unwrap_or_default()}
                        </div>
                    </div>
                </Show>

                <button
                    type="submit"
                    class="btn-upload border-container"
                    disabled=move || !state.intake.with(|intake| intake.submit_enabled())
                >
                    {move || if state.intake.with(|intake| intake.in_flight()) { "uploading..." } else { "upload" }}
                </button>
            </form>
        </div>
    }
}
