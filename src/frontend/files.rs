use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_file::ObjectUrl;
use leptos::*;
use wasm_bindgen::JsValue;

use super::api;
use super::notifications::{use_notifier, Notifier};
use crate::config::download_url;
use crate::filter::filter_names;
use crate::notify::Notice;
use crate::{FileEntry, FileKind};

fn format_timestamp(unix_seconds: i64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(unix_seconds as f64 * 1000.0));
    date.to_locale_string("default", &JsValue::UNDEFINED).into()
}

#[derive(Clone, Debug, PartialEq)]
struct OpenPreview {
    name: String,
    url: String,
    kind: FileKind,
}

/// In-page viewer for downloaded blobs. The object URL lives exactly as long
/// as the viewer shows it; closing, replacing or unmounting revokes it.
#[derive(Clone)]
struct PreviewViewer {
    open: RwSignal<Option<OpenPreview>>,
    object_url: Rc<RefCell<Option<ObjectUrl>>>,
    requests: Rc<Cell<u64>>,
}

impl PreviewViewer {
    fn new() -> Self {
        Self {
            open: create_rw_signal(None),
            object_url: Rc::new(RefCell::new(None)),
            requests: Rc::new(Cell::new(0)),
        }
    }

    fn show(&self, entry: &FileEntry, notifier: Notifier) {
        let request = self.requests.get() + 1;
        self.requests.set(request);

        let viewer = self.clone();
        let name = entry.name.clone();
        let url = download_url(&entry.stored_name);
        spawn_local(async move {
            match api::fetch_blob(&url).await {
                Ok(blob) => {
                    if viewer.requests.get() != request {
                        return;
                    }
                    let object_url = ObjectUrl::from(blob);
                    let open = OpenPreview {
                        kind: FileKind::from_name(&name),
                        url: object_url.to_string(),
                        name,
                    };
                    // replacing the handle revokes the previous URL
                    *viewer.object_url.borrow_mut() = Some(object_url);
                    viewer.open.try_set(Some(open));
                }
                Err(err) => {
                    log::error!("preview error for {}: {}", url, err);
                    notifier.notify(Notice::error("Could not preview file"));
                }
            }
        });
    }

    fn close(&self) {
        self.requests.set(self.requests.get() + 1);
        self.open.try_set(None);
        self.release();
    }

    fn release(&self) {
        if self.object_url.borrow_mut().take().is_some() {
            log::debug!("revoked preview object URL");
        }
    }
}

#[component]
pub fn FilesPage(files_api_url: String) -> impl IntoView {
    let notifier = use_notifier();
    let entries = create_rw_signal(Vec::<FileEntry>::new());
    let is_loading = create_rw_signal(false);
    let query = create_rw_signal(String::new());
    let api_url = store_value(files_api_url);
    let viewer = PreviewViewer::new();

    let load = move || {
        spawn_local(async move {
            is_loading.try_set(true);
            match api::fetch_files(&api_url.get_value()).await {
                Ok(files) => {
                    log::debug!("loaded {} files", files.len());
                    entries.try_set(files);
                }
                Err(err) => {
                    log::error!("failed to load files: {}", err);
                    notifier.notify(Notice::error("Could not load files"));
                }
            }
            is_loading.try_set(false);
        });
    };
    load();

    {
        let viewer = viewer.clone();
        on_cleanup(move || viewer.release());
    }

    let outcome = create_memo(move |_| {
        let query = query.get();
        entries.with(|files| filter_names(files.iter().map(|f| f.name.as_str()), &query))
    });

    let delete = move |entry: FileEntry| {
        let question = format!("Are you sure you want to delete \"{}\"?", entry.name);
        if !window().confirm_with_message(&question).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            match api::delete_file(&entry.stored_name).await {
                Ok(response) if response.success => {
                    notifier.notify(Notice::success(response.message));
                }
                Ok(response) => notifier.notify(Notice::error(response.message)),
                Err(err) => {
                    log::error!("delete of {} failed: {}", entry.stored_name, err);
                    notifier.notify(Notice::error("Delete failed!"));
                }
            }
            load();
        });
    };

    let viewer_for_rows = viewer.clone();

    view! {
        <div class="files-section border-container">
            <div class="files-toolbar">
                <input
                    type="text"
                    id="searchFiles"
                    class="search-input"
                    placeholder="search files..."
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
            </div>

            <Show
                when=move || !is_loading.get()
                fallback=|| view! { <div class="loading">"loading files..."</div> }
            >
                <table class="files-table">
                    <thead>
                        <tr>
                            <th>"name"</th>
                            <th>"size"</th>
                            <th>"uploaded"</th>
                            <th>"actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || entries.get().into_iter().enumerate().collect::<Vec<_>>()
                            key=|(index, entry)| (*index, entry.stored_name.clone())
                            children={
                                let viewer = viewer_for_rows.clone();
                                move |(index, entry)| {
                                    let kind = FileKind::from_name(&entry.name);
                                    let visible = move || outcome.with(|o| o.is_visible(index));
                                    let preview_entry = entry.clone();
                                    let delete_entry = entry.clone();
                                    let viewer = viewer.clone();
                                    view! {
                                        <tr style:display=move || if visible() { "" } else { "none" }>
                                            <td class="file-name">
                                                <i class=kind.icon()></i>
                                                " "
                                                {entry.name.clone()}
                                            </td>
                                            <td>{entry.size_formatted.clone()}</td>
                                            <td>{format_timestamp(entry.uploaded_at)}</td>
                                            <td class="file-actions">
                                                <a class="action-btn" href=download_url(&entry.stored_name) download=entry.name.clone()>
                                                    "download"
                                                </a>
                                                <Show when=move || kind.can_preview()>
                                                    {
                                                        let viewer = viewer.clone();
                                                        let preview_entry = preview_entry.clone();
                                                        view! {
                                                            <button
                                                                type="button"
                                                                class="action-btn preview-btn"
                                                                on:click=move |_| viewer.show(&preview_entry, notifier)
                                                            >
                                                                "preview"
                                                            </button>
                                                        }
                                                    }
                                                </Show>
                                                <button
                                                    type="button"
                                                    class="action-btn delete-btn"
                                                    on:click=move |_| delete(delete_entry.clone())
                                                >
                                                    "delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || outcome.with(|o| o.no_results)>
                    <div id="noResults" class="no-results">
                        {move || if entries.with(Vec::is_empty) { "no files uploaded yet" } else { "no files match your search" }}
                    </div>
                </Show>
            </Show>

            {move || viewer.open.get().map(|open| {
                let closer = viewer.clone();
                let backdrop = viewer.clone();
                view! {
                    <div class="preview-overlay" on:click=move |_| backdrop.close()>
                        <div class="preview-panel" on:click=|ev| ev.stop_propagation()>
                            <div class="preview-header">
                                <span>{open.name.clone()}</span>
                                <button type="button" class="action-btn" on:click=move |_| closer.close()>
                                    "close"
                                </button>
                            </div>
                            {match open.kind {
                                FileKind::Image => view! { <img src=open.url.clone() alt=open.name.clone() /> }.into_view(),
                                _ => view! { <iframe src=open.url.clone() title=open.name.clone()></iframe> }.into_view(),
                            }}
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
