use gloo_storage::{LocalStorage, Storage};
use leptos::*;

use crate::theme::{PreferenceError, PreferenceStore, Theme, ThemeSurface, ThemeSwitch, THEME_ATTRIBUTE};

/// `localStorage`, holding plain strings rather than JSON.
#[derive(Clone, Copy)]
pub struct BrowserPreferences;

impl PreferenceStore for BrowserPreferences {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| PreferenceError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// The `<html>` element's `data-theme` attribute.
#[derive(Clone, Copy)]
pub struct DocumentTheme;

impl ThemeSurface for DocumentTheme {
    fn current(&self) -> Option<Theme> {
        document()
            .document_element()
            .and_then(|root| root.get_attribute(THEME_ATTRIBUTE))
            .as_deref()
            .and_then(Theme::parse)
    }

    fn apply(&self, theme: Theme) {
        let Some(root) = document().document_element() else {
            log::warn!("no document element to theme");
            return;
        };
        if let Err(err) = root.set_attribute(THEME_ATTRIBUTE, theme.as_str()) {
            log::warn!("failed to set theme attribute: {:?}", err);
        }
    }
}

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let switch = ThemeSwitch::new(BrowserPreferences, DocumentTheme);
    let theme = create_rw_signal(switch.restore().unwrap_or_default());

    let on_click = move |_| {
        match switch.toggle() {
            Ok(next) => theme.set(next),
            Err(err) => {
                log::warn!("theme not persisted: {}", err);
                theme.set(switch.current().unwrap_or_default());
            }
        }
    };

    view! {
        <button id="themeToggle" type="button" class="theme-toggle" title="toggle theme" on:click=on_click>
            <i class=move || theme.get().icon_class()></i>
        </button>
    }
}
