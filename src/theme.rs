//! Light/dark theme preference.

use std::fmt;

use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon offering the other mode: a sun while dark, a moon while light.
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Dark => "fas fa-sun",
            Self::Light => "fas fa-moon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("failed to write preference {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Client-local key/value persistence.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// The element carrying the theme attribute.
pub trait ThemeSurface {
    /// `None` when the attribute is absent or holds an unknown value.
    fn current(&self) -> Option<Theme>;
    fn apply(&self, theme: Theme);
}

pub struct ThemeSwitch<S, D> {
    store: S,
    surface: D,
}

impl<S: PreferenceStore, D: ThemeSurface> ThemeSwitch<S, D> {
    pub fn new(store: S, surface: D) -> Self {
        Self { store, surface }
    }

    /// Applies the saved theme, if any, and returns the theme now shown.
    pub fn restore(&self) -> Option<Theme> {
        if let Some(saved) = self.store.load(THEME_KEY).as_deref().and_then(Theme::parse) {
            self.surface.apply(saved);
        }
        self.surface.current()
    }

    /// Flips the document theme and persists it. Anything other than dark
    /// (including no theme at all) switches to dark.
    pub fn toggle(&self) -> Result<Theme, PreferenceError> {
        let next = match self.surface.current() {
            Some(Theme::Dark) => Theme::Light,
            _ => Theme::Dark,
        };
        self.surface.apply(next);
        self.store.store(THEME_KEY, next.as_str())?;
        log::debug!("theme set to {}", next);
        Ok(next)
    }

    pub fn current(&self) -> Option<Theme> {
        self.surface.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl PreferenceStore for &MemoryStore {
        fn load(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn store(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct ReadOnlyStore;

    impl PreferenceStore for ReadOnlyStore {
        fn load(&self, _key: &str) -> Option<String> {
            None
        }

        fn store(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::Unavailable)
        }
    }

    #[derive(Default)]
    struct FakeDocument(RefCell<Option<String>>);

    impl ThemeSurface for &FakeDocument {
        fn current(&self) -> Option<Theme> {
            self.0.borrow().as_deref().and_then(Theme::parse)
        }

        fn apply(&self, theme: Theme) {
            *self.0.borrow_mut() = Some(theme.as_str().to_string());
        }
    }

    fn saved(store: &MemoryStore) -> Option<String> {
        store.0.borrow().get(THEME_KEY).cloned()
    }

    #[test]
    fn restore_applies_saved_value() {
        let store = MemoryStore::default();
        store.0.borrow_mut().insert(THEME_KEY.into(), "dark".into());
        let document = FakeDocument::default();

        let switch = ThemeSwitch::new(&store, &document);
        assert_eq!(switch.restore(), Some(Theme::Dark));
        assert_eq!(document.0.borrow().as_deref(), Some("dark"));
    }

    #[test]
    fn restore_ignores_garbage() {
        let store = MemoryStore::default();
        store.0.borrow_mut().insert(THEME_KEY.into(), "sepia".into());
        let document = FakeDocument::default();

        let switch = ThemeSwitch::new(&store, &document);
        assert_eq!(switch.restore(), None);
        assert!(document.0.borrow().is_none());
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        for original in [Theme::Light, Theme::Dark] {
            let store = MemoryStore::default();
            store.0.borrow_mut().insert(THEME_KEY.into(), original.as_str().into());
            let document = FakeDocument::default();
            let switch = ThemeSwitch::new(&store, &document);
            switch.restore();

            assert_eq!(switch.toggle(), Ok(original.toggled()));
            assert_eq!(saved(&store).as_deref(), Some(original.toggled().as_str()));

            assert_eq!(switch.toggle(), Ok(original));
            assert_eq!(saved(&store).as_deref(), Some(original.as_str()));
            assert_eq!(switch.current(), Some(original));
        }
    }

    #[test]
    fn first_toggle_without_theme_goes_dark() {
        let store = MemoryStore::default();
        let document = FakeDocument::default();
        let switch = ThemeSwitch::new(&store, &document);

        assert_eq!(switch.restore(), None);
        assert_eq!(switch.toggle(), Ok(Theme::Dark));
        assert_eq!(saved(&store).as_deref(), Some("dark"));
    }

    #[test]
    fn storage_failure_still_flips_document() {
        let document = FakeDocument::default();
        let switch = ThemeSwitch::new(ReadOnlyStore, &document);

        assert_eq!(switch.toggle(), Err(PreferenceError::Unavailable));
        assert_eq!(switch.current(), Some(Theme::Dark));
    }

    #[test]
    fn icon_tracks_theme() {
        assert_eq!(Theme::Dark.icon_class(), "fas fa-sun");
        assert_eq!(Theme::Light.icon_class(), "fas fa-moon");
    }
}
