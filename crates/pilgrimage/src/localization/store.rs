//! Active-language store.

use tokio::sync::watch;
use tracing::{debug, warn};

use super::bundles::{lookup, resolve, Bundle, DEFAULT_LANGUAGE};

/// The active language and its resolved bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationState {
    /// Code as last set, even if no bundle exists for it.
    pub active_language: String,
    /// Bundle resolved from `active_language`.
    pub bundle: &'static Bundle,
}

impl LocalizationState {
    fn for_code(code: &str) -> Self {
        Self {
            active_language: code.to_string(),
            bundle: resolve(code),
        }
    }

    /// Whether the bundle is a fallback rather than an exact match.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.bundle.code() != self.active_language
    }
}

/// Process-wide holder of the active language.
#[derive(Debug)]
pub struct LocalizationStore {
    state: watch::Sender<LocalizationState>,
}

impl Default for LocalizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationStore {
    /// Create a store set to the default language.
    #[must_use]
    pub fn new() -> Self {
        Self::with_language(DEFAULT_LANGUAGE)
    }

    /// Create a store set to `code`.
    #[must_use]
    pub fn with_language(code: &str) -> Self {
        let (state, _) = watch::channel(LocalizationState::for_code(code));
        Self { state }
    }

    /// Switch language. Unknown codes are kept and render in the default
    /// language.
    pub fn set_language(&self, code: &str) {
        if lookup(code).is_none() {
            warn!(code, "No bundle for language; using {DEFAULT_LANGUAGE}");
        }
        let changed = self.state.send_if_modified(|state| {
            if state.active_language == code {
                return false;
            }
            *state = LocalizationState::for_code(code);
            true
        });
        if changed {
            debug!(code, "Language changed");
        }
    }

    /// The code last passed to [`set_language`](Self::set_language).
    #[must_use]
    pub fn active_language(&self) -> String {
        self.state.borrow().active_language.clone()
    }

    /// The resolved bundle.
    #[must_use]
    pub fn bundle(&self) -> &'static Bundle {
        self.state.borrow().bundle
    }

    /// Translate a key in the active language.
    #[must_use]
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        self.bundle().text(key)
    }

    /// A snapshot of the state.
    #[must_use]
    pub fn snapshot(&self) -> LocalizationState {
        self.state.borrow().clone()
    }

    /// Subscribe to language changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LocalizationState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::default_bundle;

    #[test]
    fn test_new_uses_default_language() {
        let store = LocalizationStore::new();
        assert_eq!(store.active_language(), DEFAULT_LANGUAGE);
        assert!(std::ptr::eq(store.bundle(), default_bundle()));
        assert!(!store.snapshot().is_fallback());
    }

    #[test]
    fn test_set_known_language() {
        let store = LocalizationStore::new();
        store.set_language("ar");
        assert_eq!(store.active_language(), "ar");
        assert_eq!(store.bundle().code(), "ar");
        assert_eq!(store.text("sos.cancel"), "إلغاء");
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        let store = LocalizationStore::with_language("ur");
        store.set_language("xx-unknown");

        let state = store.snapshot();
        assert_eq!(state.active_language, "xx-unknown");
        assert_eq!(state.bundle, default_bundle());
        assert!(state.is_fallback());
        assert_eq!(store.text("sos.button"), "SOS");
    }

    #[test]
    fn test_subscribers_only_woken_on_change() {
        let store = LocalizationStore::new();
        let mut rx = store.subscribe();

        store.set_language(DEFAULT_LANGUAGE);
        assert!(!rx.has_changed().unwrap());

        store.set_language("ur");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().bundle.code(), "ur");
    }
}
