//! Localized display strings.
//!
//! - **Static bundles**: one table per language, keyed by dotted paths such as
//!   `sos.confirm_title`. [`Bundle::section`] walks one level of nesting.
//!
//! - **Graceful fallback**: an unknown language code resolves to the default
//!   (English) bundle, and a key missing from a bundle falls back to the
//!   default bundle and finally to the key itself. Nothing here can fail.
//!
//! - **Store**: [`LocalizationStore`] holds the active code and the resolved
//!   bundle, and notifies subscribers when the language changes.
//!
//! # Example
//!
//! ```
//! use pilgrimage::localization::{LocalizationStore, DEFAULT_LANGUAGE};
//!
//! let store = LocalizationStore::new();
//! store.set_language("ar");
//! assert_eq!(store.bundle().code(), "ar");
//!
//! store.set_language("xx-unknown");
//! assert_eq!(store.active_language(), "xx-unknown");
//! assert_eq!(store.bundle().code(), DEFAULT_LANGUAGE);
//! ```

mod bundles;
mod store;

pub use bundles::{catalog, default_bundle, lookup, resolve, Bundle, TextDirection, DEFAULT_LANGUAGE};
pub use store::{LocalizationState, LocalizationStore};
