//! Identity session store.
//!
//! Holds the currently signed-in [`Actor`], if any. Screens read it through
//! [`SessionStore::current`] or keep a [`watch::Receiver`] from
//! [`SessionStore::subscribe`]; dependent components register a
//! [`SessionListener`] to react to identity changes.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::actor::{Actor, ActorUpdate, EmergencyContact, Role, SosRecord};

/// A change of signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityChange {
    /// An actor signed in, possibly replacing another one.
    SignedIn {
        /// Id of the actor that was replaced, if any.
        previous: Option<String>,
        /// Id of the actor now signed in.
        current: String,
    },
    /// The session was cleared.
    SignedOut {
        /// Id of the actor that signed out.
        previous: String,
    },
}

/// Observer for identity changes.
///
/// Listeners are held weakly; dropping the listener unregisters it.
pub trait SessionListener: Send + Sync {
    /// Called after the session has switched identity.
    fn identity_changed(&self, change: &IdentityChange);
}

struct SessionInner {
    current: watch::Sender<Option<Actor>>,
    listeners: Mutex<Vec<Weak<dyn SessionListener>>>,
}

impl std::fmt::Debug for SessionInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("SessionInner")
            .field("current", &*self.current.borrow())
            .field("listeners", &listeners)
            .finish()
    }
}

/// Process-wide holder of the current actor.
///
/// Cloning yields another handle to the same session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty (signed-out) session.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                current,
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Replace the current actor unconditionally.
    pub fn sign_in(&self, actor: Actor) {
        let current = actor.id.clone();
        info!(actor = %current, role = %actor.role, "Signed in");
        let previous = self.inner.current.send_replace(Some(actor)).map(|a| a.id);
        self.notify(&IdentityChange::SignedIn { previous, current });
    }

    /// Clear the current actor.
    ///
    /// Returns `false` if nobody was signed in.
    pub fn sign_out(&self) -> bool {
        match self.inner.current.send_replace(None) {
            Some(previous) => {
                info!(actor = %previous.id, "Signed out");
                self.notify(&IdentityChange::SignedOut {
                    previous: previous.id,
                });
                true
            }
            None => {
                debug!("Sign-out with no active session ignored");
                false
            }
        }
    }

    /// Merge a partial edit into the current actor.
    ///
    /// Returns `false` (and changes nothing) if nobody is signed in or the
    /// edit names no fields.
    pub fn update_actor(&self, update: ActorUpdate) -> bool {
        if update.is_empty() {
            debug!("Empty profile update ignored");
            return false;
        }
        let applied = self.inner.current.send_if_modified(|slot| match slot {
            Some(actor) => {
                update.apply(actor);
                true
            }
            None => false,
        });
        if applied {
            debug!("Updated current actor profile");
        } else {
            warn!("Profile update with no signed-in actor ignored");
        }
        applied
    }

    /// Append a record to the current actor's SOS history.
    ///
    /// Returns `false` if nobody is signed in.
    pub fn append_sos_record(&self, record: SosRecord) -> bool {
        let record_id = record.id.clone();
        let appended = self.inner.current.send_if_modified(|slot| match slot {
            Some(actor) => {
                actor.sos_history.push(record);
                true
            }
            None => false,
        });
        if appended {
            debug!(record = %record_id, "Appended SOS record");
        } else {
            warn!("SOS record with no signed-in actor dropped");
        }
        appended
    }

    /// A snapshot of the current actor.
    #[must_use]
    pub fn current(&self) -> Option<Actor> {
        self.inner.current.borrow().clone()
    }

    /// Run `f` against the current actor without cloning it.
    ///
    /// `f` must not call back into this store.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&Actor>) -> R) -> R {
        f(self.inner.current.borrow().as_ref())
    }

    /// Check whether an actor is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.with_current(|actor| actor.is_some())
    }

    /// The current actor's role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.with_current(|actor| actor.map(|a| a.role))
    }

    /// The current actor's emergency contacts, empty when signed out.
    #[must_use]
    pub fn emergency_contacts(&self) -> Vec<EmergencyContact> {
        self.with_current(|actor| {
            actor
                .map(|a| a.emergency_contacts.clone())
                .unwrap_or_default()
        })
    }

    /// Subscribe to changes of the current actor.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Actor>> {
        self.inner.current.subscribe()
    }

    /// Register a listener for identity changes.
    pub fn add_listener(&self, listener: Weak<dyn SessionListener>) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    fn notify(&self, change: &IdentityChange) {
        // Upgrade under the lock, call outside it so listeners may read the store
        let live: Vec<Arc<dyn SessionListener>> = {
            let mut listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.identity_changed(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{EmergencyContact, SosStatus};

    #[derive(Default)]
    struct Recorder {
        changes: Mutex<Vec<IdentityChange>>,
    }

    impl SessionListener for Recorder {
        fn identity_changed(&self, change: &IdentityChange) {
            self.changes.lock().unwrap().push(change.clone());
        }
    }

    fn pilgrim() -> Actor {
        Actor::new("p-1", "Amina", Role::Pilgrim)
            .with_contacts(vec![EmergencyContact::new("c-1", "Yusuf", "+966501234567")])
    }

    #[test]
    fn test_new_store_is_signed_out() {
        let store = SessionStore::new();
        assert!(!store.is_signed_in());
        assert!(store.current().is_none());
        assert!(store.role().is_none());
        assert!(store.emergency_contacts().is_empty());
    }

    #[test]
    fn test_sign_in_replaces_wholesale() {
        let store = SessionStore::new();
        store.sign_in(pilgrim());
        store.sign_in(Actor::new("a-1", "Sara", Role::Admin));

        let current = store.current().unwrap();
        assert_eq!(current.id, "a-1");
        assert!(current.emergency_contacts.is_empty());
    }

    #[test]
    fn test_sign_out_clears() {
        let store = SessionStore::new();
        store.sign_in(pilgrim());
        assert!(store.sign_out());
        assert!(store.current().is_none());
        assert!(!store.sign_out());
    }

    #[test]
    fn test_update_preserves_other_fields() {
        let store = SessionStore::new();
        let original = pilgrim();
        store.sign_in(original.clone());

        assert!(store.update_actor(ActorUpdate::new().display_name("X")));

        let expected = Actor {
            display_name: "X".to_string(),
            ..original
        };
        assert_eq!(store.current(), Some(expected));
    }

    #[test]
    fn test_update_when_signed_out_is_noop() {
        let store = SessionStore::new();
        assert!(!store.update_actor(ActorUpdate::new().display_name("X")));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_append_sos_record() {
        let store = SessionStore::new();
        assert!(!store.append_sos_record(SosRecord::broadcast(None)));

        store.sign_in(pilgrim());
        assert!(store.append_sos_record(SosRecord::broadcast(Some("help".to_string()))));

        let actor = store.current().unwrap();
        assert_eq!(actor.sos_history.len(), 1);
        assert_eq!(actor.sos_history[0].status, SosStatus::Broadcasted);
    }

    #[test]
    fn test_subscribe_sees_updates() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.sign_in(pilgrim());
        assert!(rx.has_changed().unwrap());
        let signed_in = rx.borrow_and_update().as_ref().map(|a| a.id.clone());
        assert_eq!(signed_in.as_deref(), Some("p-1"));

        // A rejected update does not wake subscribers
        store.sign_out();
        let _ = rx.borrow_and_update();
        store.update_actor(ActorUpdate::new().avatar("x.png"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_listeners_receive_identity_changes() {
        let store = SessionStore::new();
        let recorder = Arc::new(Recorder::default());
        store.add_listener(Arc::downgrade(&recorder) as Weak<dyn SessionListener>);

        store.sign_in(pilgrim());
        store.update_actor(ActorUpdate::new().display_name("Amina B."));
        store.sign_out();
        store.sign_out();

        let changes = recorder.changes.lock().unwrap().clone();
        assert_eq!(
            changes,
            vec![
                IdentityChange::SignedIn {
                    previous: None,
                    current: "p-1".to_string()
                },
                IdentityChange::SignedOut {
                    previous: "p-1".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let store = SessionStore::new();
        let recorder = Arc::new(Recorder::default());
        store.add_listener(Arc::downgrade(&recorder) as Weak<dyn SessionListener>);
        drop(recorder);

        // Must not panic on a dead listener
        store.sign_in(pilgrim());
        let debug = format!("{store:?}");
        assert!(debug.contains("listeners: 0"));
    }

    #[test]
    fn test_empty_update_is_noop() {
        let store = SessionStore::new();
        store.sign_in(pilgrim());
        let mut rx = store.subscribe();
        let _ = rx.borrow_and_update();

        assert!(!store.update_actor(ActorUpdate::new()));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.current(), Some(pilgrim()));
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let handle = store.clone();
        handle.sign_in(pilgrim());
        assert!(store.is_signed_in());
    }
}
