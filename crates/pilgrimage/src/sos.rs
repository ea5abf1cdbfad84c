//! SOS escalation state machine.
//!
//! ```text
//! Idle --trigger--> Confirming --confirm--> AwaitingFollowUp --close--> Active
//!  ^                    |                                                 |
//!  +------cancel--------+                                                 |
//!  +---------------------- sign-in / sign-out ----------------------------+
//! ```
//!
//! Confirming is the only way into an active SOS. Once active, the only way
//! back to Idle is a sign-in or sign-out; resolving an alert needs a
//! responder and happens outside this process.

use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::actor::{EmergencyContact, SosRecord};
use crate::session::{IdentityChange, SessionListener, SessionStore};

/// Where the SOS workflow currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SosPhase {
    /// No SOS in progress.
    #[default]
    Idle,
    /// The confirmation surface is open.
    Confirming,
    /// SOS sent; the "who to call" surface is open.
    AwaitingFollowUp,
    /// SOS sent; follow-up closed.
    Active,
}

impl SosPhase {
    /// The two flags screens render from.
    #[must_use]
    pub fn state(self) -> SosSessionState {
        match self {
            Self::Idle | Self::Confirming => SosSessionState::default(),
            Self::AwaitingFollowUp => SosSessionState {
                is_active: true,
                awaiting_follow_up: true,
            },
            Self::Active => SosSessionState {
                is_active: true,
                awaiting_follow_up: false,
            },
        }
    }
}

impl std::fmt::Display for SosPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Confirming => write!(f, "confirming"),
            Self::AwaitingFollowUp => write!(f, "active (awaiting follow-up)"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// SOS flags as seen by screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SosSessionState {
    /// An SOS has been sent; the trigger is disabled.
    pub is_active: bool,
    /// The follow-up surface should be shown.
    pub awaiting_follow_up: bool,
}

#[derive(Debug)]
struct SosShared {
    phase: watch::Sender<SosPhase>,
}

impl SosShared {
    /// Move `from` -> `to` atomically. Returns `false` if not in `from`.
    fn transition(&self, from: SosPhase, to: SosPhase) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == from {
                *phase = to;
                true
            } else {
                false
            }
        })
    }

    fn reset(&self) {
        let mut previous = SosPhase::Idle;
        let reset = self.phase.send_if_modified(|phase| {
            previous = std::mem::replace(phase, SosPhase::Idle);
            previous != SosPhase::Idle
        });
        if reset {
            info!(%previous, "SOS state reset");
        }
    }
}

impl SessionListener for SosShared {
    fn identity_changed(&self, change: &IdentityChange) {
        // Sign-in replaces the actor and its history, so even the same id
        // starts from Idle.
        debug!(?change, "Identity changed");
        self.reset();
    }
}

/// Drives the SOS workflow for the signed-in actor.
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct SosController {
    session: SessionStore,
    shared: Arc<SosShared>,
}

impl SosController {
    /// Create a controller bound to `session`.
    ///
    /// The controller resets to Idle on every sign-in and sign-out.
    #[must_use]
    pub fn new(session: &SessionStore) -> Self {
        let (phase, _) = watch::channel(SosPhase::Idle);
        let shared = Arc::new(SosShared { phase });
        let listener: Weak<SosShared> = Arc::downgrade(&shared);
        session.add_listener(listener);
        Self {
            session: session.clone(),
            shared,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SosPhase {
        *self.shared.phase.borrow()
    }

    /// Current flags.
    #[must_use]
    pub fn state(&self) -> SosSessionState {
        self.phase().state()
    }

    /// Whether the trigger affordance should be enabled.
    #[must_use]
    pub fn can_trigger(&self) -> bool {
        self.phase() == SosPhase::Idle && self.session.is_signed_in()
    }

    /// Open the confirmation step.
    ///
    /// Rejected (returns `false`) when signed out or when an SOS is already
    /// being confirmed or active.
    pub fn trigger(&self) -> bool {
        if !self.session.is_signed_in() {
            warn!("SOS trigger with no signed-in actor ignored");
            return false;
        }
        let opened = self.shared.transition(SosPhase::Idle, SosPhase::Confirming);
        if opened {
            debug!("SOS confirmation requested");
        } else {
            warn!(phase = %self.phase(), "SOS trigger rejected");
        }
        opened
    }

    /// Back out of the confirmation step.
    pub fn cancel(&self) -> bool {
        let cancelled = self.shared.transition(SosPhase::Confirming, SosPhase::Idle);
        if cancelled {
            debug!("SOS cancelled before sending");
        }
        cancelled
    }

    /// Confirm and send the SOS.
    pub fn confirm(&self) -> bool {
        self.confirm_with_message(None)
    }

    /// Confirm and send the SOS with a message attached to its record.
    ///
    /// Appends a broadcast record to the actor's history.
    pub fn confirm_with_message(&self, message: Option<String>) -> bool {
        if !self
            .shared
            .transition(SosPhase::Confirming, SosPhase::AwaitingFollowUp)
        {
            warn!(phase = %self.phase(), "SOS confirm outside confirmation ignored");
            return false;
        }

        let record = SosRecord::broadcast(message);
        let record_id = record.id.clone();
        if !self.session.append_sos_record(record) {
            // Signing out resets to Idle, so this only happens if the session
            // was cleared without a listener callback.
            self.shared.reset();
            return false;
        }
        info!(record = %record_id, "SOS activated");
        true
    }

    /// Close the follow-up surface. The SOS stays active.
    pub fn close_follow_up(&self) -> bool {
        let closed = self
            .shared
            .transition(SosPhase::AwaitingFollowUp, SosPhase::Active);
        if closed {
            debug!("SOS follow-up closed");
        }
        closed
    }

    /// People to offer calling while the follow-up surface is open.
    ///
    /// Empty outside [`SosPhase::AwaitingFollowUp`] or when the actor has no
    /// contacts.
    #[must_use]
    pub fn follow_up_contacts(&self) -> Vec<EmergencyContact> {
        if self.phase() == SosPhase::AwaitingFollowUp {
            self.session.emergency_contacts()
        } else {
            Vec::new()
        }
    }

    /// Subscribe to phase changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SosPhase> {
        self.shared.phase.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, Role, SosStatus};

    fn pilgrim_with_contacts() -> Actor {
        Actor::new("p-1", "Amina", Role::Pilgrim).with_contacts(vec![
            EmergencyContact::new("c-1", "Yusuf", "+966501234567"),
            EmergencyContact::new("c-2", "Mariam", "+62812555010"),
        ])
    }

    fn signed_in() -> (SessionStore, SosController) {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        session.sign_in(pilgrim_with_contacts());
        (session, sos)
    }

    #[test]
    fn test_phase_state_mapping() {
        assert_eq!(SosPhase::Idle.state(), SosSessionState::default());
        assert_eq!(SosPhase::Confirming.state(), SosSessionState::default());
        assert!(SosPhase::AwaitingFollowUp.state().awaiting_follow_up);
        assert!(SosPhase::Active.state().is_active);
        assert!(!SosPhase::Active.state().awaiting_follow_up);
    }

    #[test]
    fn test_full_flow() {
        let (session, sos) = signed_in();
        assert!(sos.can_trigger());

        assert!(sos.trigger());
        assert_eq!(sos.phase(), SosPhase::Confirming);
        assert!(!sos.state().is_active);

        assert!(sos.confirm());
        assert_eq!(
            sos.state(),
            SosSessionState {
                is_active: true,
                awaiting_follow_up: true
            }
        );
        let names: Vec<_> = sos.follow_up_contacts().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Yusuf", "Mariam"]);

        assert!(sos.close_follow_up());
        assert_eq!(
            sos.state(),
            SosSessionState {
                is_active: true,
                awaiting_follow_up: false
            }
        );
        assert!(sos.follow_up_contacts().is_empty());

        let history = session.current().unwrap().sos_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, SosStatus::Broadcasted);
    }

    #[test]
    fn test_confirm_without_trigger_is_rejected() {
        let (session, sos) = signed_in();
        assert!(!sos.confirm());
        assert_eq!(sos.phase(), SosPhase::Idle);
        assert!(session.current().unwrap().sos_history.is_empty());
    }

    #[test]
    fn test_cancel_returns_to_idle_without_record() {
        let (session, sos) = signed_in();
        sos.trigger();
        assert!(sos.cancel());
        assert_eq!(sos.phase(), SosPhase::Idle);
        assert!(!sos.cancel());
        assert!(session.current().unwrap().sos_history.is_empty());
    }

    #[test]
    fn test_retrigger_while_active_has_no_effect() {
        let (session, sos) = signed_in();
        sos.trigger();
        sos.confirm();

        let before = sos.state();
        let history_before = session.current().unwrap().sos_history;
        assert!(!sos.can_trigger());
        assert!(!sos.trigger());
        assert!(!sos.confirm());
        assert_eq!(sos.state(), before);
        assert_eq!(session.current().unwrap().sos_history, history_before);
    }

    #[test]
    fn test_trigger_while_confirming_is_noop() {
        let (_session, sos) = signed_in();
        assert!(sos.trigger());
        assert!(!sos.trigger());
        assert_eq!(sos.phase(), SosPhase::Confirming);
    }

    #[test]
    fn test_trigger_requires_signed_in_actor() {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        assert!(!sos.can_trigger());
        assert!(!sos.trigger());
        assert_eq!(sos.phase(), SosPhase::Idle);
    }

    #[test]
    fn test_close_follow_up_only_from_awaiting() {
        let (_session, sos) = signed_in();
        assert!(!sos.close_follow_up());
        sos.trigger();
        assert!(!sos.close_follow_up());
        sos.confirm();
        assert!(sos.close_follow_up());
        assert!(!sos.close_follow_up());
        assert_eq!(sos.phase(), SosPhase::Active);
    }

    #[test]
    fn test_sign_out_resets_to_idle() {
        let (session, sos) = signed_in();
        sos.trigger();
        sos.confirm();
        sos.close_follow_up();

        session.sign_out();
        assert_eq!(sos.phase(), SosPhase::Idle);
        assert_eq!(sos.state(), SosSessionState::default());
    }

    #[test]
    fn test_sign_out_while_confirming_resets() {
        let (session, sos) = signed_in();
        sos.trigger();
        session.sign_out();
        assert_eq!(sos.phase(), SosPhase::Idle);
        assert!(!sos.confirm());
    }

    #[test]
    fn test_switching_identity_resets() {
        let (session, sos) = signed_in();
        sos.trigger();
        sos.confirm();

        session.sign_in(Actor::new("a-1", "Sara", Role::Admin));
        assert_eq!(sos.phase(), SosPhase::Idle);
    }

    #[test]
    fn test_same_identity_sign_in_resets_with_history() {
        let (session, sos) = signed_in();
        sos.trigger();
        sos.confirm();
        assert_eq!(session.current().unwrap().sos_history.len(), 1);

        // Fresh catalog copy of the same actor, without the new record
        session.sign_in(pilgrim_with_contacts());

        let history = session.current().unwrap().sos_history;
        let broadcasted = history
            .iter()
            .filter(|r| r.status == SosStatus::Broadcasted)
            .count();
        assert_eq!(broadcasted, 0);
        assert_eq!(sos.phase(), SosPhase::Idle);
        assert_eq!(sos.state(), SosSessionState::default());
        assert!(sos.can_trigger());
    }

    #[test]
    fn test_follow_up_without_contacts_is_empty() {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        session.sign_in(Actor::new("v-1", "Omar", Role::Volunteer));

        sos.trigger();
        sos.confirm_with_message(Some("need water".to_string()));
        assert!(sos.state().awaiting_follow_up);
        assert!(sos.follow_up_contacts().is_empty());

        let record = session.current().unwrap().sos_history.pop().unwrap();
        assert_eq!(record.message.as_deref(), Some("need water"));
    }

    #[test]
    fn test_subscribe_sees_phases() {
        let (_session, sos) = signed_in();
        let mut rx = sos.subscribe();

        sos.trigger();
        assert_eq!(*rx.borrow_and_update(), SosPhase::Confirming);

        // Rejected transitions do not wake subscribers
        sos.close_follow_up();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_dropped_controller_unregisters() {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        drop(sos);
        session.sign_in(pilgrim_with_contacts());
        session.sign_out();
    }
}
