//! The object screens are handed.
//!
//! [`AppContext`] owns one of each store plus the SOS controller. Screens get
//! it by reference and go through its stores; nothing here is global.

use tracing::info;

use crate::actor::ActorUpdate;
use crate::config::Config;
use crate::error::Result;
use crate::identities;
use crate::localization::LocalizationStore;
use crate::notification::NotificationQueue;
use crate::router::RoleView;
use crate::session::SessionStore;
use crate::sos::SosController;

/// All shared state of the running app.
#[derive(Debug)]
pub struct AppContext {
    session: SessionStore,
    localization: LocalizationStore,
    notifications: NotificationQueue,
    sos: SosController,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    /// Create a signed-out context with default settings.
    #[must_use]
    pub fn new() -> Self {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        Self {
            session,
            localization: LocalizationStore::new(),
            notifications: NotificationQueue::new(),
            sos,
        }
    }

    /// Create a context from configuration, signing in the configured demo
    /// identity if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if `session.auto_sign_in` names an unknown identity.
    pub fn from_config(config: &Config) -> Result<Self> {
        let session = SessionStore::new();
        let sos = SosController::new(&session);
        let context = Self {
            session,
            localization: LocalizationStore::with_language(&config.localization.language),
            notifications: NotificationQueue::with_auto_dismiss(config.auto_dismiss()),
            sos,
        };
        if let Some(id) = &config.session.auto_sign_in {
            context.session.sign_in(identities::require(id)?);
        }
        info!(
            language = %context.localization.active_language(),
            signed_in = context.session.is_signed_in(),
            "App context ready"
        );
        Ok(context)
    }

    /// The identity session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The active language.
    #[must_use]
    pub fn localization(&self) -> &LocalizationStore {
        &self.localization
    }

    /// The notification queue.
    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// The SOS workflow.
    #[must_use]
    pub fn sos(&self) -> &SosController {
        &self.sos
    }

    /// The dashboard for whoever is signed in.
    #[must_use]
    pub fn current_view(&self) -> Option<RoleView> {
        self.session.with_current(RoleView::for_actor)
    }

    /// Sign in a demo identity by id and greet them.
    ///
    /// # Errors
    ///
    /// Returns an error if no demo identity has that id.
    pub fn sign_in_demo(&self, id: &str) -> Result<()> {
        let actor = identities::require(id)?;
        let greeting = self
            .localization
            .bundle()
            .fill("notify.signed_in", &[("name", actor.display_name.as_str())]);
        self.session.sign_in(actor);
        self.notifications.info(greeting);
        Ok(())
    }

    /// Sign out and say so. SOS state resets through the session.
    pub fn sign_out(&self) {
        if self.session.sign_out() {
            self.notifications
                .info(self.localization.text("notify.signed_out"));
        }
    }

    /// Apply a profile edit and confirm it to the user.
    pub fn save_profile(&self, update: ActorUpdate) -> bool {
        let saved = self.session.update_actor(update);
        if saved {
            self.notifications
                .success(self.localization.text("profile.saved"));
        }
        saved
    }

    /// Confirm the pending SOS and announce it.
    pub fn send_sos(&self, message: Option<String>) -> bool {
        let sent = self.sos.confirm_with_message(message);
        if sent {
            self.notifications
                .success(self.localization.text("sos.sent"));
        }
        sent
    }

    /// Cancel the pending SOS and say so.
    pub fn cancel_sos(&self) -> bool {
        let cancelled = self.sos.cancel();
        if cancelled {
            self.notifications
                .info(self.localization.text("sos.cancelled"));
        }
        cancelled
    }
}
