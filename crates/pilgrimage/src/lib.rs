//! `pilgrimage` - Session, localization, notification and SOS core for a
//! pilgrimage companion app
//!
//! Screens hold an [`AppContext`] and go through its stores: the identity
//! [`SessionStore`], the [`LocalizationStore`], the [`NotificationQueue`] and
//! the [`SosController`]. Each store notifies subscribers on change and absorbs
//! invalid requests as no-ops instead of failing.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod actor;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod identities;
pub mod localization;
pub mod logging;
pub mod notification;
pub mod router;
pub mod session;
pub mod sos;

pub use actor::{Actor, ActorUpdate, EmergencyContact, Role, SosRecord, SosStatus};
pub use config::Config;
pub use context::AppContext;
pub use error::{Error, Result};
pub use localization::{Bundle, LocalizationStore};
pub use logging::init_logging;
pub use notification::{Notification, NotificationId, NotificationQueue, Severity};
pub use router::RoleView;
pub use session::{SessionListener, SessionStore};
pub use sos::{SosController, SosPhase, SosSessionState};
