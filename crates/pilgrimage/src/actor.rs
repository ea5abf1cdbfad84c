//! Core identity types for pilgrimage.
//!
//! An [`Actor`] is the signed-in user: role, emergency contacts, SOS history
//! and role-specific settings. [`ActorUpdate`] carries a partial profile edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role-specific configuration bag, free-form per role.
pub type RoleSettings = serde_json::Map<String, serde_json::Value>;

/// The closed set of actor categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A pilgrim using the app for themselves.
    Pilgrim,
    /// A volunteer assisting pilgrims on the ground.
    Volunteer,
    /// A public-safety authority responding to alerts.
    Authority,
    /// An administrator of the deployment.
    Admin,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 4] = [Self::Pilgrim, Self::Volunteer, Self::Authority, Self::Admin];

    /// Parse a role tag, case-insensitively.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(tag.trim()))
    }

    /// The lowercase tag for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pilgrim => "pilgrim",
            Self::Volunteer => "volunteer",
            Self::Authority => "authority",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Someone to call once an SOS has been raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Stable identifier within the owning actor.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Phone number as entered.
    pub phone: String,
}

impl EmergencyContact {
    /// Create a new contact.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// A `tel:` URI for handing the call off to the OS dialer.
    #[must_use]
    pub fn dial_uri(&self) -> String {
        let digits: String = self
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("tel:{digits}")
    }
}

/// Lifecycle status of a recorded SOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SosStatus {
    /// The alert was sent out.
    Broadcasted,
    /// Someone acknowledged the alert.
    Responded,
    /// The emergency is over.
    Resolved,
}

impl std::fmt::Display for SosStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Broadcasted => write!(f, "broadcasted"),
            Self::Responded => write!(f, "responded"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// A historical SOS. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosRecord {
    /// Unique identifier.
    pub id: String,
    /// When the SOS was raised.
    pub timestamp: DateTime<Utc>,
    /// Status at the time of recording.
    pub status: SosStatus,
    /// Optional free-text message attached by the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SosRecord {
    /// Record a freshly broadcast SOS, stamped now.
    #[must_use]
    pub fn broadcast(message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            status: SosStatus::Broadcasted,
            message,
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    pub id: String,
    /// Name shown in the header and profile.
    pub display_name: String,
    /// Which dashboard this actor gets.
    pub role: Role,
    /// Avatar image reference (URL or asset key).
    pub avatar: String,
    /// Ordered list of people to call during an SOS.
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    /// Ordered SOS history, oldest first.
    #[serde(default)]
    pub sos_history: Vec<SosRecord>,
    /// Role-specific settings.
    #[serde(default)]
    pub settings: RoleSettings,
}

impl Actor {
    /// Create an actor with empty contacts, history and settings.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        let id = id.into();
        Self {
            avatar: format!("avatars/{id}.png"),
            id,
            display_name: display_name.into(),
            role,
            emergency_contacts: Vec::new(),
            sos_history: Vec::new(),
            settings: RoleSettings::new(),
        }
    }

    /// Replace the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Replace the emergency contact list.
    #[must_use]
    pub fn with_contacts(mut self, contacts: Vec<EmergencyContact>) -> Self {
        self.emergency_contacts = contacts;
        self
    }

    /// Replace the SOS history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<SosRecord>) -> Self {
        self.sos_history = history;
        self
    }

    /// Replace the role settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RoleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The most recent SOS, if any.
    #[must_use]
    pub fn last_sos(&self) -> Option<&SosRecord> {
        self.sos_history.last()
    }
}

/// A partial profile edit.
///
/// Unset fields are left untouched. Collections are replaced wholesale, so
/// callers build the full replacement list themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorUpdate {
    /// New display name.
    pub display_name: Option<String>,
    /// New avatar reference.
    pub avatar: Option<String>,
    /// Full replacement contact list.
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
    /// Full replacement settings bag.
    pub settings: Option<RoleSettings>,
}

impl ActorUpdate {
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the avatar reference.
    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Replace the contact list.
    #[must_use]
    pub fn emergency_contacts(mut self, contacts: Vec<EmergencyContact>) -> Self {
        self.emergency_contacts = Some(contacts);
        self
    }

    /// Replace the settings bag.
    #[must_use]
    pub fn settings(mut self, settings: RoleSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Check whether this update would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.avatar.is_none()
            && self.emergency_contacts.is_none()
            && self.settings.is_none()
    }

    /// Merge into `actor`, leaving unset fields alone.
    pub(crate) fn apply(self, actor: &mut Actor) {
        if let Some(name) = self.display_name {
            actor.display_name = name;
        }
        if let Some(avatar) = self.avatar {
            actor.avatar = avatar;
        }
        if let Some(contacts) = self.emergency_contacts {
            actor.emergency_contacts = contacts;
        }
        if let Some(settings) = self.settings {
            actor.settings = settings;
        }
    }
}
