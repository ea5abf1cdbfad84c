//! Fixed catalog of demo identities offered by the login surface.
//!
//! There are no credentials; signing in means picking one of these.

use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::actor::{Actor, EmergencyContact, Role, RoleSettings, SosRecord, SosStatus};
use crate::error::{Error, Result};

/// Ids of the demo identities, one per role.
pub const DEMO_IDS: [&str; 4] = ["pilgrim", "volunteer", "authority", "admin"];

fn settings(value: serde_json::Value) -> RoleSettings {
    match value {
        serde_json::Value::Object(map) => map,
        _ => RoleSettings::new(),
    }
}

fn past_record(id: &str, day: u32, status: SosStatus, message: &str) -> SosRecord {
    SosRecord {
        id: id.to_string(),
        timestamp: Utc
            .with_ymd_and_hms(2024, 6, day, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now),
        status,
        message: Some(message.to_string()),
    }
}

/// Every demo identity, in [`DEMO_IDS`] order.
#[must_use]
pub fn all() -> Vec<Actor> {
    vec![
        Actor::new("pilgrim", "Amina Rahman", Role::Pilgrim)
            .with_contacts(vec![
                EmergencyContact::new("c-1", "Yusuf Rahman", "+966 50 123 4567"),
                EmergencyContact::new("c-2", "Group leader Hafsa", "+966 55 987 6543"),
            ])
            .with_history(vec![past_record(
                "sos-2024-0614",
                14,
                SosStatus::Resolved,
                "Separated from group near Jamarat",
            )])
            .with_settings(settings(json!({
                "group_id": "GRP-112",
                "camp": "Mina 23/4",
                "share_location": true
            }))),
        Actor::new("volunteer", "Omar Siddiqui", Role::Volunteer)
            .with_contacts(vec![EmergencyContact::new(
                "c-1",
                "Volunteer coordinator",
                "+966 12 555 0101",
            )])
            .with_settings(settings(json!({
                "zone": "Arafat-North",
                "on_duty": true,
                "languages": ["ar", "en"]
            }))),
        Actor::new("authority", "Capt. Khalid Al-Harbi", Role::Authority).with_settings(
            settings(json!({
                "jurisdiction": "Mina",
                "alert_radius_km": 2
            })),
        ),
        Actor::new("admin", "Sara Haddad", Role::Admin).with_settings(settings(json!({
            "can_manage_users": true,
            "maintenance_mode": false
        }))),
    ]
}

/// Find a demo identity by id.
#[must_use]
pub fn find(id: &str) -> Option<Actor> {
    all().into_iter().find(|actor| actor.id == id)
}

/// Find a demo identity by id, failing with [`Error::UnknownIdentity`].
///
/// # Errors
///
/// Returns an error if no identity has that id.
pub fn require(id: &str) -> Result<Actor> {
    find(id).ok_or_else(|| Error::unknown_identity(id))
}
