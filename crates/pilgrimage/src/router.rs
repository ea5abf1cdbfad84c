//! Role-based dashboard dispatch.

use serde::Serialize;

use crate::actor::{Actor, Role};

/// The four mutually exclusive dashboard presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleView {
    /// Deployment administration.
    Admin,
    /// Authority command center.
    Authority,
    /// Volunteer desk.
    Volunteer,
    /// The pilgrim's own dashboard.
    Pilgrim,
}

impl RoleView {
    /// Pick the view for a role.
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Authority => Self::Authority,
            Role::Volunteer => Self::Volunteer,
            Role::Pilgrim => Self::Pilgrim,
        }
    }

    /// Pick the view for a raw role tag. Unrecognized tags get the pilgrim view.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        Role::from_tag(tag).map_or(Self::Pilgrim, Self::for_role)
    }

    /// The view for the signed-in actor, or `None` when signed out.
    #[must_use]
    pub fn for_actor(actor: Option<&Actor>) -> Option<Self> {
        actor.map(|a| Self::for_role(a.role))
    }

    /// Localization key of the dashboard title.
    #[must_use]
    pub fn title_key(self) -> &'static str {
        match self {
            Self::Admin => "dashboard.admin",
            Self::Authority => "dashboard.authority",
            Self::Volunteer => "dashboard.volunteer",
            Self::Pilgrim => "dashboard.pilgrim",
        }
    }

    /// Localization keys of the panels, top to bottom.
    #[must_use]
    pub fn panels(self) -> &'static [&'static str] {
        match self {
            Self::Admin => &["panel.user_management", "panel.system_health", "panel.active_alerts"],
            Self::Authority => &["panel.active_alerts", "panel.zone_overview", "panel.lost_found_reports"],
            Self::Volunteer => &["panel.assigned_cases", "panel.lost_found_reports", "panel.active_alerts"],
            Self::Pilgrim => &["panel.itinerary", "panel.emergency_contacts", "panel.lost_found_reports"],
        }
    }
}

impl std::fmt::Display for RoleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin view"),
            Self::Authority => write!(f, "authority view"),
            Self::Volunteer => write!(f, "volunteer view"),
            Self::Pilgrim => write!(f, "pilgrim view"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::default_bundle;

    #[test]
    fn test_each_role_gets_its_own_view() {
        assert_eq!(RoleView::for_role(Role::Admin), RoleView::Admin);
        assert_eq!(RoleView::for_role(Role::Authority), RoleView::Authority);
        assert_eq!(RoleView::for_role(Role::Volunteer), RoleView::Volunteer);
        assert_eq!(RoleView::for_role(Role::Pilgrim), RoleView::Pilgrim);
    }

    #[test]
    fn test_unknown_tag_defaults_to_pilgrim() {
        assert_eq!(RoleView::for_tag("authority"), RoleView::Authority);
        assert_eq!(RoleView::for_tag("sheikh"), RoleView::Pilgrim);
        assert_eq!(RoleView::for_tag(""), RoleView::Pilgrim);
    }

    #[test]
    fn test_for_actor() {
        let actor = Actor::new("v-1", "Omar", Role::Volunteer);
        assert_eq!(RoleView::for_actor(Some(&actor)), Some(RoleView::Volunteer));
        assert_eq!(RoleView::for_actor(None), None);
    }

    #[test]
    fn test_title_and_panel_keys_are_translated() {
        let bundle = default_bundle();
        for role in Role::ALL {
            let view = RoleView::for_role(role);
            assert!(bundle.get(view.title_key()).is_some(), "{view}");
            assert!(!view.panels().is_empty());
            for panel in view.panels() {
                assert!(bundle.get(panel).is_some(), "{panel}");
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(RoleView::Authority.to_string(), "authority view");
    }
}
