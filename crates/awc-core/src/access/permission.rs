// ── Permission table ──
//
// Role -> permission set, fixed at compile time.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::Role;

/// Fine-grained capability checked independently of role.
///
/// Wire names use `resource:action` form (`finance:read`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Permission {
    #[strum(serialize = "members:read")]
    #[serde(rename = "members:read")]
    MembersRead,
    #[strum(serialize = "members:write")]
    #[serde(rename = "members:write")]
    MembersWrite,
    #[strum(serialize = "notes:read")]
    #[serde(rename = "notes:read")]
    NotesRead,
    #[strum(serialize = "notes:write")]
    #[serde(rename = "notes:write")]
    NotesWrite,
    #[strum(serialize = "finance:read")]
    #[serde(rename = "finance:read")]
    FinanceRead,
    #[strum(serialize = "finance:write")]
    #[serde(rename = "finance:write")]
    FinanceWrite,
    #[strum(serialize = "checkin:manage")]
    #[serde(rename = "checkin:manage")]
    CheckinManage,
    #[strum(serialize = "events:manage")]
    #[serde(rename = "events:manage")]
    EventsManage,
    #[strum(serialize = "ministries:manage")]
    #[serde(rename = "ministries:manage")]
    MinistriesManage,
    #[strum(serialize = "media:manage")]
    #[serde(rename = "media:manage")]
    MediaManage,
    #[strum(serialize = "chat:access")]
    #[serde(rename = "chat:access")]
    ChatAccess,
    #[strum(serialize = "reports:read")]
    #[serde(rename = "reports:read")]
    ReportsRead,
    #[strum(serialize = "settings:manage")]
    #[serde(rename = "settings:manage")]
    SettingsManage,
    #[strum(serialize = "users:manage")]
    #[serde(rename = "users:manage")]
    UsersManage,
    #[strum(serialize = "sensitive:read")]
    #[serde(rename = "sensitive:read")]
    SensitiveRead,
}

impl Permission {
    /// Parse a wire name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}

use Permission as P;

const ADMIN: &[Permission] = &[
    P::MembersRead,
    P::MembersWrite,
    P::NotesRead,
    P::NotesWrite,
    P::FinanceRead,
    P::FinanceWrite,
    P::CheckinManage,
    P::EventsManage,
    P::MinistriesManage,
    P::MediaManage,
    P::ChatAccess,
    P::ReportsRead,
    P::SettingsManage,
    P::UsersManage,
    P::SensitiveRead,
];

const PASTOR: &[Permission] = &[
    P::MembersRead,
    P::MembersWrite,
    P::NotesRead,
    P::NotesWrite,
    P::FinanceRead,
    P::FinanceWrite,
    P::CheckinManage,
    P::EventsManage,
    P::MinistriesManage,
    P::MediaManage,
    P::ChatAccess,
    P::ReportsRead,
    P::SensitiveRead,
];

const STAFF: &[Permission] = &[
    P::MembersRead,
    P::MembersWrite,
    P::CheckinManage,
    P::EventsManage,
    P::MediaManage,
    P::ChatAccess,
    P::ReportsRead,
];

const FINANCE: &[Permission] = &[
    P::FinanceRead,
    P::FinanceWrite,
    P::MembersRead,
    P::ReportsRead,
    P::ChatAccess,
];

const MINISTRY_LEADER: &[Permission] = &[
    P::MembersRead,
    P::EventsManage,
    P::MinistriesManage,
    P::ChatAccess,
];

const CHECKIN_TEAM: &[Permission] = &[P::CheckinManage, P::MembersRead];

/// The fixed permission set granted to `role`.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Pastor => PASTOR,
        Role::Staff => STAFF,
        Role::Finance => FINANCE,
        Role::MinistryLeader => MINISTRY_LEADER,
        Role::CheckinTeam => CHECKIN_TEAM,
        Role::Volunteer | Role::Member | Role::Guest => &[],
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// True if `role` holds at least one of `permissions`.
pub fn has_any_permission(role: Role, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(role, *p))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn finance_reads_finance_but_not_notes() {
        assert!(has_permission(Role::Finance, Permission::FinanceRead));
        assert!(!has_permission(Role::Finance, Permission::NotesRead));
    }

    #[test]
    fn admin_holds_everything() {
        for permission in Permission::iter() {
            assert!(has_permission(Role::Admin, permission), "{permission}");
        }
    }

    #[test]
    fn pastor_cannot_manage_settings_or_users() {
        assert!(!has_permission(Role::Pastor, Permission::SettingsManage));
        assert!(!has_permission(Role::Pastor, Permission::UsersManage));
        assert!(has_permission(Role::Pastor, Permission::SensitiveRead));
    }

    #[test]
    fn staff_has_no_finance() {
        assert!(!has_permission(Role::Staff, Permission::FinanceRead));
        assert!(has_permission(Role::Staff, Permission::MembersWrite));
    }

    #[test]
    fn non_staff_roles_hold_nothing() {
        for role in [Role::Volunteer, Role::Member, Role::Guest] {
            assert!(permissions_for(role).is_empty());
        }
    }

    #[test]
    fn wire_names() {
        assert_eq!(Permission::FinanceRead.to_string(), "finance:read");
        assert_eq!(Permission::parse("checkin:manage"), Some(Permission::CheckinManage));
        assert_eq!(Permission::parse("finance"), None);
        assert_eq!(
            serde_json::to_string(&Permission::SensitiveRead).unwrap_or_default(),
            "\"sensitive:read\""
        );
    }

    #[test]
    fn any_of() {
        assert!(has_any_permission(
            Role::CheckinTeam,
            &[Permission::FinanceRead, Permission::CheckinManage]
        ));
        assert!(!has_any_permission(Role::CheckinTeam, &[]));
    }
}
