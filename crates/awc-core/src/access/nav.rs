// ── Staff portal navigation ──
//
// A static tree of portal sections. `get_nav_for_role` filters (copies) it
// for one role; `can_access_path` resolves a path to the most specific
// entry and applies that entry's requirement.

use serde::Serialize;

use super::guard::Requirement;
use super::{Permission, Role};

/// Root of the staff portal. Everything below it requires a staff role.
pub const STAFF_ROOT: &str = "/staff";

const MINISTRIES_ID: &str = "ministries";

/// Static navigation entry.
#[derive(Debug)]
struct NavEntry {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    path: &'static str,
    permission: Option<Permission>,
    roles: &'static [Role],
    children: &'static [NavEntry],
}

impl NavEntry {
    const fn leaf(
        id: &'static str,
        label: &'static str,
        icon: &'static str,
        path: &'static str,
        permission: Option<Permission>,
    ) -> Self {
        Self {
            id,
            label,
            icon,
            path,
            permission,
            roles: &[],
            children: &[],
        }
    }

    fn requirement(&self) -> Requirement {
        let mut requirement = Requirement::staff();
        if let Some(permission) = self.permission {
            requirement = requirement.with_permission(permission);
        }
        requirement.with_roles(self.roles.iter().copied())
    }
}

const STAFF_NAV: &[NavEntry] = &[
    NavEntry::leaf("dashboard", "Dashboard", "layout-dashboard", "/staff", None),
    NavEntry::leaf(
        "members",
        "Members",
        "users",
        "/staff/members",
        Some(Permission::MembersRead),
    ),
    NavEntry::leaf(
        "notes",
        "Pastoral Notes",
        "notebook",
        "/staff/notes",
        Some(Permission::NotesRead),
    ),
    NavEntry {
        id: "care",
        label: "Pastoral Care",
        icon: "heart-handshake",
        path: "/staff/care",
        permission: Some(Permission::SensitiveRead),
        roles: &[Role::Admin, Role::Pastor],
        children: &[],
    },
    NavEntry {
        id: "finance",
        label: "Finance",
        icon: "wallet",
        path: "/staff/finance",
        permission: Some(Permission::FinanceRead),
        roles: &[],
        children: &[
            NavEntry::leaf(
                "finance-giving",
                "Giving",
                "hand-coins",
                "/staff/finance/giving",
                Some(Permission::FinanceRead),
            ),
            NavEntry::leaf(
                "finance-reports",
                "Statements",
                "file-spreadsheet",
                "/staff/finance/reports",
                Some(Permission::FinanceWrite),
            ),
        ],
    },
    NavEntry::leaf(
        "checkin",
        "Check-in",
        "scan-line",
        "/staff/checkin",
        Some(Permission::CheckinManage),
    ),
    NavEntry::leaf(
        "events",
        "Events",
        "calendar",
        "/staff/events",
        Some(Permission::EventsManage),
    ),
    NavEntry::leaf(
        MINISTRIES_ID,
        "Ministries",
        "church",
        "/staff/ministries",
        Some(Permission::MinistriesManage),
    ),
    NavEntry::leaf(
        "media",
        "Media",
        "video",
        "/staff/media",
        Some(Permission::MediaManage),
    ),
    NavEntry::leaf(
        "chat",
        "Staff Chat",
        "messages-square",
        "/staff/chat",
        Some(Permission::ChatAccess),
    ),
    NavEntry::leaf(
        "reports",
        "Reports",
        "chart-bar",
        "/staff/reports",
        Some(Permission::ReportsRead),
    ),
    NavEntry {
        id: "settings",
        label: "Settings",
        icon: "settings",
        path: "/staff/settings",
        permission: Some(Permission::SettingsManage),
        roles: &[],
        children: &[NavEntry::leaf(
            "settings-users",
            "Users & Roles",
            "user-cog",
            "/staff/settings/users",
            Some(Permission::UsersManage),
        )],
    },
];

/// Navigation entry as rendered for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    fn from_entry(entry: &NavEntry, children: Vec<NavItem>) -> Self {
        Self {
            id: entry.id.to_owned(),
            label: entry.label.to_owned(),
            icon: entry.icon.to_owned(),
            path: entry.path.to_owned(),
            permission: entry.permission,
            roles: entry.roles.to_vec(),
            children,
        }
    }

    fn ministry_scope(scope: &str) -> Self {
        Self {
            id: format!("{MINISTRIES_ID}-{scope}"),
            label: scope_label(scope),
            icon: "users-round".to_owned(),
            path: format!("/staff/ministries/{scope}"),
            permission: Some(Permission::MinistriesManage),
            roles: vec![Role::MinistryLeader],
            children: Vec::new(),
        }
    }
}

/// `youth-group` -> `Youth Group`.
fn scope_label(scope: &str) -> String {
    scope
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Navigation visible to `role`.
///
/// Non-staff roles get nothing. Ministry leaders get one child under
/// Ministries per entry in `ministry_scopes`; other roles ignore scopes.
pub fn get_nav_for_role(role: Role, ministry_scopes: &[String]) -> Vec<NavItem> {
    filter_entries(STAFF_NAV, role, ministry_scopes)
}

fn filter_entries(entries: &[NavEntry], role: Role, ministry_scopes: &[String]) -> Vec<NavItem> {
    entries
        .iter()
        .filter(|entry| entry.requirement().is_met_by(Some(role)))
        .map(|entry| {
            let mut children = filter_entries(entry.children, role, ministry_scopes);
            if entry.id == MINISTRIES_ID && role == Role::MinistryLeader {
                children.extend(
                    ministry_scopes
                        .iter()
                        .map(|s| s.trim())
                        .filter(|s| !s.is_empty() && !s.contains('/'))
                        .map(NavItem::ministry_scope),
                );
            }
            NavItem::from_entry(entry, children)
        })
        .collect()
}

// ── Path resolution ──────────────────────────────────────────────────

/// Canonical path for matching: query and fragment dropped, dot and empty
/// segments resolved (percent-encoded dots included), ASCII-lowercased.
fn normalize(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment.replace("%2e", ".").as_str() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Segment-aware prefix test: `/staff/finance` covers `/staff/finance/x`
/// but not `/staff/financeX`.
fn covers(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn most_specific<'a>(entries: &'a [NavEntry], path: &str) -> Option<&'a NavEntry> {
    entries
        .iter()
        .filter(|entry| covers(entry.path, path))
        .map(|entry| most_specific(entry.children, path).unwrap_or(entry))
        .max_by_key(|entry| entry.path.len())
}

/// What it takes to open `path`.
///
/// Paths outside the staff portal only need a known role. Paths inside it
/// use the most specific navigation entry covering them; anything not
/// listed falls back to the dashboard requirement (any staff role).
pub fn requirement_for_path(path: &str) -> Requirement {
    let path = normalize(path);
    if !covers(STAFF_ROOT, &path) {
        return Requirement::none();
    }
    most_specific(STAFF_NAV, &path).map_or_else(Requirement::staff, NavEntry::requirement)
}

pub fn can_access_path(role: Role, path: &str) -> bool {
    requirement_for_path(path).is_met_by(Some(role))
}
