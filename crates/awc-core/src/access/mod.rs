// ── Access control ──
//
// Fixed role tables (permissions, field visibility, navigation) and the
// guards composed from them. Everything here is pure and total: unknown
// role or permission names always get the most restrictive answer.

mod fields;
pub mod guard;
mod nav;
mod permission;
mod role;

pub use fields::{FieldVisibility, MemberRecord, get_field_visibility};
pub use guard::{AccessDenied, Guard, GuardDecision, Requirement};
pub use nav::{NavItem, STAFF_ROOT, can_access_path, get_nav_for_role, requirement_for_path};
pub use permission::{Permission, has_any_permission, has_permission, permissions_for};
pub use role::{Role, is_staff_role};

/// String entry points for role/permission names arriving from the session
/// provider or the command line. Unknown names are denied.
pub mod by_name {
    use super::{FieldVisibility, NavItem, Permission, Role};

    pub fn has_permission(role: &str, permission: &str) -> bool {
        match (Role::parse(role), Permission::parse(permission)) {
            (Some(role), Some(permission)) => super::has_permission(role, permission),
            _ => false,
        }
    }

    pub fn is_staff_role(role: &str) -> bool {
        Role::parse(role).is_some_and(Role::is_staff)
    }

    pub fn get_field_visibility(role: &str) -> FieldVisibility {
        Role::parse(role).map_or(FieldVisibility::NONE, FieldVisibility::for_role)
    }

    pub fn get_nav_for_role(role: &str, ministry_scopes: &[String]) -> Vec<NavItem> {
        Role::parse(role)
            .map(|role| super::get_nav_for_role(role, ministry_scopes))
            .unwrap_or_default()
    }

    pub fn can_access_path(role: &str, path: &str) -> bool {
        Role::parse(role).is_some_and(|role| super::can_access_path(role, path))
    }
}
