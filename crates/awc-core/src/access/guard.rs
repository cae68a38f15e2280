// ── Route / UI guards ──
//
// Declarative checks over the session: redirect anonymous visitors to the
// login page, send unauthorized users to a fallback, render otherwise.

use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use super::nav::requirement_for_path;
use super::{Permission, Role, has_any_permission};
use crate::session::Session;

/// Default sign-in route.
pub const LOGIN_PATH: &str = "/login";

// ── Requirement ──────────────────────────────────────────────────────

/// What a role must satisfy. All populated conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// At least one of these permissions (ignored when empty).
    pub any_permission: Vec<Permission>,
    /// One of these roles (ignored when empty).
    pub any_role: Vec<Role>,
    /// A staff-portal role.
    pub staff_only: bool,
}

impl Requirement {
    /// Any known role.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn staff() -> Self {
        Self {
            staff_only: true,
            ..Self::default()
        }
    }

    pub fn permission(permission: Permission) -> Self {
        Self::none().with_permission(permission)
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::none().with_roles(roles)
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        if !self.any_permission.contains(&permission) {
            self.any_permission.push(permission);
        }
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            if !self.any_role.contains(&role) {
                self.any_role.push(role);
            }
        }
        self
    }

    /// Whether `role` satisfies this requirement. An unknown role (`None`)
    /// never does.
    pub fn is_met_by(&self, role: Option<Role>) -> bool {
        let Some(role) = role else {
            return false;
        };
        (!self.staff_only || role.is_staff())
            && (self.any_role.is_empty() || self.any_role.contains(&role))
            && (self.any_permission.is_empty() || has_any_permission(role, &self.any_permission))
    }
}

// ── Decisions ────────────────────────────────────────────────────────

/// Why a guard refused to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenied {
    pub path: Option<String>,
    pub role: Option<Role>,
    pub message: String,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Render,
    Redirect { to: String },
    Fallback(AccessDenied),
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

// ── Guard ────────────────────────────────────────────────────────────

/// Route or UI guard.
#[derive(Debug, Clone)]
pub struct Guard {
    requirement: Requirement,
    path: Option<String>,
    fallback_path: Option<String>,
    login_path: String,
}

impl Guard {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            path: None,
            fallback_path: None,
            login_path: LOGIN_PATH.to_owned(),
        }
    }

    /// Guard a route using the navigation table's rule for `path`.
    pub fn for_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(requirement_for_path(&path)).at(path)
    }

    /// The route being guarded, carried through the login redirect.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Redirect unauthorized users here instead of rendering a fallback.
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Route-level decision.
    pub fn check(&self, session: &Session) -> GuardDecision {
        let Some(user) = &session.user else {
            let to = self.login_redirect();
            debug!(path = ?self.path, %to, "guard: not signed in");
            return GuardDecision::Redirect { to };
        };

        if self.requirement.is_met_by(user.role) {
            return GuardDecision::Render;
        }

        debug!(path = ?self.path, role = ?user.role, "guard: access denied");
        match &self.fallback_path {
            Some(to) => GuardDecision::Redirect { to: to.clone() },
            None => GuardDecision::Fallback(self.denied(user.role)),
        }
    }

    /// UI-level decision: never redirects.
    pub fn gate(&self, session: &Session) -> GuardDecision {
        let role = session.role();
        if session.is_authenticated() && self.requirement.is_met_by(role) {
            GuardDecision::Render
        } else {
            GuardDecision::Fallback(self.denied(role))
        }
    }

    fn login_redirect(&self) -> String {
        match &self.path {
            Some(path) => {
                let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
                format!("{}?redirect={encoded}", self.login_path)
            }
            None => self.login_path.clone(),
        }
    }

    fn denied(&self, role: Option<Role>) -> AccessDenied {
        let message = match role {
            Some(role) => format!("{} access is not permitted here", role.label()),
            None => "Your account has no recognised role".to_owned(),
        };
        AccessDenied {
            path: self.path.clone(),
            role,
            message,
        }
    }
}
