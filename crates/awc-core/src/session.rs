// ── Session context ──
//
// The signed-in user, as supplied by the identity provider. Passed
// explicitly into every guard and feed constructor.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::access::Role;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// `None` when the provider reported a role this client does not know.
    pub role: Option<Role>,
    /// Ministries a ministry leader is responsible for.
    #[serde(default)]
    pub ministry_scopes: Vec<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role,
            ministry_scopes: Vec::new(),
        }
    }

    /// Build from a provider-supplied role string; unknown names yield no role.
    pub fn with_role_name(id: impl Into<String>, name: impl Into<String>, role: &str) -> Self {
        Self::new(id, name, Role::parse(role))
    }
}

/// Explicit session context: who is signed in, and the bearer token for
/// portal requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<CurrentUser>,
    pub token: Option<SecretString>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: CurrentUser, token: SecretString) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role)
    }

    /// Whether the signed-in user holds a staff-portal role.
    pub fn is_staff(&self) -> bool {
        self.role().is_some_and(Role::is_staff)
    }

    pub fn ministry_scopes(&self) -> &[String] {
        self.user
            .as_ref()
            .map(|u| u.ministry_scopes.as_slice())
            .unwrap_or_default()
    }
}
