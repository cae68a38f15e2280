use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Every role the portal knows about.
///
/// Wire names are snake_case (`ministry_leader`, `checkin_team`).
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Pastor,
    Staff,
    Finance,
    MinistryLeader,
    CheckinTeam,
    Volunteer,
    Member,
    Guest,
}

impl Role {
    /// Parse a role name. Unknown names yield `None`, which every access
    /// query treats as the most restrictive case.
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().replace('-', "_").parse().ok()
    }

    /// Roles that may enter the staff portal.
    pub const fn is_staff(self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::Pastor
                | Self::Staff
                | Self::Finance
                | Self::MinistryLeader
                | Self::CheckinTeam
        )
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Pastor => "Pastor",
            Self::Staff => "Staff",
            Self::Finance => "Finance",
            Self::MinistryLeader => "Ministry Leader",
            Self::CheckinTeam => "Check-in Team",
            Self::Volunteer => "Volunteer",
            Self::Member => "Member",
            Self::Guest => "Guest",
        }
    }
}

/// Free-function form of [`Role::is_staff`].
pub fn is_staff_role(role: Role) -> bool {
    role.is_staff()
}
