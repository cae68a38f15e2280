// ── Field visibility ──
//
// Which personal-data fields of a member record each role may see.

use serde::{Deserialize, Serialize};

use super::Role;

/// Per-field visibility flags for member data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibility {
    pub email: bool,
    pub phone: bool,
    pub address: bool,
    pub notes: bool,
    pub financial_info: bool,
    pub sensitive_data: bool,
    pub media_consent: bool,
}

impl FieldVisibility {
    /// Everything visible.
    pub const ALL: Self = Self {
        email: true,
        phone: true,
        address: true,
        notes: true,
        financial_info: true,
        sensitive_data: true,
        media_consent: true,
    };

    /// Nothing visible.
    pub const NONE: Self = Self {
        email: false,
        phone: false,
        address: false,
        notes: false,
        financial_info: false,
        sensitive_data: false,
        media_consent: false,
    };

    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Admin | Role::Pastor => Self::ALL,
            Role::Staff => Self {
                email: true,
                phone: true,
                address: true,
                media_consent: true,
                ..Self::NONE
            },
            Role::Finance => Self {
                email: true,
                phone: true,
                address: true,
                financial_info: true,
                ..Self::NONE
            },
            Role::MinistryLeader => Self {
                email: true,
                phone: true,
                media_consent: true,
                ..Self::NONE
            },
            Role::CheckinTeam => Self {
                phone: true,
                media_consent: true,
                ..Self::NONE
            },
            Role::Volunteer | Role::Member | Role::Guest => Self::NONE,
        }
    }

    /// Copy of `record` with every hidden field blanked.
    pub fn redact(&self, record: &MemberRecord) -> MemberRecord {
        MemberRecord {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone().filter(|_| self.email),
            phone: record.phone.clone().filter(|_| self.phone),
            address: record.address.clone().filter(|_| self.address),
            notes: record.notes.clone().filter(|_| self.notes),
            giving_summary: record
                .giving_summary
                .clone()
                .filter(|_| self.financial_info),
            safeguarding: record.safeguarding.clone().filter(|_| self.sensitive_data),
            media_consent: record.media_consent.filter(|_| self.media_consent),
        }
    }
}

pub fn get_field_visibility(role: Role) -> FieldVisibility {
    FieldVisibility::for_role(role)
}

/// Member directory entry as shown in the staff portal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub giving_summary: Option<String>,
    pub safeguarding: Option<String>,
    pub media_consent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record() -> MemberRecord {
        MemberRecord {
            id: "m1".into(),
            name: "Jo Bloggs".into(),
            email: Some("jo@example.org".into()),
            phone: Some("555-0100".into()),
            address: Some("1 Church Lane".into()),
            notes: Some("Prefers evening calls".into()),
            giving_summary: Some("Monthly".into()),
            safeguarding: Some("DBS checked".into()),
            media_consent: Some(true),
        }
    }

    #[test]
    fn checkin_team_sees_phone_not_email() {
        let vis = get_field_visibility(Role::CheckinTeam);
        assert!(!vis.email);
        assert!(vis.phone);
    }

    #[test]
    fn admin_and_pastor_see_everything() {
        assert_eq!(get_field_visibility(Role::Admin), FieldVisibility::ALL);
        assert_eq!(get_field_visibility(Role::Pastor), FieldVisibility::ALL);
    }

    #[test]
    fn members_see_nothing() {
        assert_eq!(get_field_visibility(Role::Member), FieldVisibility::NONE);
        assert_eq!(get_field_visibility(Role::Guest), FieldVisibility::NONE);
    }

    #[test]
    fn finance_redaction_keeps_giving_only() {
        let redacted = get_field_visibility(Role::Finance).redact(&record());
        assert_eq!(
            redacted,
            MemberRecord {
                notes: None,
                safeguarding: None,
                media_consent: None,
                ..record()
            }
        );
    }

    #[test]
    fn checkin_redaction() {
        let redacted = get_field_visibility(Role::CheckinTeam).redact(&record());
        assert_eq!(redacted.name, "Jo Bloggs");
        assert_eq!(redacted.email, None);
        assert_eq!(redacted.phone.as_deref(), Some("555-0100"));
        assert_eq!(redacted.media_consent, Some(true));
        assert_eq!(redacted.giving_summary, None);
    }
}
