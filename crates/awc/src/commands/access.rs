//! Access command handlers: the role tables, queried by name.
//!
//! Role and permission names come straight from the command line and go
//! through the string entry points, so unknown names are simply denied.

use serde::Serialize;
use tabled::Tabled;

use awc_core::access::{self, by_name};
use awc_core::{FieldVisibility, Guard, GuardDecision, NavItem, Permission, Role};

use crate::cli::{AccessArgs, AccessCommand, GlobalOpts, OutputFormat};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Answers ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Verdict<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    allowed: bool,
}

#[derive(Serialize)]
struct FlatNav {
    depth: usize,
    id: String,
    label: String,
    path: String,
    permission: Option<Permission>,
    roles: Vec<Role>,
}

fn flatten(items: &[NavItem], depth: usize, out: &mut Vec<FlatNav>) {
    for item in items {
        out.push(FlatNav {
            depth,
            id: item.id.clone(),
            label: item.label.clone(),
            path: item.path.clone(),
            permission: item.permission,
            roles: item.roles.clone(),
        });
        flatten(&item.children, depth + 1, out);
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct NavRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Requires")]
    requires: String,
}

impl From<&FlatNav> for NavRow {
    fn from(n: &FlatNav) -> Self {
        let requires = match (n.permission, n.roles.is_empty()) {
            (Some(p), true) => p.to_string(),
            (Some(p), false) => format!("{p} ({})", role_list(&n.roles)),
            (None, false) => role_list(&n.roles),
            (None, true) => "staff".into(),
        };
        Self {
            label: format!("{}{}", "  ".repeat(n.depth), n.label),
            path: n.path.clone(),
            requires,
        }
    }
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Tabled)]
struct PermissionRow {
    #[tabled(rename = "Permission")]
    permission: String,
}

fn field_pairs(v: &FieldVisibility) -> [(&'static str, bool); 7] {
    [
        ("email", v.email),
        ("phone", v.phone),
        ("address", v.address),
        ("notes", v.notes),
        ("financial_info", v.financial_info),
        ("sensitive_data", v.sensitive_data),
        ("media_consent", v.media_consent),
    ]
}

fn decision_detail(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Render => "render".into(),
        GuardDecision::Redirect { to } => format!("redirect -> {to}"),
        GuardDecision::Fallback(denied) => format!("fallback: {}", denied.message),
    }
}

fn decision_kind(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Render => "render".into(),
        GuardDecision::Redirect { .. } => "redirect".into(),
        GuardDecision::Fallback(_) => "fallback".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: AccessArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let out = match args.command {
        AccessCommand::Can { role, permission } => {
            let answer = Verdict {
                allowed: by_name::has_permission(&role, &permission),
                role: &role,
                permission: Some(&permission),
                path: None,
            };
            output::render_single(
                &global.output,
                &answer,
                |a| output::verdict(a.allowed, color),
                |a| a.allowed.to_string(),
            )?
        }

        AccessCommand::Path { role, path } => {
            let answer = Verdict {
                allowed: by_name::can_access_path(&role, &path),
                role: &role,
                permission: None,
                path: Some(&path),
            };
            output::render_single(
                &global.output,
                &answer,
                |a| output::verdict(a.allowed, color),
                |a| a.allowed.to_string(),
            )?
        }

        AccessCommand::Fields { role } => {
            let visibility = by_name::get_field_visibility(&role);
            output::render_single(
                &global.output,
                &visibility,
                |v| {
                    field_pairs(v)
                        .iter()
                        .map(|(name, shown)| format!("{name:<16}{}", output::check(*shown)))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                |v| {
                    field_pairs(v)
                        .iter()
                        .filter(|(_, shown)| *shown)
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?
        }

        AccessCommand::Permissions { role } => {
            let granted = Role::parse(&role)
                .map(access::permissions_for)
                .unwrap_or_default();
            output::render_list(
                &global.output,
                granted,
                |p| PermissionRow {
                    permission: p.to_string(),
                },
                ToString::to_string,
            )?
        }

        AccessCommand::Nav { role, scopes } => {
            let nav = by_name::get_nav_for_role(&role, &scopes);
            if matches!(global.output, OutputFormat::Table | OutputFormat::Plain) {
                let mut flat = Vec::new();
                flatten(&nav, 0, &mut flat);
                output::render_list(&global.output, &flat, |n| NavRow::from(n), |n| n.path.clone())?
            } else {
                output::render_single(&global.output, &nav, |_| String::new(), |_| String::new())?
            }
        }

        AccessCommand::Check { path, fallback } => {
            let ctx = Context::resolve(global)?;
            let mut guard = Guard::for_path(path);
            if let Some(fallback) = fallback {
                guard = guard.with_fallback_path(fallback);
            }
            let decision = guard.check(&ctx.session);
            output::render_single(&global.output, &decision, decision_detail, decision_kind)?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
