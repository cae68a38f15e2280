//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use awc_config::ConfigError;
use awc_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(awc::connection_failed),
        help(
            "Check that the portal is reachable.\n\
             Reason: {reason}\n\
             Override the URL with --portal or [portal] url in the config file."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(awc::timeout),
        help("Raise `timeout` in the [portal] config section or check portal responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not signed in")]
    #[diagnostic(
        code(awc::not_signed_in),
        help(
            "Provide a session token with --token or AWC_TOKEN,\n\
             or store one with: awc config set-token"
        )
    )]
    NotSignedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(awc::auth_failed),
        help("The session token was rejected. Sign in again and run: awc config set-token")
    )]
    AuthFailed { message: String },

    #[error("Access denied: {message}")]
    #[diagnostic(code(awc::permission_denied))]
    PermissionDenied { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(awc::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(awc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(awc::config),
        help("Inspect the effective settings with: awc config show")
    )]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(awc::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(awc::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(awc::toml))]
    Toml(#[from] toml::ser::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotSignedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<&CoreError> for CliError {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => Self::NotSignedIn,

            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                message: message.clone(),
            },

            CoreError::PermissionDenied { message } => Self::PermissionDenied {
                message: message.clone(),
            },

            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url: url.clone(),
                reason: reason.clone(),
            },

            CoreError::Timeout => Self::Timeout,

            CoreError::Api { message, code, .. } => Self::ApiError {
                code: code.clone().unwrap_or_else(|| "api".into()),
                message: message.clone(),
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message.clone(),
            },

            CoreError::Internal(message) => Self::ApiError {
                code: "internal".into(),
                message: message.clone(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}
