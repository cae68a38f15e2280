//! Shared configuration for AWC-Connect tools.
//!
//! One TOML file merged with `AWC_`-prefixed environment variables,
//! credential resolution (env var, system keyring, plaintext) and
//! translation into the `awc_core` runtime configs and [`Session`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use awc_core::{
    AssistantConfig, CurrentUser, FeedIntervals, PortalConfig, Role, Session, TlsVerification,
    VideoConfig,
};

/// Service name for every keyring entry this crate reads or writes.
pub const KEYRING_SERVICE: &str = "awc-connect";

/// Keyring account holding the portal bearer token.
pub const TOKEN_ACCOUNT: &str = "portal/token";
const VIDEO_KEY_ACCOUNT: &str = "video/api-key";
const ASSISTANT_KEY_ACCOUNT: &str = "assistant/api-key";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub polling: PollingSection,

    #[serde(default)]
    pub video: VideoSection,

    #[serde(default)]
    pub assistant: AssistantSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PortalSection {
    /// Portal origin (e.g., "https://connect.example.church").
    #[serde(default = "default_portal_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid certificates (staging portals).
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            url: default_portal_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

/// Who is signed in. The identity provider is external; these values are
/// what it reported at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role name as issued by the provider (e.g., "ministry_leader").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ministry_scopes: Vec<String>,

    /// Bearer token (plaintext; prefer keyring or `token_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

/// Base poll intervals, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingSection {
    #[serde(default = "default_staff_notifications")]
    pub staff_notifications: u64,

    #[serde(default = "default_member_notifications")]
    pub member_notifications: u64,

    #[serde(default = "default_staff_chat")]
    pub staff_chat: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff: u64,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            staff_notifications: default_staff_notifications(),
            member_notifications: default_member_notifications(),
            staff_chat: default_staff_chat(),
            max_backoff: default_max_backoff(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoSection {
    #[serde(default = "default_video_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// API key (plaintext; prefer keyring or `api_key_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_live_ttl")]
    pub live_ttl: u64,

    #[serde(default = "default_list_ttl")]
    pub list_ttl: u64,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_video_timeout")]
    pub timeout: u64,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            base_url: default_video_url(),
            channel_id: None,
            api_key: None,
            api_key_env: None,
            live_ttl: default_live_ttl(),
            list_ttl: default_list_ttl(),
            max_results: default_max_results(),
            timeout: default_video_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssistantSection {
    #[serde(default = "default_assistant_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            base_url: default_assistant_url(),
            model: default_model(),
            api_key: None,
            api_key_env: None,
            timeout: default_timeout(),
        }
    }
}

fn default_portal_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_staff_notifications() -> u64 {
    20
}
fn default_member_notifications() -> u64 {
    45
}
fn default_staff_chat() -> u64 {
    15
}
fn default_max_backoff() -> u64 {
    60
}
fn default_video_url() -> String {
    "https://www.googleapis.com/youtube/v3/".into()
}
fn default_live_ttl() -> u64 {
    60
}
fn default_list_ttl() -> u64 {
    600
}
fn default_max_results() -> u32 {
    12
}
fn default_video_timeout() -> u64 {
    15
}
fn default_assistant_url() -> String {
    "https://generativelanguage.googleapis.com/".into()
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("church", "awc", "awc-connect").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("awc-connect");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment keys nest on double underscores:
/// `AWC_PORTAL__URL`, `AWC_SESSION__ROLE`, `AWC_POLLING__STAFF_CHAT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AWC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Secrets resolved once per invocation. `None` means not configured.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub token: Option<SecretString>,
    pub video_api_key: Option<SecretString>,
    pub assistant_api_key: Option<SecretString>,
}

impl Credentials {
    /// Walk the chain for each secret: env var, keyring, plaintext.
    pub fn resolve(cfg: &Config) -> Self {
        Self {
            token: resolve_secret(
                cfg.session.token_env.as_deref(),
                TOKEN_ACCOUNT,
                cfg.session.token.as_deref(),
            ),
            video_api_key: resolve_secret(
                cfg.video.api_key_env.as_deref(),
                VIDEO_KEY_ACCOUNT,
                cfg.video.api_key.as_deref(),
            ),
            assistant_api_key: resolve_secret(
                cfg.assistant.api_key_env.as_deref(),
                ASSISTANT_KEY_ACCOUNT,
                cfg.assistant.api_key.as_deref(),
            ),
        }
    }
}

/// Resolve one secret. Blank values count as missing at every step.
pub fn resolve_secret(
    env_name: Option<&str>,
    account: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Named env var
    if let Some(name) = env_name {
        if let Ok(val) = std::env::var(name) {
            if !val.trim().is_empty() {
                return Some(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    match keyring::Entry::new(KEYRING_SERVICE, account).and_then(|e| e.get_password()) {
        Ok(secret) if !secret.trim().is_empty() => return Some(SecretString::from(secret)),
        Ok(_) | Err(keyring::Error::NoEntry) => {}
        Err(e) => debug!(account, error = %e, "keyring lookup failed"),
    }

    // 3. Plaintext in config
    plaintext
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::from(s.to_owned()))
}

/// Store the portal bearer token in the system keyring.
pub fn store_token(token: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, TOKEN_ACCOUNT)?.set_password(token)?;
    Ok(())
}

// ── Translation to core configs ─────────────────────────────────────

impl Config {
    pub fn portal_config(&self) -> Result<PortalConfig, ConfigError> {
        let url = parse_url("portal.url", &self.portal.url)?;
        let tls = if self.portal.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.portal.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };
        Ok(PortalConfig {
            url,
            tls,
            timeout: Duration::from_secs(self.portal.timeout),
        })
    }

    /// Feed intervals; zero values are rejected.
    pub fn feed_intervals(&self) -> Result<FeedIntervals, ConfigError> {
        let p = &self.polling;
        Ok(FeedIntervals {
            staff_notifications: positive_secs("polling.staff_notifications", p.staff_notifications)?,
            member_notifications: positive_secs(
                "polling.member_notifications",
                p.member_notifications,
            )?,
            staff_chat: positive_secs("polling.staff_chat", p.staff_chat)?,
            max_backoff: positive_secs("polling.max_backoff", p.max_backoff)?,
        })
    }

    pub fn video_config(&self, creds: &Credentials) -> Result<VideoConfig, ConfigError> {
        let v = &self.video;
        let mut config = VideoConfig::new(parse_url("video.base_url", &v.base_url)?);
        config.api_key.clone_from(&creds.video_api_key);
        config.channel_id.clone_from(&v.channel_id);
        config.live_ttl = Duration::from_secs(v.live_ttl);
        config.list_ttl = Duration::from_secs(v.list_ttl);
        config.max_results = v.max_results;
        config.timeout = Duration::from_secs(v.timeout);
        Ok(config)
    }

    pub fn assistant_config(&self, creds: &Credentials) -> Result<AssistantConfig, ConfigError> {
        let a = &self.assistant;
        if a.model.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "assistant.model".into(),
                reason: "must not be empty".into(),
            });
        }
        let mut config = AssistantConfig::new(
            parse_url("assistant.base_url", &a.base_url)?,
            a.model.trim(),
        );
        config.api_key.clone_from(&creds.assistant_api_key);
        config.timeout = Duration::from_secs(a.timeout);
        Ok(config)
    }

    /// Session context. Without a token nobody is signed in.
    pub fn session(&self, creds: &Credentials) -> Session {
        let Some(token) = creds.token.clone() else {
            return Session::anonymous();
        };
        let s = &self.session;
        let mut user = CurrentUser::new(
            s.user_id.clone().unwrap_or_default(),
            s.name.clone().unwrap_or_default(),
            s.role.as_deref().and_then(Role::parse),
        );
        user.email.clone_from(&s.email);
        user.ministry_scopes.clone_from(&s.ministry_scopes);
        Session::signed_in(user, token)
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::from(s.to_owned()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.polling, PollingSection::default());
        assert_eq!(cfg.video.live_ttl, 60);
        assert_eq!(cfg.video.list_ttl, 600);
        assert_eq!(cfg.assistant.model, "gemini-1.5-flash");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[portal]
url = "https://connect.example.church"
insecure = true

[session]
user_id = "u42"
name = "Grace"
role = "ministry_leader"
ministry_scopes = ["youth"]

[polling]
staff_chat = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.portal.url, "https://connect.example.church");
        assert_eq!(cfg.polling.staff_chat, 5);
        assert_eq!(cfg.polling.staff_notifications, 20);

        let portal = cfg.portal_config().unwrap();
        assert_eq!(portal.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(portal.timeout, Duration::from_secs(30));
    }

    #[test]
    fn save_then_load_preserves_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.session.role = Some("pastor".into());
        cfg.video.channel_id = Some("UC-church".into());

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = Config::default();
        cfg.polling.member_notifications = 0;
        assert!(matches!(
            cfg.feed_intervals(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.member_notifications"
        ));
    }

    #[test]
    fn bad_portal_url_is_a_validation_error() {
        let mut cfg = Config::default();
        cfg.portal.url = "not a url".into();
        assert!(matches!(
            cfg.portal_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn session_requires_a_token() {
        let mut cfg = Config::default();
        cfg.session.role = Some("admin".into());
        assert!(!cfg.session(&Credentials::default()).is_authenticated());

        let creds = Credentials {
            token: secret("tok"),
            ..Credentials::default()
        };
        let session = cfg.session(&creds);
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.token.unwrap().expose_secret(), "tok");
    }

    #[test]
    fn unknown_role_signs_in_without_a_role() {
        let mut cfg = Config::default();
        cfg.session.role = Some("archbishop".into());
        let creds = Credentials {
            token: secret("tok"),
            ..Credentials::default()
        };
        let session = cfg.session(&creds);
        assert!(session.is_authenticated());
        assert_eq!(session.role(), None);
        assert!(!session.is_staff());
    }

    #[test]
    fn service_keys_flow_into_core_configs() {
        let mut cfg = Config::default();
        cfg.video.channel_id = Some("UC-church".into());
        let creds = Credentials {
            video_api_key: secret("yt"),
            ..Credentials::default()
        };

        let video = cfg.video_config(&creds).unwrap();
        assert!(video.client().unwrap().is_some());
        assert_eq!(video.list_ttl, Duration::from_secs(600));

        let assistant = cfg.assistant_config(&creds).unwrap();
        assert!(assistant.client().unwrap().is_none());
    }

    #[test]
    fn plaintext_secret_is_last_resort() {
        let resolved = resolve_secret(
            Some("AWC_TEST_SURELY_UNSET_VAR"),
            "test/unused-account",
            Some("plain"),
        );
        assert_eq!(resolved.unwrap().expose_secret(), "plain");
        assert!(resolve_secret(None, "test/unused-account", Some("  ")).is_none());
    }
}
