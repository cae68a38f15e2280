// ── Runtime service configuration ──
//
// These types describe *how* to reach each service. They carry credential
// data and tuning, but never touch disk: awc-config builds them from the
// config file and environment and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use awc_api::{AssistantClient, PortalClient, TlsMode, TransportConfig, VideoClient};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (staging portals with self-signed certs).
    DangerAcceptInvalid,
}

impl TlsVerification {
    fn transport(&self, timeout: Duration) -> TransportConfig {
        let tls = match self {
            Self::SystemDefaults => TlsMode::System,
            Self::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig { tls, timeout }
    }
}

// ── Portal ───────────────────────────────────────────────────────────

/// Connection settings for the portal REST API.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl PortalConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Portal client carrying `token` as its bearer credential.
    pub fn client(&self, token: Option<&SecretString>) -> Result<PortalClient, CoreError> {
        let transport = self.tls.transport(self.timeout);
        Ok(PortalClient::new(self.url.as_str(), token, &transport)?)
    }
}

/// Base intervals for the inbox feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedIntervals {
    pub staff_notifications: Duration,
    pub member_notifications: Duration,
    pub staff_chat: Duration,
    /// Backoff ceiling shared by both feeds.
    pub max_backoff: Duration,
}

impl Default for FeedIntervals {
    fn default() -> Self {
        Self {
            staff_notifications: Duration::from_secs(20),
            member_notifications: Duration::from_secs(45),
            staff_chat: Duration::from_secs(15),
            max_backoff: crate::poll::DEFAULT_MAX_INTERVAL,
        }
    }
}

// ── Video ────────────────────────────────────────────────────────────

/// Video platform settings. Missing key or channel disables the service.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub base_url: Url,
    pub api_key: Option<SecretString>,
    pub channel_id: Option<String>,
    pub live_ttl: Duration,
    pub list_ttl: Duration,
    pub max_results: u32,
    pub timeout: Duration,
}

impl VideoConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            channel_id: None,
            live_ttl: Duration::from_secs(60),
            list_ttl: Duration::from_secs(600),
            max_results: 12,
            timeout: Duration::from_secs(15),
        }
    }

    /// `None` when the key or channel is missing.
    pub fn client(&self) -> Result<Option<VideoClient>, CoreError> {
        let (Some(key), Some(channel)) = (&self.api_key, &self.channel_id) else {
            return Ok(None);
        };
        if channel.trim().is_empty() {
            return Ok(None);
        }
        let transport = TlsVerification::SystemDefaults.transport(self.timeout);
        Ok(Some(VideoClient::new(
            self.base_url.as_str(),
            key.clone(),
            channel.trim(),
            &transport,
        )?))
    }
}

// ── Assistant ────────────────────────────────────────────────────────

/// Generative assistant settings. A missing key disables the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: Url,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
}

impl AssistantConfig {
    pub fn new(base_url: Url, model: impl Into<String>) -> Self {
        Self {
            base_url,
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// `None` when no key is configured.
    pub fn client(&self) -> Result<Option<AssistantClient>, CoreError> {
        let Some(key) = &self.api_key else {
            return Ok(None);
        };
        let transport = TlsVerification::SystemDefaults.transport(self.timeout);
        Ok(Some(AssistantClient::new(
            self.base_url.as_str(),
            key,
            self.model.clone(),
            &transport,
        )?))
    }
}
