//! CLI configuration: thin wrapper around `awc_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --portal, --token, --role).

use std::path::PathBuf;

use secrecy::SecretString;

use awc_config::{Config, Credentials};
use awc_core::{
    Assistant, ChatUnreadFeed, Environment, NotificationFeed, PortalClient, Role, Session,
    VideoService,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(awc_config::config_path)
}

/// Load the config file plus environment, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = awc_config::load_config_from(&config_file(global))?;
    if let Some(ref url) = global.portal {
        cfg.portal.url.clone_from(url);
    }
    Ok(cfg)
}

/// Everything a portal-bound command needs.
pub struct Context {
    pub config: Config,
    pub session: Session,
    creds: Credentials,
    env: Environment,
}

impl Context {
    /// Resolve config, credentials and session. The token chain is
    /// `--token`, then the config's env var / keyring / plaintext.
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load(global)?;
        let mut creds = Credentials::resolve(&config);
        if let Some(ref token) = global.token {
            creds.token = Some(SecretString::from(token.clone()));
        }

        let mut session = config.session(&creds);
        if let Some(ref name) = global.role {
            let role = Role::parse(name).ok_or_else(|| CliError::Validation {
                field: "role".into(),
                reason: format!("unknown role '{name}'"),
            })?;
            if let Some(user) = session.user.as_mut() {
                user.role = Some(role);
            }
        }
        tracing::debug!(
            authenticated = session.is_authenticated(),
            role = ?session.role(),
            "resolved session"
        );

        Ok(Self {
            config,
            session,
            creds,
            env: Environment::new(),
        })
    }

    pub fn require_signed_in(&self) -> Result<(), CliError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotSignedIn)
        }
    }

    /// Bare portal client for one-shot writes.
    pub fn portal_client(&self) -> Result<PortalClient, CliError> {
        Ok(self.config.portal_config()?.client(self.session.token.as_ref())?)
    }

    pub fn notification_feed(&self) -> Result<NotificationFeed, CliError> {
        let client = self.portal_client()?;
        Ok(NotificationFeed::start(
            client,
            &self.session,
            &self.config.feed_intervals()?,
            &self.env,
        ))
    }

    pub fn chat_feed(&self) -> Result<ChatUnreadFeed, CliError> {
        let client = self.portal_client()?;
        Ok(ChatUnreadFeed::start(
            client,
            &self.session,
            &self.config.feed_intervals()?,
            &self.env,
        ))
    }

    pub fn video_service(&self) -> Result<VideoService, CliError> {
        Ok(VideoService::from_config(
            &self.config.video_config(&self.creds)?,
        )?)
    }

    pub fn assistant(&self) -> Result<Assistant, CliError> {
        Ok(Assistant::from_config(
            &self.config.assistant_config(&self.creds)?,
        )?)
    }
}
