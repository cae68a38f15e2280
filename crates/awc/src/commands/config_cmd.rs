//! Config subcommand handlers.

use awc_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Copy of `cfg` with every plaintext secret masked.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    for secret in [
        &mut shown.session.token,
        &mut shown.video.api_key,
        &mut shown.assistant.api_key,
    ] {
        if secret.is_some() {
            *secret = Some(MASK.into());
        }
    }
    shown
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&config::load(global)?);
            let as_toml = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| as_toml.clone(),
                |_| as_toml.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &config::config_file(global).display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetToken { value } => {
            let token = match value {
                Some(token) => token,
                None => rpassword::prompt_password("Session token: ")?,
            };
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "cannot be empty".into(),
                });
            }
            awc_config::store_token(token)?;
            output::print_status("Session token stored in the system keyring", global.quiet);
            Ok(())
        }
    }
}
