//! Church assistant command handler.

use serde::Serialize;

use crate::cli::{AskArgs, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Answer<'a> {
    prompt: &'a str,
    reply: String,
}

pub async fn handle(ctx: &Context, args: AskArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let assistant = ctx.assistant()?;
    if !assistant.is_enabled() {
        output::print_status(
            "Assistant not configured; set [assistant] api_key or api_key_env",
            global.quiet,
        );
    }

    let prompt = args.prompt.join(" ");
    let answer = Answer {
        reply: assistant.ask(&prompt).await,
        prompt: &prompt,
    };
    let out = output::render_single(
        &global.output,
        &answer,
        |a| a.reply.clone(),
        |a| a.reply.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
