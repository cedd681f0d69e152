use std::io::Write;

use anyhow::Context;
use tracing::debug;

use crate::cache::CacheStore;
use crate::config::Args;
use crate::dispatcher::{DispatchError, Dispatcher};

// Shown before anything else when no prompt was given
pub fn write_hint(args: &Args, out: &mut impl Write) -> std::io::Result<()> {
    if args.is_default_prompt() {
        writeln!(out, "Use -p flag followed by your text prompt, ie -p \"tell me a dirty joke\"")?;
        writeln!(out)?;
        writeln!(out, "-=RESPONSE=-\n")?;
    }
    Ok(())
}

/// Resolve the prompt and write the response text to `out`.
///
/// When ollama answered but the cache write failed, the response is still
/// written before the error is returned.
pub async fn respond<S: CacheStore>(
    args: &Args,
    dispatcher: &Dispatcher<S>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let result = dispatcher
        .dispatch(&args.prompt, &args.model, args.cache)
        .await;

    if let Err(DispatchError::CacheWrite { response, .. }) = &result {
        writeln!(out, "{}", response.response)?;
    }
    let dispatched = result.with_context(|| format!("prompting {} failed", args.model))?;

    debug!(source = ?dispatched.source, "prompt resolved");
    writeln!(out, "{}", dispatched.text())?;
    Ok(())
}
