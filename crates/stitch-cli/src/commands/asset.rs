//! Implementation of the `stitch asset` command.
//!
//! Answers a request path the way a host's static-file middleware would,
//! which makes it handy for checking what a rewritten URI points at.

use tracing::{debug, instrument};

use stitch_adapters::LocalFilesystem;
use stitch_core::application::AssetPassthrough;

use crate::{
    cli::{AssetArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.request_path))]
pub fn execute(
    args: AssetArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = config.views_root(global.views.as_deref())?;
    let assets = AssetPassthrough::new(root, Box::new(LocalFilesystem::new()));

    let asset = assets.handle(&args.request_path, Ok, |reason| {
        Err(CliError::AssetDeclined {
            path: args.request_path.clone(),
            reason,
        })
    })?;
    debug!(content_type = asset.content_type, bytes = asset.bytes.len(), "asset found");

    match &args.output {
        Some(path) => {
            std::fs::write(path, &asset.bytes)
                .with_cli_context(|| format!("writing {}", path.display()))?;
            output.success(&format!(
                "Wrote {} ({}, {} bytes)",
                path.display(),
                asset.content_type,
                asset.bytes.len()
            ))?;
        }
        None => output.emit_bytes(&asset.bytes)?,
    }

    Ok(())
}
