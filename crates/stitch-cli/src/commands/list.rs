//! Implementation of the `stitch list` command.

use stitch_adapters::list_views;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat, global::GlobalArgs},
    commands::display_view,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = config.views_root(global.views.as_deref())?;
    let views = list_views(&root, &config.views.extension)
        .with_cli_context(|| format!("listing {}", root.display()))?;
    let names: Vec<String> = views.iter().map(|v| display_view(v)).collect();

    // --output-format json applies to listings too.
    let format = match output.format() {
        OutputFormat::Json => ListFormat::Json,
        _ => args.format,
    };

    match format {
        ListFormat::Table => {
            output.header(&format!("Views in {}:", root.display()))?;
            if names.is_empty() {
                output.warning("no views found")?;
            }
            for name in &names {
                output.print(&format!("  {name}"))?;
            }
        }
        ListFormat::List => {
            for name in &names {
                output.emit(&format!("{name}\n"))?;
            }
        }
        // Written straight to stdout so pipes get parseable JSON even in
        // quiet mode.
        ListFormat::Json => {
            let json =
                serde_json::to_string_pretty(&names).map_err(|e| CliError::InvalidInput {
                    message: format!("failed to serialise view list: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.emit(&format!("{json}\n"))?;
        }
    }

    Ok(())
}
