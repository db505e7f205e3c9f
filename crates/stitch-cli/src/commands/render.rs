//! Implementation of the `stitch render` command.

use std::path::Path;

use tracing::{debug, instrument};

use stitch_adapters::LocalFilesystem;
use stitch_core::application::{EngineOptions, ViewEngine};
use stitch_core::domain::Scope;
use stitch_core::error::StitchError;

use crate::{
    cli::{GlobalArgs, RenderArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(view = %args.view))]
pub fn execute(
    args: RenderArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let scope = load_scope(&args)?;
    let root = config.views_root(global.views.as_deref())?;
    debug!(root = %root.display(), keys = scope.len(), "rendering");

    let engine = ViewEngine::new(
        EngineOptions::new(root).with_default_extension(config.views.extension.clone()),
        Box::new(LocalFilesystem::new()),
    );

    let rendered = if Path::new(&args.view).is_absolute() {
        engine.render(&args.view, &scope)
    } else {
        engine.render_view(&args.view, &scope)
    };
    let html = rendered.with_cli_context(|| format!("rendering {}", args.view))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_cli_context(|| format!("writing {}", path.display()))?;
            output.success(&format!("Rendered {} to {}", args.view, path.display()))?;
        }
        None => output.emit(&html)?,
    }

    Ok(())
}

/// Scope from `--scope` or `--scope-file`; empty when neither is given.
fn load_scope(args: &RenderArgs) -> CliResult<Scope> {
    let text = match (&args.scope, &args.scope_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_cli_context(|| format!("reading scope file {}", path.display()))?,
        (None, None) => return Ok(Scope::new()),
    };
    parse_scope(&text)
}

fn parse_scope(text: &str) -> CliResult<Scope> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CliError::InvalidInput {
            message: format!("scope is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;
    Scope::from_json(value).map_err(|e| CliError::Core(StitchError::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_scope() {
        let scope = parse_scope(r#"{"title":"Home","n":2}"#).unwrap();
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.get("title"), Some(&serde_json::json!("Home")));
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        assert!(matches!(
            parse_scope("{title:"),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn non_object_scope_is_rejected() {
        let err = parse_scope("[1,2]").unwrap_err();
        assert!(matches!(err, CliError::Core(StitchError::Domain(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_scope_flags_give_empty_scope() {
        let args = RenderArgs {
            view: "index".into(),
            scope: None,
            scope_file: None,
            output: None,
        };
        assert!(load_scope(&args).unwrap().is_empty());
    }
}
