//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stitch",
    bin_name = "stitch",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Render HTML views with imports and #{...} placeholders",
    long_about = "Stitch renders server-side HTML views: it inlines <import> tags, \
                  evaluates #{expression} placeholders against a JSON scope and \
                  rewrites relative resource URIs to root-relative ones.",
    after_help = "EXAMPLES:\n\
        \x20 stitch --views ./views render index --scope '{\"title\":\"Home\"}'\n\
        \x20 stitch render error/404 -o public/404.html\n\
        \x20 stitch asset /img/logo.png -o logo.png\n\
        \x20 stitch list --format json\n\
        \x20 stitch completions bash > /usr/share/bash-completion/completions/stitch",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a view to HTML.
    #[command(
        visible_alias = "r",
        about = "Render a view",
        after_help = "EXAMPLES:\n\
            \x20 stitch render index\n\
            \x20 stitch render blog/post.html --scope-file post.json\n\
            \x20 stitch render /abs/path/page.html -o out.html"
    )]
    Render(RenderArgs),

    /// Fetch a file from the views root the way the asset passthrough would.
    #[command(
        about = "Serve a file from the views root",
        after_help = "EXAMPLES:\n\
            \x20 stitch asset /img/logo.png -o logo.png\n\
            \x20 stitch asset /css/site.css"
    )]
    Asset(AssetArgs),

    /// List views under the views root.
    #[command(
        visible_alias = "ls",
        about = "List available views",
        after_help = "EXAMPLES:\n\
            \x20 stitch list\n\
            \x20 stitch list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stitch completions bash > ~/.local/share/bash-completion/completions/stitch\n\
            \x20 stitch completions zsh  > ~/.zfunc/_stitch\n\
            \x20 stitch completions fish > ~/.config/fish/completions/stitch.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stitch configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stitch config get views.root\n\
            \x20 stitch config list\n\
            \x20 stitch config path"
    )]
    Config(ConfigCommands),
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `stitch render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// View to render: a name such as `error/404` (extension optional,
    /// relative to the views root) or an absolute file path.
    #[arg(value_name = "VIEW", help = "View name or file path")]
    pub view: String,

    /// Scope as an inline JSON object.
    #[arg(
        short = 's',
        long = "scope",
        value_name = "JSON",
        conflicts_with = "scope_file",
        help = "Scope as a JSON object"
    )]
    pub scope: Option<String>,

    /// Scope read from a JSON file.
    #[arg(
        long = "scope-file",
        value_name = "FILE",
        help = "Read the scope from a JSON file"
    )]
    pub scope_file: Option<PathBuf>,

    /// Write the HTML to a file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,
}

// ── asset ─────────────────────────────────────────────────────────────────────

/// Arguments for `stitch asset`.
#[derive(Debug, Args)]
pub struct AssetArgs {
    /// Request path, e.g. `/img/logo.png`.
    #[arg(value_name = "REQUEST_PATH", help = "Request path to serve")]
    pub request_path: String,

    /// Write the bytes to a file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stitch list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Header plus indented view names.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stitch completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stitch config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `views.root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_render_command() {
        let cli = Cli::parse_from(["stitch", "render", "index", "--scope", "{}"]);
        let Commands::Render(args) = cli.command else {
            panic!("expected Render command");
        };
        assert_eq!(args.view, "index");
        assert_eq!(args.scope.as_deref(), Some("{}"));
    }

    #[test]
    fn render_alias() {
        let cli = Cli::parse_from(["stitch", "r", "index"]);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn scope_and_scope_file_conflict() {
        let result = Cli::try_parse_from([
            "stitch",
            "render",
            "index",
            "--scope",
            "{}",
            "--scope-file",
            "s.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_views_after_subcommand() {
        let cli = Cli::parse_from(["stitch", "list", "--views", "site/views"]);
        assert_eq!(cli.global.views, Some(PathBuf::from("site/views")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stitch", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
