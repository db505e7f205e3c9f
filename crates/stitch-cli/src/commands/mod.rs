//! Command handlers, one module per subcommand.

pub mod asset;
pub mod completions;
pub mod config;
pub mod list;
pub mod render;

use std::path::{Component, Path};

/// `error/404.html` style display for a path relative to the views root.
pub(crate) fn display_view(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_names_use_forward_slashes() {
        assert_eq!(display_view(Path::new("error/404.html")), "error/404.html");
        assert_eq!(display_view(Path::new("index.html")), "index.html");
    }
}
