//! View discovery on disk.

use std::path::{Path, PathBuf};

use stitch_core::error::{StitchError, StitchResult};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

/// List every file under `root` whose extension is `extension`
/// (case-insensitive), as paths relative to `root`, sorted.
///
/// Unreadable entries below the root are skipped with a warning; a missing
/// or unreadable root is an error.
#[instrument(fields(root = %root.display()))]
pub fn list_views(root: &Path, extension: &str) -> StitchResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(StitchError::Configuration {
            message: format!("views root is not a directory: {}", root.display()),
        });
    }

    let mut views = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(StitchError::Configuration {
                    message: format!("cannot read views root {}: {e}", root.display()),
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            views.push(relative.to_path_buf());
        }
    }

    debug!(count = views.len(), "finished listing views");
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_matching_files_recursively() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("error")).unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();
        std::fs::write(dir.path().join("error/404.HTML"), "").unwrap();
        std::fs::write(dir.path().join("logo.png"), "").unwrap();

        let views = list_views(dir.path(), "html").unwrap();
        assert_eq!(
            views,
            vec![PathBuf::from("error/404.HTML"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn missing_root_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let err = list_views(&dir.path().join("absent"), "html").unwrap_err();
        assert!(matches!(err, StitchError::Configuration { .. }));
    }
}
