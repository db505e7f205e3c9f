//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: `.` and `..` are folded textually and
//! symlinks are never followed, so the same input always yields the same
//! cache key and the same containment answer.

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components.
///
/// `..` never climbs above the root of an absolute path; on a relative path
/// leading `..` components are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `reference` against `base` and normalize the result.
///
/// An absolute `reference` replaces `base` entirely.
pub fn resolve(base: &Path, reference: impl AsRef<Path>) -> PathBuf {
    normalize(&base.join(reference))
}

/// Directory that relative references inside `file` resolve against.
pub fn parent_dir(file: &Path) -> &Path {
    file.parent().unwrap_or(Path::new(""))
}

/// `true` if `path` is `root` or lies beneath it, compared component-wise.
pub fn is_within(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// Render `path` with `/` separators.
pub fn to_url_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Express `path` as a `/`-prefixed URL relative to `root`.
///
/// Returns `None` when `path` falls outside `root`.
pub fn root_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = normalize(path)
        .strip_prefix(normalize(root))
        .ok()
        .map(to_url_path)?;
    Some(format!("/{relative}"))
}
