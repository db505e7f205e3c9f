//! Resource reference rules for `src` / `href` rewriting.

use std::path::Path;

use crate::domain::paths;

/// `true` for values matching `^https?:/?/?`, i.e. anything starting with
/// `http:` or `https:`.
pub fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http:") || value.starts_with("https:")
}

/// References that are left exactly as written.
pub fn is_exempt(value: &str) -> bool {
    value.is_empty() || value.starts_with('/') || is_absolute_url(value)
}

/// Outcome of rewriting one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Empty, root-relative or absolute URL; nothing to do.
    Unchanged,
    /// New root-relative value.
    Rewritten(String),
    /// Resolves to a location outside the views root.
    OutsideRoot,
}

/// Rewrite a reference found in `template_dir` to a root-relative URL.
pub fn rewrite_reference(view_root: &Path, template_dir: &Path, value: &str) -> Rewrite {
    if is_exempt(value) {
        return Rewrite::Unchanged;
    }

    let resolved = paths::resolve(template_dir, value);
    match paths::root_relative(view_root, &resolved) {
        Some(url) => Rewrite::Rewritten(url),
        None => Rewrite::OutsideRoot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_detection() {
        assert!(is_absolute_url("http://example.com"));
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("https:example.com"));
        assert!(!is_absolute_url("httpx://example.com"));
        assert!(!is_absolute_url("ftp://example.com"));
        assert!(!is_absolute_url("img/http.png"));
    }

    #[test]
    fn relative_references_become_root_relative() {
        assert_eq!(
            rewrite_reference(Path::new("/views"), Path::new("/views/sub"), "img/pic.png"),
            Rewrite::Rewritten("/sub/img/pic.png".into())
        );
        assert_eq!(
            rewrite_reference(Path::new("/views"), Path::new("/views/sub"), "../app.css"),
            Rewrite::Rewritten("/app.css".into())
        );
    }

    #[test]
    fn exempt_references_are_untouched() {
        let root = Path::new("/views");
        for value in ["", "/abs/pic.png", "https://cdn.example/x.js"] {
            assert_eq!(rewrite_reference(root, root, value), Rewrite::Unchanged);
        }
    }

    #[test]
    fn escaping_the_root_is_reported() {
        assert_eq!(
            rewrite_reference(Path::new("/views"), Path::new("/views"), "../secret.png"),
            Rewrite::OutsideRoot
        );
    }
}
