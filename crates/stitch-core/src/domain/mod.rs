// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stitch.
//!
//! Pure logic only: the markup document model, the placeholder expression
//! language, scope data and the path rules used by the processing passes.
//! Reading template files is the job of ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few external crates**: std + thiserror + serde_json (scope values)
//! - **Deterministic**: paths are normalized lexically, never canonicalized
//!
pub mod document;
pub mod error;
pub mod expression;
pub mod interpolation;
pub mod media;
pub mod paths;
pub mod scope;
pub mod uri;

// Re-exports for convenience
pub use document::{Attribute, Document, Element, Node, NodeId, NodeKind};
pub use error::{DomainError, ErrorCategory};
pub use expression::{Expr, Value};
pub use interpolation::{Placeholder, PlaceholderError};
pub use scope::Scope;
pub use uri::Rewrite;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;

    // ========================================================================
    // Interpolation + Document Tests
    // ========================================================================

    #[test]
    fn interpolated_markup_reparses() {
        let scope = Scope::new().with("cls", "hero").with("title", "Welcome");
        let doc = Document::parse("<div class=\"#{cls}\"><h1>#{title}</h1></div>").unwrap();

        let content = interpolation::interpolate(&doc.inner_html(), &scope).unwrap();
        let doc = Document::parse(&content).unwrap();

        let div = doc.select(|el| el.is("div"))[0];
        assert_eq!(doc.element(div).unwrap().attribute("class"), Some("hero"));
        assert_eq!(doc.inner_html(), "<div class=\"hero\"><h1>Welcome</h1></div>");
    }

    #[test]
    fn interpolated_markup_becomes_elements() {
        let scope = Scope::new().with("item", "<li>one</li>");
        let content = interpolation::interpolate("<ul>#{item}</ul>", &scope).unwrap();
        let doc = Document::parse(&content).unwrap();
        assert_eq!(doc.select(|el| el.is("li")).len(), 1);
    }

    #[test]
    fn one_plus_one() {
        let out = interpolation::interpolate("<p>#{1+1}</p>", &Scope::new()).unwrap();
        assert_eq!(out, "<p>2</p>");
    }

    // ========================================================================
    // Expression + Scope Tests
    // ========================================================================

    #[test]
    fn expressions_read_nested_scope() {
        let scope = Scope::from_json(json!({ "page": { "tags": ["a", "b"] } })).unwrap();
        let value = expression::evaluate("page.tags[0] + page.tags.length", &scope).unwrap();
        assert_eq!(value, Value::from("a2"));
    }

    #[test]
    fn evaluation_errors_are_categorized() {
        let err = expression::evaluate("nope", &Scope::new()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Evaluation);
        assert!(!err.suggestions().is_empty());
    }

    // ========================================================================
    // Path Rule Tests
    // ========================================================================

    #[test]
    fn rewriting_and_containment_agree() {
        let root = Path::new("/views");
        let dir = Path::new("/views/sub");

        match uri::rewrite_reference(root, dir, "img/pic.png") {
            Rewrite::Rewritten(url) => {
                let on_disk = paths::resolve(root, url.trim_start_matches('/'));
                assert!(paths::is_within(root, &on_disk));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
