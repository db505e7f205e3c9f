//! Document Processor - the three passes applied to every template.
//!
//! Each document, including every imported one, goes through:
//! 1. Interpolation of `#{...}` placeholders
//! 2. Import expansion (recursive, same scope)
//! 3. URI rewriting of relative `src` / `href` values
//!
//! Placeholders are evaluated against the template source before it is
//! parsed, so expression operators such as `<` and `&&` are never mistaken
//! for markup. Imported documents are fully processed before they are
//! spliced in, and the importing document's URI pass skips them.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, services::TemplateStore},
    domain::{
        Document, NodeId, Rewrite, Scope, interpolation,
        paths::{self, parent_dir},
        uri,
    },
    error::StitchResult,
};

const IMPORT_TAG: &str = "import";

/// Processes one render's documents against the shared store.
///
/// Holds the chain of files currently being expanded, so a processor is
/// meant to be used for a single render.
pub struct Processor<'a> {
    store: &'a TemplateStore,
    view_root: &'a Path,
    chain: Vec<PathBuf>,
}

impl<'a> Processor<'a> {
    pub fn new(store: &'a TemplateStore, view_root: &'a Path) -> Self {
        Self {
            store,
            view_root,
            chain: Vec::new(),
        }
    }

    /// Load, interpolate, parse and process `file`.
    pub fn load(&mut self, file: &Path, scope: &Scope) -> StitchResult<Document> {
        let text = self.store.get(file)?;
        let substituted = self.interpolate(file, &text, scope)?;
        let document = parse(file, &substituted)?;
        self.expand(file, document, scope)
    }

    /// Run all passes over `document`, which was read from `file`.
    ///
    /// Placeholders are read from the serialized document, so operators
    /// inside them appear in their escaped form (`&lt;`, `&amp;&amp;`).
    /// [`Processor::load`] reads them from the source instead.
    pub fn process(
        &mut self,
        file: &Path,
        document: Document,
        scope: &Scope,
    ) -> StitchResult<Document> {
        let content = document.inner_html();
        let substituted = self.interpolate(file, &content, scope)?;
        let document = if substituted == content {
            document
        } else {
            parse(file, &substituted)?
        };
        self.expand(file, document, scope)
    }

    /// Import expansion and URI rewriting, with `file` on the import chain.
    #[instrument(skip_all, fields(file = %file.display(), depth = self.chain.len()))]
    fn expand(
        &mut self,
        file: &Path,
        mut document: Document,
        scope: &Scope,
    ) -> StitchResult<Document> {
        self.chain.push(file.to_path_buf());
        let imported = self.expand_imports(file, &mut document, scope);
        self.chain.pop();

        self.rewrite_uris(file, &mut document, &imported?);
        Ok(document)
    }

    fn interpolate(&self, file: &Path, text: &str, scope: &Scope) -> StitchResult<String> {
        interpolation::interpolate(text, scope).map_err(|err| {
            ApplicationError::Evaluation {
                file: file.to_path_buf(),
                expression: err.expression,
                source: err.source,
            }
            .into()
        })
    }

    /// Splice every outermost `<import>` and return the ids of the spliced
    /// top-level nodes.
    fn expand_imports(
        &mut self,
        file: &Path,
        document: &mut Document,
        scope: &Scope,
    ) -> StitchResult<Vec<NodeId>> {
        let mut spliced = Vec::new();
        for import in document.select_outermost(|el| el.is(IMPORT_TAG)) {
            let target = self.import_target(file, document, import)?;

            if self.chain.contains(&target) {
                let mut chain = self.chain.clone();
                chain.push(target);
                return Err(ApplicationError::ImportCycle { chain }.into());
            }

            debug!(import = %target.display(), "expanding import");
            let imported = self.load(&target, scope)?;
            let nodes = document.adopt(imported);
            spliced.extend_from_slice(&nodes);
            document.replace_with(import, nodes);
        }
        Ok(spliced)
    }

    fn import_target(
        &self,
        file: &Path,
        document: &Document,
        import: NodeId,
    ) -> StitchResult<PathBuf> {
        let src = document
            .element(import)
            .and_then(|el| el.attribute("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .ok_or_else(|| ApplicationError::InvalidImport {
                file: file.to_path_buf(),
                reason: "<import> has no src attribute".into(),
            })?;

        Ok(match src.strip_prefix('/') {
            Some(from_root) => paths::resolve(self.view_root, from_root),
            None => paths::resolve(parent_dir(file), src),
        })
    }

    /// Rewrite this file's own references. `imported` subtrees were
    /// rewritten against their own directory already.
    fn rewrite_uris(&self, file: &Path, document: &mut Document, imported: &[NodeId]) {
        let template_dir = parent_dir(file);
        let candidates = document.select_except(imported, |el| {
            el.has_attribute("src") || (el.has_attribute("href") && !el.is("a"))
        });

        for id in candidates {
            let Some(element) = document.element_mut(id) else {
                continue;
            };
            let names: &[&str] = if element.is("a") { &["src"] } else { &["src", "href"] };

            for &name in names {
                let Some(value) = element.attribute(name) else {
                    continue;
                };
                match uri::rewrite_reference(self.view_root, template_dir, value) {
                    Rewrite::Unchanged => {}
                    Rewrite::Rewritten(url) => element.set_attribute(name, url),
                    Rewrite::OutsideRoot => {
                        warn!(
                            attribute = name,
                            value,
                            "reference resolves outside the views root, leaving it unchanged"
                        );
                    }
                }
            }
        }
    }
}

fn parse(file: &Path, text: &str) -> StitchResult<Document> {
    Document::parse(text).map_err(|source| {
        ApplicationError::MalformedTemplate {
            file: file.to_path_buf(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application::ports::output::MockTemplateSource;
    use crate::domain::DomainError;
    use crate::error::StitchError;

    const ROOT: &str = "/views";

    fn store(files: &[(&str, &str)]) -> TemplateStore {
        let files: HashMap<PathBuf, String> = files
            .iter()
            .map(|(p, t)| (PathBuf::from(p), t.to_string()))
            .collect();
        let mut source = MockTemplateSource::new();
        source.expect_read_to_string().returning(move |p| {
            files.get(p).cloned().ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    path: p.to_path_buf(),
                }
                .into()
            })
        });
        TemplateStore::new(Box::new(source))
    }

    fn render(store: &TemplateStore, file: &str, scope: &Scope) -> StitchResult<String> {
        Processor::new(store, Path::new(ROOT))
            .load(Path::new(file), scope)
            .map(|doc| doc.inner_html())
    }

    #[test]
    fn interpolates_before_importing() {
        let store = store(&[
            ("/views/index.html", "<h1>#{title}</h1><import src=\"part.html\"></import>"),
            ("/views/part.html", "<p>#{title}!</p>"),
        ]);
        let scope = Scope::new().with("title", "Hi");

        assert_eq!(
            render(&store, "/views/index.html", &scope).unwrap(),
            "<h1>Hi</h1><p>Hi!</p>"
        );
    }

    #[test]
    fn import_src_can_be_interpolated() {
        let store = store(&[
            ("/views/index.html", "<import src=\"/parts/#{which}.html\"></import>"),
            ("/views/parts/b.html", "<b>b</b>"),
        ]);
        let scope = Scope::new().with("which", "b");

        assert_eq!(render(&store, "/views/index.html", &scope).unwrap(), "<b>b</b>");
    }

    #[test]
    fn imported_uris_are_relative_to_their_own_file() {
        let store = store(&[
            ("/views/index.html", "<import src=\"sub/nav.html\"></import><img src=\"logo.png\">"),
            ("/views/sub/nav.html", "<link rel=\"stylesheet\" href=\"nav.css\"><a href=\"x.html\">x</a>"),
        ]);

        assert_eq!(
            render(&store, "/views/index.html", &Scope::new()).unwrap(),
            "<link href=\"/sub/nav.css\" rel=\"stylesheet\"><a href=\"x.html\">x</a><img src=\"/logo.png\">"
        );
    }

    #[test]
    fn imported_outside_root_reference_is_not_rewritten_by_importer() {
        let store = store(&[
            ("/views/a/b/index.html", "<import src=\"/partial.html\"></import><img src=\"me.png\">"),
            ("/views/partial.html", "<img src=\"../shared/x.png\">"),
        ]);

        assert_eq!(
            render(&store, "/views/a/b/index.html", &Scope::new()).unwrap(),
            "<img src=\"../shared/x.png\"><img src=\"/a/b/me.png\">"
        );
    }

    #[test]
    fn nested_imports_are_rewritten_once() {
        let store = store(&[
            ("/views/index.html", "<import src=\"a/outer.html\"></import>"),
            ("/views/a/outer.html", "<div><import src=\"../b/inner.html\"></import></div>"),
            ("/views/b/inner.html", "<img src=\"../../up.png\"><img src=\"i.png\">"),
        ]);

        assert_eq!(
            render(&store, "/views/index.html", &Scope::new()).unwrap(),
            "<div><img src=\"../../up.png\"><img src=\"/b/i.png\"></div>"
        );
    }

    #[test]
    fn placeholder_operators_are_read_from_source() {
        let store = store(&[(
            "/views/index.html",
            "<p title=\"#{n > 1 && 'many'}\">a &amp; b #{n < 3 ? '<3' : ''}</p>",
        )]);
        let scope = Scope::new().with("n", 2);

        assert_eq!(
            render(&store, "/views/index.html", &scope).unwrap(),
            "<p title=\"many\">a &amp; b &lt;3</p>"
        );
    }

    #[test]
    fn missing_src_is_invalid() {
        let store = store(&[("/views/index.html", "<import></import>")]);
        let err = render(&store, "/views/index.html", &Scope::new()).unwrap_err();
        assert!(matches!(
            err,
            StitchError::Application(ApplicationError::InvalidImport { .. })
        ));
    }

    #[test]
    fn indirect_cycle_is_reported_with_chain() {
        let store = store(&[
            ("/views/a.html", "<import src=\"b.html\"></import>"),
            ("/views/b.html", "<import src=\"/a.html\"></import>"),
        ]);
        let err = render(&store, "/views/a.html", &Scope::new()).unwrap_err();
        assert_eq!(
            err,
            StitchError::Application(ApplicationError::ImportCycle {
                chain: vec![
                    "/views/a.html".into(),
                    "/views/b.html".into(),
                    "/views/a.html".into()
                ]
            })
        );
    }

    #[test]
    fn same_partial_twice_is_not_a_cycle() {
        let store = store(&[
            ("/views/index.html", "<import src=\"p.html\"></import><import src=\"p.html\"></import>"),
            ("/views/p.html", "<i>p</i>"),
        ]);
        assert_eq!(
            render(&store, "/views/index.html", &Scope::new()).unwrap(),
            "<i>p</i><i>p</i>"
        );
    }

    #[test]
    fn evaluation_errors_name_the_file() {
        let store = store(&[
            ("/views/index.html", "<import src=\"p.html\"></import>"),
            ("/views/p.html", "#{nope}"),
        ]);
        let err = render(&store, "/views/index.html", &Scope::new()).unwrap_err();
        assert_eq!(
            err,
            StitchError::Application(ApplicationError::Evaluation {
                file: "/views/p.html".into(),
                expression: "nope".into(),
                source: DomainError::UndefinedIdentifier { name: "nope".into() },
            })
        );
    }

    #[test]
    fn missing_import_target_is_not_found() {
        let store = store(&[("/views/index.html", "<import src=\"gone.html\"></import>")]);
        let err = render(&store, "/views/index.html", &Scope::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
