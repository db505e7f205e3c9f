//! View Engine - the render entry point.
//!
//! Resolves a view file, loads it through the shared `TemplateStore`, runs
//! the processing passes and serializes the result. Hosts share one engine
//! between request handlers (it is `Send + Sync`).

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::TemplateSource,
        services::{Processor, TemplateStore},
    },
    domain::{Scope, paths},
    error::StitchResult,
};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Directory all views live under. Root-relative imports and rewritten
    /// URIs are relative to it.
    pub view_root: PathBuf,
    /// Extension appended by [`ViewEngine::render_view`] to names without one.
    pub default_extension: String,
}

impl EngineOptions {
    pub fn new(view_root: impl Into<PathBuf>) -> Self {
        Self {
            view_root: view_root.into(),
            default_extension: "html".into(),
        }
    }

    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }
}

/// Server-side view renderer.
pub struct ViewEngine {
    options: EngineOptions,
    store: TemplateStore,
}

impl ViewEngine {
    /// Create an engine reading views through `source`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stitch_core::application::{EngineOptions, ViewEngine, ports::*};
    ///
    /// let engine = ViewEngine::new(
    ///     EngineOptions::new("/srv/app/views"),
    ///     source, // impl TemplateSource
    /// );
    /// ```
    pub fn new(options: EngineOptions, source: Box<dyn TemplateSource>) -> Self {
        let options = EngineOptions {
            view_root: paths::normalize(&options.view_root),
            ..options
        };
        Self {
            options,
            store: TemplateStore::new(source),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn view_root(&self) -> &Path {
        &self.options.view_root
    }

    /// The template cache, for warm-up or invalidation by the host.
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Absolute path of `file`; relative paths are taken from the views root.
    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        paths::resolve(&self.options.view_root, file)
    }

    /// Path of a logical view name such as `error/404`.
    pub fn view_path(&self, name: &str) -> PathBuf {
        let name = name.trim_start_matches('/');
        if Path::new(name).extension().is_some() || self.options.default_extension.is_empty() {
            self.resolve(name)
        } else {
            self.resolve(format!("{name}.{}", self.options.default_extension))
        }
    }

    /// Render `file` with `scope`.
    ///
    /// Any failure aborts the whole render; there is no partial output.
    #[instrument(skip_all, fields(file = %file.as_ref().display()))]
    pub fn render(&self, file: impl AsRef<Path>, scope: &Scope) -> StitchResult<String> {
        let path = self.resolve(file);
        debug!(path = %path.display(), keys = scope.len(), "rendering view");

        let document = Processor::new(&self.store, &self.options.view_root).load(&path, scope)?;
        let html = document.inner_html();

        info!(bytes = html.len(), "view rendered");
        Ok(html)
    }

    /// Render and hand the outcome to `callback`.
    ///
    /// The callback is invoked exactly once, with either the markup or the
    /// error.
    pub fn render_with<F>(&self, file: impl AsRef<Path>, scope: &Scope, callback: F)
    where
        F: FnOnce(StitchResult<String>),
    {
        callback(self.render(file, scope));
    }

    /// Render a logical view name (see [`ViewEngine::view_path`]).
    pub fn render_view(&self, name: &str, scope: &Scope) -> StitchResult<String> {
        self.render(self.view_path(name), scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockTemplateSource;

    fn engine() -> ViewEngine {
        let mut source = MockTemplateSource::new();
        source
            .expect_read_to_string()
            .returning(|p| Ok(format!("<p>{}</p>", p.display())));
        ViewEngine::new(EngineOptions::new("/srv/./views/"), Box::new(source))
    }

    #[test]
    fn root_is_normalized() {
        assert_eq!(engine().view_root(), Path::new("/srv/views"));
    }

    #[test]
    fn relative_files_resolve_under_root() {
        let engine = engine();
        assert_eq!(engine.resolve("a/b.html"), PathBuf::from("/srv/views/a/b.html"));
        assert_eq!(engine.resolve("/tmp/x.html"), PathBuf::from("/tmp/x.html"));
    }

    #[test]
    fn view_names_get_default_extension() {
        let engine = engine();
        assert_eq!(engine.view_path("error/404"), PathBuf::from("/srv/views/error/404.html"));
        assert_eq!(engine.view_path("/index"), PathBuf::from("/srv/views/index.html"));
        assert_eq!(engine.view_path("feed.xml"), PathBuf::from("/srv/views/feed.xml"));
    }

    #[test]
    fn render_view_reads_resolved_path() {
        let html = engine().render_view("home", &Scope::new()).unwrap();
        assert_eq!(html, "<p>/srv/views/home.html</p>");
    }

    #[test]
    fn callback_receives_result() {
        let mut seen = None;
        engine().render_with("x.html", &Scope::new(), |result| seen = Some(result));
        assert_eq!(seen, Some(Ok("<p>/srv/views/x.html</p>".to_string())));
    }
}
