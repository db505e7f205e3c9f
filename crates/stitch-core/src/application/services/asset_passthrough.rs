//! Asset Passthrough - serve raw files from the views root.
//!
//! Lets a host answer requests for resources that sit next to the views
//! (images, stylesheets referenced by rewritten URIs) without a separate
//! static-file mount. It never fails: anything it will not serve is a
//! decline, and the host moves on to its next handler.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::TemplateSource,
    domain::{media, paths},
};

/// A file ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Why a request was not served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The path resolves outside the views root.
    Forbidden,
    /// Nothing, or something other than a regular file, lives there.
    NotFound,
    /// The file exists but could not be read.
    Unreadable,
}

impl DeclineReason {
    /// Conventional HTTP status for hosts that answer instead of falling
    /// through.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Unreadable => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Served(Asset),
    Declined(DeclineReason),
}

pub struct AssetPassthrough {
    view_root: PathBuf,
    source: Box<dyn TemplateSource>,
}

impl AssetPassthrough {
    pub fn new(view_root: impl AsRef<Path>, source: Box<dyn TemplateSource>) -> Self {
        Self {
            view_root: paths::normalize(view_root.as_ref()),
            source,
        }
    }

    pub fn view_root(&self) -> &Path {
        &self.view_root
    }

    /// File a request path maps to, or `None` if it escapes the root.
    pub fn locate(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        let file = paths::resolve(&self.view_root, relative);
        paths::is_within(&self.view_root, &file).then_some(file)
    }

    #[instrument(skip(self))]
    pub fn serve(&self, request_path: &str) -> AssetOutcome {
        let Some(file) = self.locate(request_path) else {
            debug!("request escapes the views root");
            return AssetOutcome::Declined(DeclineReason::Forbidden);
        };

        if !self.source.is_file(&file) {
            trace!(path = %file.display(), "no such file");
            return AssetOutcome::Declined(DeclineReason::NotFound);
        }

        match self.source.read_bytes(&file) {
            Ok(bytes) => {
                debug!(path = %file.display(), bytes = bytes.len(), "serving asset");
                AssetOutcome::Served(Asset {
                    content_type: media::content_type_for(&file),
                    path: file,
                    bytes,
                })
            }
            Err(err) => {
                debug!(path = %file.display(), error = %err, "asset unreadable");
                AssetOutcome::Declined(DeclineReason::Unreadable)
            }
        }
    }

    /// Middleware-style adapter: `send` the asset or fall through to `next`.
    pub fn handle<T>(
        &self,
        request_path: &str,
        send: impl FnOnce(Asset) -> T,
        next: impl FnOnce(DeclineReason) -> T,
    ) -> T {
        match self.serve(request_path) {
            AssetOutcome::Served(asset) => send(asset),
            AssetOutcome::Declined(reason) => next(reason),
        }
    }
}
