//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use stitch_core::{
    application::{ApplicationError, ports::TemplateSource},
    error::{StitchError, StitchResult},
};
use tracing::trace;

/// Production template source reading from disk.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSource for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> StitchResult<String> {
        trace!(path = %path.display(), "reading template from disk");
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read template"))
    }

    fn read_bytes(&self, path: &Path) -> StitchResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StitchError {
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::TemplateNotFound {
            path: path.to_path_buf(),
        },
        _ => ApplicationError::SourceError {
            path: path.to_path_buf(),
            reason: format!("Failed to {}: {}", operation, e),
        },
    }
    .into()
}
