//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stitch-adapters` crate provides implementations.

use std::path::Path;

use crate::error::StitchResult;

/// Port for reading view files.
///
/// Implemented by:
/// - `stitch_adapters::filesystem::LocalFilesystem` (production)
/// - `stitch_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute and already normalized by the caller
/// - A missing file must be reported as `ApplicationError::TemplateNotFound`
/// - No caching here; `TemplateStore` memoizes text reads
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Read a template file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> StitchResult<String>;

    /// Read raw bytes (assets).
    fn read_bytes(&self, path: &Path) -> StitchResult<Vec<u8>>;

    /// `true` if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}
