//! Infrastructure adapters for Stitch.
//!
//! This crate implements the ports defined in `stitch-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod views;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use views::list_views;
