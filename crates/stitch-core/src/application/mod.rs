//! Application layer for Stitch.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ViewEngine, AssetPassthrough)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; markup, expression
//! and path rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    Asset, AssetOutcome, AssetPassthrough, DeclineReason, EngineOptions, Processor, TemplateStore,
    ViewEngine,
};

// Re-export port traits (for adapter implementation)
pub use ports::TemplateSource;

pub use error::ApplicationError;
