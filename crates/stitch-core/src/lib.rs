//! Stitch Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stitch
//! server-side view engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       stitch-cli / web host             │
//! │     (Drives the engine)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ViewEngine, AssetPassthrough)        │
//! │   TemplateStore + Processor passes      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │         (Driven: TemplateSource)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stitch-adapters (Infrastructure)     │
//! │   (LocalFilesystem, MemoryFilesystem)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Document, expressions, Scope, paths)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stitch_core::{
//!     application::{EngineOptions, ViewEngine},
//!     domain::Scope,
//! };
//!
//! // 1. Create the engine (with an injected source adapter)
//! let engine = ViewEngine::new(EngineOptions::new("./views"), source);
//!
//! // 2. Render per request
//! let scope = Scope::new().with("title", "Home");
//! let html = engine.render("index.html", &scope).unwrap();
//! ```
//!
//! ## Template Format
//!
//! Views are HTML. `#{expression}` placeholders are replaced with the
//! value of the expression evaluated against the scope, and
//! `<import src="partial.html"></import>` is replaced with the processed
//! content of the referenced file. Relative `src`/`href` values are
//! rewritten to root-relative URLs so they work at any nesting depth.

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Asset, AssetOutcome, AssetPassthrough, DeclineReason, EngineOptions, TemplateStore,
        ViewEngine, ports::TemplateSource,
    };
    pub use crate::domain::{Document, Scope, Value};
    pub use crate::error::{StitchError, StitchResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
