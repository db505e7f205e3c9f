//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the two
//! things a host asks for: "render this view" and "serve this file".

pub mod asset_passthrough;
pub mod processor;
pub mod template_store;
pub mod view_engine;

pub use asset_passthrough::{Asset, AssetOutcome, AssetPassthrough, DeclineReason};
pub use processor::Processor;
pub use template_store::TemplateStore;
pub use view_engine::{EngineOptions, ViewEngine};
