//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stitch-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `TemplateSource`: Reading view files and assets
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`ViewEngine` and `AssetPassthrough` are used directly by hosts)

pub mod output;

pub use output::TemplateSource;
