//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod ai;
pub mod catalog;
pub mod filesystem;
pub mod process;
pub mod renderer;

// Re-export commonly used adapters
pub use ai::{MockProvider, UnimplementedProvider, provider_for};
pub use catalog::{CatalogEntry, scan};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::CommandRunner;
pub use renderer::TemplateRenderer;
