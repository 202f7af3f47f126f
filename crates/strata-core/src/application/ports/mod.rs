//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ArtifactRenderer`: Generated file content
//!   - `ToolRunner`: External command execution
//!   - `AiProvider`: Text generation backends
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    AiParams, AiProvider, AiRequest, ArtifactRenderer, AssistTask, Filesystem, ToolInvocation,
    ToolOutput, ToolRunner,
};

#[cfg(test)]
pub use output::{MockAiProvider, MockArtifactRenderer, MockFilesystem, MockToolRunner};
