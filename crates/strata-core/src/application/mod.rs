//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (one per external tool, plus the
//!   declaration/metadata stores they share)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Settings**: Explicit generator configuration handed in by the caller
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; the conventions and
//! merge rules themselves live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod settings;

pub use services::{
    AssistService, BackendService, DbtAction, DeclarationService, GeneratedArtifact, InitReport,
    MetadataService, OrchestrationService, ProjectService, Registration, RegistrationOutcome,
    TransformService,
};

pub use ports::{AiProvider, ArtifactRenderer, Filesystem, ToolRunner};

pub use error::ApplicationError;
pub use settings::GeneratorSettings;
