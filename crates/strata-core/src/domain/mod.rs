// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! This module contains pure logic with ZERO I/O: where artifacts go, how an
//! index file absorbs a new registration, how the restricted YAML dialect is
//! read and written. Rendering, filesystem access and process execution are
//! handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable descriptors**: built once, validated, then only read
//!
// Public API - what the world sees
pub mod convention;
pub mod dialect;
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    artifact::{ArtifactDescriptor, ArtifactDescriptorBuilder, ArtifactParams},
    destination::{Destination, INDEX_FILE, METADATA_FILE, ProjectLayout},
    index_file::{IndexEntry, MergeOutcome},
    metadata::{ColumnRecord, MetadataDocument, ModelRecord, ModelUpdate, UpsertOutcome},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
};

pub use dialect::{ParsedDocument, SkippedLine};
pub use error::{DomainError, ErrorCategory};

pub use value_objects::{AiProviderKind, ArtifactKind, Materialization, ModelLayer, ParseMode};

pub use validation::DomainValidator;
