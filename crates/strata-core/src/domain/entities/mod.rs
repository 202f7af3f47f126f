pub mod artifact;
pub mod destination;
pub mod index_file;
pub mod metadata;
pub mod project_structure;

pub use crate::domain::DomainError;
pub use artifact::{ArtifactDescriptor, ArtifactDescriptorBuilder, ArtifactParams};
pub use destination::{Destination, ProjectLayout};
pub use index_file::{IndexEntry, MergeOutcome};
pub use metadata::{ColumnRecord, MetadataDocument, ModelRecord, ModelUpdate, UpsertOutcome};
pub use project_structure::ProjectStructure;
