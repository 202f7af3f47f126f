//! Application services - orchestrate use cases.
//!
//! One service per external tool (dbt, Dagster, Supabase), plus project
//! initialisation and AI assistance. `DeclarationService` and
//! `MetadataService` are the shared stores the generators register into;
//! they borrow a filesystem instead of owning one.

pub mod assist_service;
pub mod backend_service;
pub mod declaration_service;
pub mod metadata_service;
pub mod orchestration_service;
pub mod project_service;
pub mod report;
pub mod transform_service;

mod support;

#[cfg(test)]
pub(crate) mod fakes;

pub use assist_service::AssistService;
pub use backend_service::BackendService;
pub use declaration_service::DeclarationService;
pub use metadata_service::MetadataService;
pub use orchestration_service::OrchestrationService;
pub use project_service::{InitReport, ProjectService};
pub use report::{GeneratedArtifact, Registration, RegistrationOutcome};
pub use transform_service::{DbtAction, TransformService};
