//! Domain rules and use cases for the Strata generator.
//!
//! `domain` holds the pure parts: naming conventions, destinations, the
//! `__init__.py` merge and the `schema.yml` dialect. `application` holds
//! the services and the ports they need (filesystem, renderer, tool runner,
//! AI provider). Adapters for those ports live in `strata-adapters`.
//!
//! ```
//! use strata_core::application::GeneratorSettings;
//! use strata_core::domain::{ArtifactDescriptor, ArtifactKind};
//!
//! let model = ArtifactDescriptor::builder("stg_users", ArtifactKind::Model)
//!     .build()
//!     .unwrap();
//! let path = GeneratorSettings::default().artifact_path(&model);
//! assert!(path.ends_with("dbt/models/staging/stg_users.sql"));
//! ```

pub mod application;
pub mod domain;
pub mod error;
