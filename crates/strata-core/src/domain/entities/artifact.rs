//! Artifact descriptors: the immutable input to every generation use case.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::metadata::ColumnRecord,
    error::DomainError,
    validation::DomainValidator,
    value_objects::{ArtifactKind, Materialization},
};

/// Everything needed to render one generated file.
///
/// Built once per invocation through [`ArtifactDescriptor::builder`] and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    name: String,
    kind: ArtifactKind,
    params: ArtifactParams,
}

/// Kind-specific generation parameters.
///
/// Fields that do not apply to a kind are ignored by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactParams {
    /// Caller-supplied payload (raw SQL or Python) used verbatim.
    pub body: Option<String>,
    pub materialized: Option<Materialization>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Upstream asset names.
    pub deps: Vec<String>,
    pub compute_kind: Option<String>,
    pub group: Option<String>,
    pub cron: Option<String>,
    /// Job a schedule triggers.
    pub target_job: Option<String>,
    /// Migration version prefix (`YYYYMMDDHHMMSS`).
    pub version: Option<String>,
    pub columns: Vec<ColumnRecord>,
    pub tests: Vec<String>,
}

impl ArtifactDescriptor {
    pub fn builder(name: impl Into<String>, kind: ArtifactKind) -> ArtifactDescriptorBuilder {
        ArtifactDescriptorBuilder {
            name: name.into(),
            kind,
            params: ArtifactParams::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn params(&self) -> &ArtifactParams {
        &self.params
    }

    /// Materialization for a model, falling back to `default`.
    pub fn materialization_or(&self, default: Materialization) -> Materialization {
        self.params.materialized.unwrap_or(default)
    }

    /// Copy of this descriptor with the migration version filled in.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.params.version = Some(version.into());
        copy
    }

    /// Copy of this descriptor carrying `body` as its caller-supplied payload.
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.params.body = Some(body.into());
        copy
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        DomainValidator::validate_name(&self.name)?;

        for dep in &self.params.deps {
            DomainValidator::validate_name(dep).map_err(|_| DomainError::InvalidArgument {
                field: "dependency",
                reason: format!("'{dep}' is not a valid asset name"),
            })?;
        }

        match self.kind {
            ArtifactKind::ScheduledTrigger => {
                let job = self.params.target_job.as_deref().ok_or(
                    DomainError::MissingParameter {
                        kind: "schedule",
                        parameter: "job",
                    },
                )?;
                DomainValidator::validate_name(job).map_err(|_| DomainError::InvalidArgument {
                    field: "job",
                    reason: format!("'{job}' is not a valid job name"),
                })?;
            }
            ArtifactKind::Migration => {
                let version = self.params.version.as_deref().unwrap_or_default();
                if !version.is_empty() && !version.chars().all(|c| c.is_ascii_digit()) {
                    return Err(DomainError::InvalidArgument {
                        field: "migration version",
                        reason: format!("'{version}' must contain only digits"),
                    });
                }
            }
            ArtifactKind::Model | ArtifactKind::Asset | ArtifactKind::Job => {}
        }

        Ok(())
    }
}

/// Builder for [`ArtifactDescriptor`]; `build` validates.
#[derive(Debug, Clone)]
pub struct ArtifactDescriptorBuilder {
    name: String,
    kind: ArtifactKind,
    params: ArtifactParams,
}

impl ArtifactDescriptorBuilder {
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.params.body = Some(body.into());
        self
    }

    pub fn materialized(mut self, materialized: Materialization) -> Self {
        self.params.materialized = Some(materialized);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.params.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.params.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn compute_kind(mut self, compute_kind: impl Into<String>) -> Self {
        self.params.compute_kind = Some(compute_kind.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.params.group = Some(group.into());
        self
    }

    pub fn cron(mut self, cron: impl Into<String>) -> Self {
        self.params.cron = Some(cron.into());
        self
    }

    pub fn target_job(mut self, job: impl Into<String>) -> Self {
        self.params.target_job = Some(job.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.params.version = Some(version.into());
        self
    }

    pub fn column(mut self, column: ColumnRecord) -> Self {
        self.params.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnRecord>) -> Self {
        self.params.columns.extend(columns);
        self
    }

    pub fn test(mut self, test: impl Into<String>) -> Self {
        self.params.tests.push(test.into());
        self
    }

    pub fn build(self) -> Result<ArtifactDescriptor, DomainError> {
        let descriptor = ArtifactDescriptor {
            name: self.name,
            kind: self.kind,
            params: self.params,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_parameters() {
        let d = ArtifactDescriptor::builder("stg_users", ArtifactKind::Model)
            .materialized(Materialization::Table)
            .description("Users from the app database")
            .tag("daily")
            .test("unique_id")
            .build()
            .unwrap();

        assert_eq!(d.name(), "stg_users");
        assert_eq!(d.kind(), ArtifactKind::Model);
        assert_eq!(d.params().tags, vec!["daily"]);
        assert_eq!(
            d.materialization_or(Materialization::View),
            Materialization::Table
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = ArtifactDescriptor::builder("", ArtifactKind::Asset)
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { field: "name", .. }));
    }

    #[test]
    fn schedule_requires_job() {
        let err = ArtifactDescriptor::builder("nightly", ArtifactKind::ScheduledTrigger)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingParameter {
                kind: "schedule",
                parameter: "job"
            }
        );

        assert!(
            ArtifactDescriptor::builder("nightly", ArtifactKind::ScheduledTrigger)
                .target_job("refresh_job")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn invalid_dependency_is_rejected() {
        let err = ArtifactDescriptor::builder("a1", ArtifactKind::Asset)
            .deps(["ok_dep", "bad-dep"])
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { field: "dependency", .. }));
    }

    #[test]
    fn migration_version_must_be_numeric() {
        assert!(
            ArtifactDescriptor::builder("create_users", ArtifactKind::Migration)
                .version("2024-01-01")
                .build()
                .is_err()
        );
        assert!(
            ArtifactDescriptor::builder("create_users", ArtifactKind::Migration)
                .version("20240101120000")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn with_body_leaves_original_untouched() {
        let d = ArtifactDescriptor::builder("stg_users", ArtifactKind::Model)
            .build()
            .unwrap();
        let with_body = d.with_body("select 1");
        assert!(d.params().body.is_none());
        assert_eq!(with_body.params().body.as_deref(), Some("select 1"));
    }
}
