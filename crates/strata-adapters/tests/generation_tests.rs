//! End-to-end generation against the in-memory filesystem and the built-in
//! renderer.

use std::path::{Path, PathBuf};

use strata_adapters::{MemoryFilesystem, MockProvider, TemplateRenderer};
use strata_core::{
    application::{
        AssistService, BackendService, GeneratorSettings, OrchestrationService, ProjectService,
        Registration, RegistrationOutcome, TransformService,
        ports::{ToolInvocation, ToolOutput, ToolRunner},
    },
    domain::{ArtifactDescriptor, ArtifactKind, ColumnRecord, Materialization, ModelUpdate},
    error::{ErrorCategory, StrataResult},
};

/// Runner that must never be reached by generation use cases.
struct NoTools;

impl ToolRunner for NoTools {
    fn run(&self, invocation: &ToolInvocation) -> StrataResult<ToolOutput> {
        panic!("unexpected tool invocation: {invocation}");
    }
}

fn settings() -> GeneratorSettings {
    GeneratorSettings {
        project_root: PathBuf::from("/work"),
        ..GeneratorSettings::default()
    }
}

fn transform(fs: &MemoryFilesystem) -> TransformService {
    TransformService::new(
        settings(),
        Box::new(fs.clone()),
        Box::new(TemplateRenderer::new()),
        Box::new(NoTools),
    )
}

fn orchestration(fs: &MemoryFilesystem) -> OrchestrationService {
    OrchestrationService::new(
        settings(),
        Box::new(fs.clone()),
        Box::new(TemplateRenderer::new()),
        Box::new(NoTools),
    )
}

fn read(fs: &MemoryFilesystem, path: &str) -> String {
    fs.read_file(Path::new(path))
        .unwrap_or_else(|| panic!("{path} was not written"))
}

#[test]
fn new_staging_model_with_schema_entry() {
    let fs = MemoryFilesystem::new();
    let descriptor = ArtifactDescriptor::builder("stg_users", ArtifactKind::Model)
        .materialized(Materialization::View)
        .build()
        .unwrap();

    let artifact = transform(&fs).generate_model(&descriptor).unwrap();

    assert_eq!(
        artifact.path,
        PathBuf::from("/work/dbt/models/staging/stg_users.sql")
    );
    let sql = read(&fs, "/work/dbt/models/staging/stg_users.sql");
    assert!(sql.contains("{{ config(materialized='view') }}"));

    let schema = read(&fs, "/work/dbt/models/staging/schema.yml");
    assert_eq!(schema, "version: 2\n\nmodels:\n  - name: stg_users\n");
}

#[test]
fn models_dispatch_to_layers() {
    let fs = MemoryFilesystem::new();
    let service = transform(&fs);
    for (name, dir) in [
        ("int_orders_joined", "intermediate"),
        ("fct_orders", "marts"),
        ("dim_customers", "marts"),
        ("orders_snapshot", "staging"),
    ] {
        let d = ArtifactDescriptor::builder(name, ArtifactKind::Model)
            .build()
            .unwrap();
        let artifact = service.generate_model(&d).unwrap();
        assert_eq!(
            artifact.path,
            PathBuf::from(format!("/work/dbt/models/{dir}/{name}.sql"))
        );
    }
    let marts = read(&fs, "/work/dbt/models/marts/schema.yml");
    assert!(marts.find("fct_orders").unwrap() < marts.find("dim_customers").unwrap());
}

#[test]
fn regenerating_model_replaces_header() {
    let fs = MemoryFilesystem::new();
    let service = transform(&fs);
    let body = "-- customers\nselect * from {{ ref('stg_customers') }}\n";

    let first = ArtifactDescriptor::builder("dim_customers", ArtifactKind::Model)
        .body(body)
        .build()
        .unwrap();
    service.generate_model(&first).unwrap();
    let written = read(&fs, "/work/dbt/models/marts/dim_customers.sql");
    assert_eq!(
        written,
        "-- customers\n{{ config(materialized='view') }}\nselect * from {{ ref('stg_customers') }}\n"
    );

    let second = ArtifactDescriptor::builder("dim_customers", ArtifactKind::Model)
        .materialized(Materialization::Table)
        .body(written)
        .build()
        .unwrap();
    service.generate_model(&second).unwrap();
    let rewritten = read(&fs, "/work/dbt/models/marts/dim_customers.sql");
    assert_eq!(rewritten.matches("config(").count(), 1);
    assert!(rewritten.contains("materialized='table'"));
}

#[test]
fn description_update_preserves_column_docs() {
    let fs = MemoryFilesystem::new();
    let service = transform(&fs);

    let documented = ArtifactDescriptor::builder("m", ArtifactKind::Model)
        .description("first")
        .column(ColumnRecord::new("id").with_description("surrogate key").with_test("unique"))
        .build()
        .unwrap();
    service.generate_model(&documented).unwrap();

    let redescribed = ArtifactDescriptor::builder("m", ArtifactKind::Model)
        .description("second")
        .build()
        .unwrap();
    service.generate_model(&redescribed).unwrap();

    let schema = read(&fs, "/work/dbt/models/staging/schema.yml");
    assert_eq!(
        schema,
        "version: 2\n\nmodels:\n  - name: m\n    description: second\n    columns:\n      - name: id\n        description: \"surrogate key\"\n        tests:\n          - unique\n"
    );
}

#[test]
fn hand_edited_schema_is_rejected_in_strict_mode() {
    let fs = MemoryFilesystem::new();
    fs.insert_file(
        "/work/dbt/models/staging/schema.yml",
        "version: 2\nmodels:\n  - name: stg_a\n    config:\n      tags: [x]\n",
    );
    let d = ArtifactDescriptor::builder("stg_b", ArtifactKind::Model)
        .build()
        .unwrap();

    let err = transform(&fs).generate_model(&d).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ParseAmbiguous);
    // The model file is written before the metadata document is touched.
    assert!(fs.read_file(Path::new("/work/dbt/models/staging/stg_b.sql")).is_some());
}

#[test]
fn duplicate_asset_registration() {
    let fs = MemoryFilesystem::new();
    let service = orchestration(&fs);
    let a1 = ArtifactDescriptor::builder("a1", ArtifactKind::Asset)
        .build()
        .unwrap();

    service.generate_asset(&a1).unwrap();
    let after_first = read(&fs, "/work/dagster/orchestration/assets/__init__.py");
    let second = service.generate_asset(&a1).unwrap();
    let after_second = read(&fs, "/work/dagster/orchestration/assets/__init__.py");

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.matches("from .a1 import a1").count(), 1);
    assert!(after_second.ends_with("__all__ = [\"a1\"]\n"));
    assert!(matches!(
        second.registration,
        Registration::Index {
            outcome: RegistrationOutcome::AlreadyRegistered,
            ..
        }
    ));
}

#[test]
fn initialised_project_indexes_accept_registrations() {
    let fs = MemoryFilesystem::new();
    let report = ProjectService::new(settings(), Box::new(fs.clone()), Box::new(TemplateRenderer::new()))
        .init("acme", false)
        .unwrap();
    assert!(report.created.contains(&PathBuf::from("/work/strata.json")));

    let service = orchestration(&fs);
    service
        .generate_job(&ArtifactDescriptor::builder("nightly", ArtifactKind::Job).build().unwrap())
        .unwrap();
    service
        .generate_schedule(
            &ArtifactDescriptor::builder("nightly_at_midnight", ArtifactKind::ScheduledTrigger)
                .target_job("nightly")
                .build()
                .unwrap(),
        )
        .unwrap();

    assert_eq!(
        read(&fs, "/work/dagster/orchestration/jobs/__init__.py"),
        "from .nightly import nightly\n\n__all__ = [\"nightly\"]\n"
    );
    let schedule = read(&fs, "/work/dagster/orchestration/schedules/nightly_at_midnight.py");
    assert!(schedule.contains("from ..jobs import nightly"));
    assert!(schedule.contains("@schedule(cron_schedule=\"0 0 * * *\", job=nightly)"));

    let again = ProjectService::new(settings(), Box::new(fs.clone()), Box::new(TemplateRenderer::new()))
        .init("acme", false)
        .unwrap();
    assert!(again.created.is_empty());
    assert!(
        read(&fs, "/work/dagster/orchestration/jobs/__init__.py").contains("nightly"),
        "init must not clobber registrations"
    );
}

#[test]
fn migration_file_is_versioned() {
    let fs = MemoryFilesystem::new();
    let service = BackendService::new(
        settings(),
        Box::new(fs.clone()),
        Box::new(TemplateRenderer::new()),
        Box::new(NoTools),
    );
    let d = ArtifactDescriptor::builder("add_orders", ArtifactKind::Migration)
        .version("20250101120000")
        .body("alter table orders add column note text;")
        .build()
        .unwrap();

    let artifact = service.generate_migration(&d).unwrap();

    assert_eq!(
        artifact.path,
        PathBuf::from("/work/supabase/migrations/20250101120000_add_orders.sql")
    );
    assert_eq!(
        read(&fs, "/work/supabase/migrations/20250101120000_add_orders.sql"),
        "alter table orders add column note text;\n"
    );
}

#[test]
fn drafted_sql_becomes_model_body() {
    let fs = MemoryFilesystem::new();
    let assist = AssistService::new(settings(), Box::new(MockProvider), Box::new(fs.clone()));
    let sql = assist.draft_model_sql("weekly revenue").unwrap();
    assert!(!sql.contains("```"));

    let d = ArtifactDescriptor::builder("fct_weekly_revenue", ArtifactKind::Model)
        .body(sql)
        .build()
        .unwrap();
    transform(&fs).generate_model(&d).unwrap();

    let written = read(&fs, "/work/dbt/models/marts/fct_weekly_revenue.sql");
    assert!(written.starts_with("-- Drafted from: weekly revenue\n{{ config(materialized='view') }}\n"));
}

#[test]
fn metadata_round_trip_is_stable() {
    use strata_core::application::MetadataService;
    use strata_core::domain::ParseMode;

    let fs = MemoryFilesystem::new();
    let path = Path::new("/work/dbt/models/staging/schema.yml");
    let store = MetadataService::new(&fs, 2, ParseMode::Strict);
    store
        .upsert_model(
            path,
            ModelUpdate::new("a")
                .description("Users: \"active\" only")
                .tests(vec!["row_count".into()]),
        )
        .unwrap();
    store.upsert_model(path, ModelUpdate::new("b")).unwrap();
    let first = read(&fs, "/work/dbt/models/staging/schema.yml");

    store.upsert_model(path, ModelUpdate::new("b")).unwrap();
    let second = read(&fs, "/work/dbt/models/staging/schema.yml");

    assert_eq!(first, second);
    let doc = store.load(path).unwrap();
    assert_eq!(doc.models[0].description.as_deref(), Some("Users: \"active\" only"));
}
