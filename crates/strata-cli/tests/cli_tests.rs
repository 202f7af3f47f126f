//! Binary-level tests for the `strata` command.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn strata(project: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("strata");
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("STRATA_LOG_FILE")
        .arg("-C")
        .arg(project);
    cmd
}

fn initialised() -> TempDir {
    let temp = TempDir::new().unwrap();
    strata(temp.path()).args(["init", "acme"]).assert().success();
    temp
}

#[test]
fn help_lists_tool_commands() {
    cargo::cargo_bin_cmd!("strata")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbt"))
        .stdout(predicate::str::contains("dagster"))
        .stdout(predicate::str::contains("supabase"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("strata")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_writes_skeleton_and_is_rerunnable() {
    let temp = initialised();
    let root = temp.path();
    assert!(root.join("strata.json").is_file());
    assert!(root.join("dbt/dbt_project.yml").is_file());
    assert!(root.join("dbt/models/staging").is_dir());
    assert!(root.join("dagster/orchestration/assets/__init__.py").is_file());
    assert!(root.join("supabase/migrations").is_dir());

    fs::write(root.join("strata.json"), "{ \"project\": { \"name\": \"edited\" } }\n").unwrap();
    strata(root).args(["init", "acme"]).assert().success();
    assert!(
        fs::read_to_string(root.join("strata.json"))
            .unwrap()
            .contains("edited")
    );
}

#[test]
fn model_is_written_into_its_layer_with_metadata() {
    let temp = initialised();
    let root = temp.path();

    strata(root)
        .args(["dbt", "model", "stg_users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stg_users"));

    let sql = fs::read_to_string(root.join("dbt/models/staging/stg_users.sql")).unwrap();
    assert!(sql.starts_with("{{ config(materialized='view') }}"));
    assert_eq!(
        fs::read_to_string(root.join("dbt/models/staging/schema.yml")).unwrap(),
        "version: 2\n\nmodels:\n  - name: stg_users\n"
    );
}

#[test]
fn model_flags_reach_header_and_metadata() {
    let temp = initialised();
    let root = temp.path();

    strata(root)
        .args([
            "dbt",
            "model",
            "fct_orders",
            "--materialized",
            "table",
            "--tag",
            "finance",
            "--description",
            "orders",
            "--column",
            "order_id:surrogate key",
            "--sql",
            "select * from {{ ref('stg_orders') }}",
        ])
        .assert()
        .success();

    let sql = fs::read_to_string(root.join("dbt/models/marts/fct_orders.sql")).unwrap();
    assert!(sql.contains("{{ config(materialized='table', tags=['finance']) }}"));
    assert!(sql.contains("select * from {{ ref('stg_orders') }}"));

    let schema = fs::read_to_string(root.join("dbt/models/marts/schema.yml")).unwrap();
    assert!(schema.contains("description: orders"));
    assert!(schema.contains("- name: order_id"));
    assert!(schema.contains("description: \"surrogate key\""));
}

#[test]
fn existing_model_is_not_overwritten_without_yes() {
    let temp = initialised();
    let root = temp.path();

    strata(root).args(["dbt", "model", "stg_users"]).assert().success();
    strata(root)
        .args(["dbt", "model", "stg_users", "--sql", "select 2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    strata(root)
        .args(["--yes", "dbt", "model", "stg_users", "--sql", "select 2"])
        .assert()
        .success();
    let sql = fs::read_to_string(root.join("dbt/models/staging/stg_users.sql")).unwrap();
    assert!(sql.contains("select 2"));
}

#[test]
fn ai_drafted_model_body() {
    let temp = initialised();
    let root = temp.path();

    strata(root)
        .args(["dbt", "model", "int_sessions", "--ai", "sessionize page views"])
        .assert()
        .success();

    let sql = fs::read_to_string(root.join("dbt/models/intermediate/int_sessions.sql")).unwrap();
    assert!(sql.contains("-- Drafted from: sessionize page views"));
    assert!(!sql.contains("```"));
}

#[test]
fn unsupported_schema_lines_fail_unless_lenient() {
    let temp = initialised();
    let root = temp.path();
    let schema = root.join("dbt/models/staging/schema.yml");
    fs::write(&schema, "version: 2\n\nsources:\n  - name: raw\n").unwrap();

    strata(root)
        .args(["dbt", "model", "stg_users"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("schema.yml"));
    assert!(fs::read_to_string(&schema).unwrap().contains("sources:"));

    strata(root)
        .args(["--lenient", "--yes", "dbt", "model", "stg_users"])
        .assert()
        .success();
    assert!(fs::read_to_string(&schema).unwrap().contains("- name: stg_users"));
}

#[test]
fn asset_registration_is_idempotent() {
    let temp = initialised();
    let root = temp.path();

    for _ in 0..2 {
        strata(root)
            .args(["--yes", "dagster", "asset", "raw_users", "--group", "ingest"])
            .assert()
            .success();
    }

    let index =
        fs::read_to_string(root.join("dagster/orchestration/assets/__init__.py")).unwrap();
    assert_eq!(index.matches("from .raw_users import raw_users").count(), 1);
    assert!(index.contains("__all__ = [\"raw_users\"]"));

    let asset = fs::read_to_string(root.join("dagster/orchestration/assets/raw_users.py")).unwrap();
    assert!(asset.contains("@asset(group_name=\"ingest\")"));
}

#[test]
fn schedule_requires_a_valid_job_name() {
    let temp = initialised();
    strata(temp.path())
        .args(["dagster", "schedule", "nightly", "--job", "not a job"])
        .assert()
        .code(2);
}

#[test]
fn schedule_is_registered() {
    let temp = initialised();
    let root = temp.path();

    strata(root).args(["dagster", "job", "refresh_job"]).assert().success();
    strata(root)
        .args(["dagster", "schedule", "nightly", "--job", "refresh_job", "--cron", "0 3 * * *"])
        .assert()
        .success();

    let index =
        fs::read_to_string(root.join("dagster/orchestration/schedules/__init__.py")).unwrap();
    assert!(index.contains("from .nightly import nightly"));
    let schedule =
        fs::read_to_string(root.join("dagster/orchestration/schedules/nightly.py")).unwrap();
    assert!(schedule.contains("cron_schedule=\"0 3 * * *\""));
}

#[test]
fn migration_gets_timestamp_prefix() {
    let temp = initialised();
    let root = temp.path();

    strata(root)
        .args(["supabase", "migration", "add_users_table"])
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(root.join("supabase/migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    let (version, rest) = names[0].split_once('_').unwrap();
    assert_eq!(version.len(), 14);
    assert!(version.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(rest, "add_users_table.sql");
}

#[test]
fn invalid_name_exits_with_user_error() {
    let temp = initialised();
    strata(temp.path())
        .args(["dbt", "model", "9-bad"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn ai_explain_missing_file_exits_not_found() {
    let temp = initialised();
    strata(temp.path())
        .args(["ai", "explain"])
        .arg(temp.path().join("nope.sql"))
        .assert()
        .code(3);
}

#[test]
fn ai_explain_uses_mock_provider() {
    let temp = initialised();
    let file = temp.path().join("query.sql");
    fs::write(&file, "select 1\n").unwrap();

    strata(temp.path())
        .args(["ai", "explain"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("[mock]"));
}

#[test]
fn unimplemented_provider_fails() {
    let temp = initialised();
    let file = temp.path().join("query.sql");
    fs::write(&file, "select 1\n").unwrap();

    strata(temp.path())
        .env("STRATA_AI__PROVIDER", "openai")
        .args(["ai", "optimize"])
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not implemented"));
}

#[test]
fn list_json_includes_generated_artifacts() {
    let temp = initialised();
    let root = temp.path();
    strata(root).args(["dbt", "model", "stg_users"]).assert().success();
    strata(root).args(["dagster", "asset", "raw_users"]).assert().success();

    let output = strata(root)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"stg_users"));
    assert!(names.contains(&"raw_users"));
}

#[test]
fn config_reads_project_file_and_env() {
    let temp = initialised();
    let root = temp.path();

    strata(root)
        .args(["config", "get", "dagster.package"])
        .assert()
        .success()
        .stdout(predicate::str::diff("orchestration\n"));

    strata(root)
        .env("STRATA_DBT__DEFAULT_MATERIALIZATION", "table")
        .args(["config", "get", "dbt.default_materialization"])
        .assert()
        .success()
        .stdout(predicate::str::diff("table\n"));
}

#[test]
fn unknown_config_key_exits_four() {
    let temp = initialised();
    strata(temp.path())
        .args(["config", "get", "nope.missing"])
        .assert()
        .code(4);
}

#[test]
fn missing_explicit_config_file_exits_four() {
    let temp = TempDir::new().unwrap();
    strata(temp.path())
        .arg("--config")
        .arg(temp.path().join("absent.json"))
        .arg("list")
        .assert()
        .code(4);
}

#[test]
fn missing_tool_binary_is_an_external_failure() {
    let temp = initialised();
    strata(temp.path())
        .env("PATH", "")
        .args(["dbt", "run", "--select", "stg_users"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dbt run --select stg_users"));
}

#[test]
fn completions_are_generated() {
    cargo::cargo_bin_cmd!("strata")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strata"));
}
