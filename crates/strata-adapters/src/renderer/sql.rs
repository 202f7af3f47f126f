//! dbt model and Supabase migration content.

use strata_core::domain::{ArtifactDescriptor, Materialization};

use super::header::{self, jinja_str};

/// `{{ config(materialized='<m>'[, tags=[...]]) }}`
pub fn config_header(materialized: Materialization, tags: &[String]) -> String {
    let mut args = format!("materialized={}", jinja_str(materialized.as_str()));
    if !tags.is_empty() {
        let quoted: Vec<String> = tags.iter().map(|t| jinja_str(t)).collect();
        args.push_str(&format!(", tags=[{}]", quoted.join(", ")));
    }
    format!("{{{{ config({args}) }}}}")
}

pub fn model(descriptor: &ArtifactDescriptor, default: Materialization) -> String {
    let params = descriptor.params();
    let header = config_header(descriptor.materialization_or(default), &params.tags);

    match &params.body {
        Some(body) => header::apply_sql(body, &header),
        None => format!("{header}\n\n{}", default_model_body(descriptor)),
    }
}

fn default_model_body(descriptor: &ArtifactDescriptor) -> String {
    let mut out = String::new();
    if let Some(description) = &descriptor.params().description {
        for line in description.lines() {
            out.push_str(&format!("-- {line}\n"));
        }
    }
    out.push_str(&format!(
        "-- TODO: replace this placeholder with the {} query.\nselect 1 as id\n",
        descriptor.name()
    ));
    out
}

/// Migrations carry no header; a supplied body is used as-is.
pub fn migration(descriptor: &ArtifactDescriptor) -> String {
    match &descriptor.params().body {
        Some(body) if body.ends_with('\n') => body.clone(),
        Some(body) => format!("{body}\n"),
        None => format!(
            "-- Migration: {}\n\n-- TODO: write the schema change.\n",
            descriptor.name()
        ),
    }
}
