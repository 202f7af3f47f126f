//! Project skeleton written by `strata init`.

use std::collections::HashMap;
use std::path::Path;

use serde_json::json;
use strata_core::{
    application::{ApplicationError, GeneratorSettings},
    domain::{ModelLayer, ProjectStructure},
    error::StrataResult,
};

const DBT_PROJECT: &str = r#"name: '{{PROJECT_NAME_SNAKE}}'
version: '1.0.0'
config-version: 2

profile: '{{PROJECT_NAME_SNAKE}}'

model-paths: ["models"]
test-paths: ["tests"]
macro-paths: ["macros"]

target-path: "target"
clean-targets:
  - "target"
  - "dbt_packages"

models:
  {{PROJECT_NAME_SNAKE}}:
    staging:
      +materialized: view
    intermediate:
      +materialized: ephemeral
    marts:
      +materialized: table
"#;

const PACKAGE_INIT: &str = r#""""Dagster code location for {{PROJECT_NAME}}."""

from .definitions import defs

__all__ = ["defs"]
"#;

const DEFINITIONS: &str = r#"from dagster import Definitions, load_assets_from_package_module

from . import assets, jobs, schedules

defs = Definitions(
    assets=load_assets_from_package_module(assets),
    jobs=[getattr(jobs, name) for name in jobs.__all__],
    schedules=[getattr(schedules, name) for name in schedules.__all__],
)
"#;

const EMPTY_INDEX: &str = "__all__ = []\n";

const GITIGNORE: &str = "\
.env
__pycache__/
*.pyc
dbt/target/
dbt/dbt_packages/
dbt/logs/
.dagster/
supabase/.branches/
supabase/.temp/
";

/// `{{KEY}}` placeholder substitution.
struct Vars(HashMap<&'static str, String>);

impl Vars {
    fn for_project(name: &str) -> Self {
        let mut vars = HashMap::new();
        vars.insert("PROJECT_NAME", name.to_string());
        vars.insert("PROJECT_NAME_SNAKE", to_snake_case(name));
        Self(vars)
    }

    fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.0 {
            result = result.replace(&format!("{{{{{key}}}}}"), value);
        }
        result
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let out = out.trim_matches('_').to_string();
    match out.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{out}"),
        Some(_) => out,
        None => "project".to_string(),
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Everything `init` writes, relative to the project root.
pub fn project(name: &str, settings: &GeneratorSettings) -> StrataResult<ProjectStructure> {
    let vars = Vars::for_project(name);
    let layout = &settings.layout;

    let package = &layout.dagster_package;
    let dagster_dir = package.parent().map(Path::to_path_buf).unwrap_or_default();

    let config = json!({
        "project": {
            "name": name,
            "schema_version": settings.schema_version,
        },
        "dbt": {
            "project_dir": display(&layout.dbt_project),
            "default_materialization": settings.default_materialization.as_str(),
        },
        "dagster": {
            "project_dir": display(&dagster_dir),
            "package": settings.dagster_module,
        },
        "supabase": {
            "project_dir": display(layout.supabase_project.parent().unwrap_or(Path::new(""))),
        },
        "ai": {
            "provider": settings.ai.provider.as_str(),
            "model": settings.ai.model,
            "temperature": settings.ai.temperature,
            "max_tokens": settings.ai.max_tokens,
        },
    });
    let config = serde_json::to_string_pretty(&config).map_err(|e| {
        ApplicationError::RenderingFailed {
            reason: format!("strata.json: {e}"),
        }
    })?;

    let mut structure = ProjectStructure::new(settings.project_root.clone())
        .with_file("strata.json", format!("{config}\n"))
        .with_file(".gitignore", GITIGNORE)
        .with_file(
            layout.dbt_project.join("dbt_project.yml"),
            vars.render(DBT_PROJECT),
        );

    for layer in ModelLayer::ALL {
        structure.add_directory(layout.layer_dir(layer));
    }
    structure.add_directory(layout.dbt_project.join("tests"));
    structure.add_directory(layout.dbt_project.join("macros"));

    structure.add_file(package.join("__init__.py"), vars.render(PACKAGE_INIT));
    structure.add_file(package.join("definitions.py"), DEFINITIONS);
    for sub in ["assets", "jobs", "schedules"] {
        structure.add_file(package.join(sub).join("__init__.py"), EMPTY_INDEX);
    }

    structure.add_directory(layout.migrations_dir());

    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::FsEntry;

    #[test]
    fn snake_case_names() {
        assert_eq!(to_snake_case("Acme Analytics"), "acme_analytics");
        assert_eq!(to_snake_case("my-proj"), "my_proj");
        assert_eq!(to_snake_case("42 things"), "_42_things");
        assert_eq!(to_snake_case("--"), "project");
    }

    #[test]
    fn skeleton_is_relative_and_valid() {
        let settings = GeneratorSettings::default();
        let structure = project("Acme", &settings).unwrap();
        structure.validate().unwrap();

        let files: Vec<String> = structure
            .files()
            .map(|f| display(&f.path))
            .collect();
        assert!(files.contains(&"strata.json".to_string()));
        assert!(files.contains(&"dbt/dbt_project.yml".to_string()));
        assert!(files.contains(&"dagster/orchestration/assets/__init__.py".to_string()));
        assert!(
            structure
                .entries()
                .iter()
                .any(|e| matches!(e, FsEntry::Directory(d) if d.path.ends_with("migrations")))
        );
    }

    #[test]
    fn config_mirrors_settings() {
        let settings = GeneratorSettings::default();
        let structure = project("acme", &settings).unwrap();
        let config = structure
            .files()
            .find(|f| f.path == Path::new("strata.json"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&config.content).unwrap();
        assert_eq!(value["project"]["name"], "acme");
        assert_eq!(value["dagster"]["project_dir"], "dagster");
        assert_eq!(value["dagster"]["package"], "orchestration");
        assert_eq!(value["dbt"]["default_materialization"], "view");
    }

    #[test]
    fn dbt_project_uses_snake_name() {
        let rendered = Vars::for_project("Acme Co").render(DBT_PROJECT);
        assert!(rendered.starts_with("name: 'acme_co'"));
        assert!(!rendered.contains("{{"));
    }
}
