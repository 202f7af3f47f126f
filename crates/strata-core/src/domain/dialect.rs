//! Restricted YAML dialect for dbt `schema.yml` files.
//!
//! The reader understands exactly the shape [`serialize`] produces:
//!
//! ```yaml
//! version: 2
//!
//! models:
//!   - name: stg_users
//!     description: "Users from the app database"
//!     tests:
//!       - unique_id
//!     columns:
//!       - name: id
//!         description: "Primary key"
//!         tests:
//!           - not_null
//! ```
//!
//! Two-space indentation, block style only: no anchors, no flow mappings, no
//! multi-line scalars. Lines outside the dialect either fail the parse
//! ([`ParseMode::Strict`]) or are skipped and reported
//! ([`ParseMode::Lenient`]). Lenient rewrites drop skipped content.

use crate::domain::{
    entities::metadata::{ColumnRecord, MetadataDocument, ModelRecord},
    error::DomainError,
    value_objects::ParseMode,
};

/// A line the lenient reader did not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// Reader output: the recovered document and anything left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document: MetadataDocument,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Top,
    Models,
    Model,
    ModelTests,
    Columns,
    Column,
    ColumnTests,
}

struct Reader<'a> {
    source: &'a str,
    mode: ParseMode,
    version: u32,
    models: Vec<ModelRecord>,
    scope: Scope,
    model_indent: usize,
    column_indent: usize,
    /// Lines nested under a skipped key are skipped with it.
    skip_deeper_than: Option<usize>,
    skipped: Vec<SkippedLine>,
}

/// Parse `input` (the contents of `source`) into a metadata document.
///
/// A document without a `version:` header gets `default_version`.
pub fn parse(
    input: &str,
    source: &str,
    default_version: u32,
    mode: ParseMode,
) -> Result<ParsedDocument, DomainError> {
    let mut reader = Reader {
        source,
        mode,
        version: default_version,
        models: Vec::new(),
        scope: Scope::Top,
        model_indent: 0,
        column_indent: 0,
        skip_deeper_than: None,
        skipped: Vec::new(),
    };

    for (idx, raw) in input.lines().enumerate() {
        reader.line(idx + 1, raw)?;
    }

    Ok(ParsedDocument {
        document: MetadataDocument {
            version: reader.version,
            models: reader.models,
        },
        skipped: reader.skipped,
    })
}

impl Reader<'_> {
    fn line(&mut self, number: usize, raw: &str) -> Result<(), DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let body = raw.trim_start_matches(' ');
        if body.starts_with('\t') {
            return self.reject(number, raw, "tab indentation is not supported");
        }
        let indent = raw.len() - body.len();

        if let Some(limit) = self.skip_deeper_than {
            if indent > limit {
                return self.skip(number, raw, "nested under an unrecognised key");
            }
            self.skip_deeper_than = None;
        }

        if indent == 0 {
            return self.top_level(number, raw, trimmed);
        }

        if self.scope == Scope::Top {
            return self.reject(number, raw, "indented content before 'models:'");
        }

        if let Some(item) = list_item(trimmed) {
            return match key_value(item, "name") {
                Some(value) => self.name_item(number, raw, indent, value),
                None => self.test_item(number, raw, indent, item),
            };
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return self.reject(number, raw, "expected 'key: value'");
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "description" => self.description(number, raw, indent, value),
            "tests" => self.tests_block(number, raw, indent, value),
            "columns" => self.columns_block(number, raw, indent, value),
            _ => self.reject_nested(number, raw, indent, &format!("unrecognised key '{key}'")),
        }
    }

    fn top_level(&mut self, number: usize, raw: &str, trimmed: &str) -> Result<(), DomainError> {
        match trimmed.split_once(':').map(|(k, v)| (k.trim(), v.trim())) {
            Some(("version", value)) => match value.parse::<u32>() {
                Ok(version) => {
                    self.version = version;
                    Ok(())
                }
                Err(_) => self.reject(number, raw, "version must be a number"),
            },
            Some(("models", "" | "[]")) => {
                self.finish_model();
                self.scope = Scope::Models;
                Ok(())
            }
            Some((key, _)) => {
                let reason = format!("unrecognised top-level key '{key}'");
                self.finish_model();
                self.scope = Scope::Top;
                self.reject_nested(number, raw, 0, &reason)
            }
            None => self.reject(number, raw, "expected 'key: value'"),
        }
    }

    fn name_item(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        value: &str,
    ) -> Result<(), DomainError> {
        let name = match scalar(value) {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => return self.reject(number, raw, "empty name"),
            Err(reason) => return self.reject(number, raw, &reason),
        };

        let in_columns = matches!(
            self.scope,
            Scope::Columns | Scope::Column | Scope::ColumnTests
        );

        if self.scope == Scope::Models || indent <= self.model_indent {
            self.models.push(ModelRecord {
                name,
                ..ModelRecord::default()
            });
            self.model_indent = indent;
            self.scope = Scope::Model;
            return Ok(());
        }

        if in_columns {
            if let Some(model) = self.models.last_mut() {
                model.columns.push(ColumnRecord::new(name));
                self.column_indent = indent;
                self.scope = Scope::Column;
                return Ok(());
            }
        }

        self.reject(number, raw, "'- name:' outside a models or columns list")
    }

    fn test_item(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        item: &str,
    ) -> Result<(), DomainError> {
        let test = match scalar(item) {
            Ok(test) if !test.is_empty() => test,
            Ok(_) => return self.reject(number, raw, "empty list item"),
            Err(reason) => return self.reject(number, raw, &reason),
        };

        match self.scope {
            Scope::ModelTests if indent > self.model_indent => {
                if let Some(model) = self.models.last_mut() {
                    model.tests.push(test);
                }
                Ok(())
            }
            Scope::ColumnTests if indent > self.column_indent => {
                if let Some(column) = self.current_column() {
                    column.tests.push(test);
                }
                Ok(())
            }
            _ => self.reject(number, raw, "list item outside a tests block"),
        }
    }

    fn description(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        value: &str,
    ) -> Result<(), DomainError> {
        let text = match scalar(value) {
            Ok(text) => text,
            Err(reason) => return self.reject(number, raw, &reason),
        };

        if self.in_column_scope() && indent > self.column_indent {
            if let Some(column) = self.current_column() {
                column.description = Some(text);
            }
            self.scope = Scope::Column;
            return Ok(());
        }

        if self.has_model() && indent > self.model_indent {
            if let Some(model) = self.models.last_mut() {
                model.description = Some(text);
            }
            self.scope = Scope::Model;
            return Ok(());
        }

        self.reject(number, raw, "description outside a model or column")
    }

    fn tests_block(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        value: &str,
    ) -> Result<(), DomainError> {
        if !matches!(value, "" | "[]") {
            return self.reject_nested(number, raw, indent, "tests must be a block list");
        }

        if self.in_column_scope() && indent > self.column_indent {
            self.scope = Scope::ColumnTests;
            return Ok(());
        }
        if self.has_model() && indent > self.model_indent {
            self.scope = Scope::ModelTests;
            return Ok(());
        }

        self.reject_nested(number, raw, indent, "tests outside a model or column")
    }

    fn columns_block(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        value: &str,
    ) -> Result<(), DomainError> {
        if !matches!(value, "" | "[]") {
            return self.reject_nested(number, raw, indent, "columns must be a block list");
        }
        if self.has_model() && indent > self.model_indent && !self.in_column_scope() {
            self.scope = Scope::Columns;
            return Ok(());
        }
        self.reject_nested(number, raw, indent, "columns outside a model")
    }

    fn has_model(&self) -> bool {
        !matches!(self.scope, Scope::Top | Scope::Models) && !self.models.is_empty()
    }

    fn in_column_scope(&self) -> bool {
        matches!(self.scope, Scope::Column | Scope::ColumnTests)
    }

    fn current_column(&mut self) -> Option<&mut ColumnRecord> {
        self.models.last_mut().and_then(|m| m.columns.last_mut())
    }

    fn finish_model(&mut self) {
        self.model_indent = 0;
        self.column_indent = 0;
    }

    /// Reject a line and everything indented beneath it.
    fn reject_nested(
        &mut self,
        number: usize,
        raw: &str,
        indent: usize,
        reason: &str,
    ) -> Result<(), DomainError> {
        self.reject(number, raw, reason)?;
        self.skip_deeper_than = Some(indent);
        Ok(())
    }

    fn reject(&mut self, number: usize, raw: &str, reason: &str) -> Result<(), DomainError> {
        match self.mode {
            ParseMode::Strict => Err(DomainError::ParseAmbiguous {
                document: self.source.to_string(),
                line: number,
                reason: reason.to_string(),
            }),
            ParseMode::Lenient => self.skip(number, raw, reason),
        }
    }

    fn skip(&mut self, number: usize, raw: &str, reason: &str) -> Result<(), DomainError> {
        if self.mode == ParseMode::Strict {
            return self.reject(number, raw, reason);
        }
        self.skipped.push(SkippedLine {
            line: number,
            content: raw.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }
}

fn list_item(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix("- ").map(str::trim)
}

fn key_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.strip_prefix(key)?.strip_prefix(':').map(str::trim)
}

/// Decode one scalar value.
fn scalar(value: &str) -> Result<String, String> {
    let value = value.trim();

    if let Some(rest) = value.strip_prefix('"') {
        let inner = rest
            .strip_suffix('"')
            .ok_or_else(|| "unterminated double-quoted string".to_string())?;
        return unescape(inner);
    }

    if let Some(rest) = value.strip_prefix('\'') {
        let inner = rest
            .strip_suffix('\'')
            .ok_or_else(|| "unterminated single-quoted string".to_string())?;
        return Ok(inner.replace("''", "'"));
    }

    if value.starts_with(['[', '{', '&', '*', '|', '>', '!']) {
        return Err(format!("unsupported YAML construct '{value}'"));
    }

    let plain = match value.find(" #") {
        Some(comment) => value[..comment].trim_end(),
        None => value,
    };
    Ok(plain.to_string())
}

fn unescape(inner: &str) -> Result<String, String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if c == '"' {
                return Err("unescaped quote inside string".into());
            }
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(format!("unsupported escape '\\{other}'")),
            None => return Err("dangling escape".into()),
        }
    }
    Ok(out)
}

/// Render a scalar so that [`scalar`] reads it back unchanged.
fn write_scalar(value: &str) -> String {
    let plain_safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        && !value.starts_with('-')
        && value.parse::<f64>().is_err()
        && !matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "null" | "on" | "off"
        );

    if plain_safe {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Serialize a metadata document deterministically.
pub fn serialize(document: &MetadataDocument) -> String {
    let mut out = format!("version: {}\n\n", document.version);

    if document.models.is_empty() {
        out.push_str("models: []\n");
        return out;
    }

    out.push_str("models:\n");
    for (i, model) in document.models.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("  - name: {}\n", write_scalar(&model.name)));
        if let Some(description) = &model.description {
            out.push_str(&format!("    description: {}\n", write_scalar(description)));
        }
        if !model.tests.is_empty() {
            out.push_str("    tests:\n");
            for test in &model.tests {
                out.push_str(&format!("      - {}\n", write_scalar(test)));
            }
        }
        if !model.columns.is_empty() {
            out.push_str("    columns:\n");
            for column in &model.columns {
                out.push_str(&format!("      - name: {}\n", write_scalar(&column.name)));
                if let Some(description) = &column.description {
                    out.push_str(&format!(
                        "        description: {}\n",
                        write_scalar(description)
                    ));
                }
                if !column.tests.is_empty() {
                    out.push_str("        tests:\n");
                    for test in &column.tests {
                        out.push_str(&format!("          - {}\n", write_scalar(test)));
                    }
                }
            }
        }
    }

    out
}
