//! Configuration headers: detect, replace, insert.
//!
//! A header is matched by shape (a `{{ config(...) }}` call for SQL, an
//! `@asset`/`@job`/`@schedule` decorator for Python), never by exact text,
//! so regenerating with new options rewrites it in place. Either may span
//! several lines; the whole expression is replaced by the one-line header.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

static SQL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{\{-?\s*config\s*\(.*\)\s*-?\}\}\s*$").expect("valid header regex")
});

static PYTHON_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@(?:dagster\.)?(?:asset|job|schedule)\b").expect("valid decorator regex")
});

static DAGSTER_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*from\s+dagster\s+import\s+\(?([^)]*)\)?\s*$").expect("valid import regex")
});

/// Apply `header` to SQL `body`.
///
/// Only a header at the top counts: the first line after leading comments
/// and blank lines.
pub fn apply_sql(body: &str, header: &str) -> String {
    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();
    let at = first_substantive(&lines, is_sql_comment);

    match sql_header_at(&lines, at) {
        Some(range) => {
            lines.splice(range, [header.to_string()]);
        }
        None => lines.insert(at, header.to_string()),
    }

    finish(lines)
}

/// Apply a Dagster decorator `header` to Python `body`, making sure the
/// decorator's name is imported from `dagster`.
pub fn apply_python(body: &str, header: &str, decorator: &str) -> String {
    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();

    let at = match python_decorator(&lines) {
        Some(range) => {
            let at = *range.start();
            lines.splice(range, [header.to_string()]);
            at
        }
        None => {
            let at = python_preamble_end(&lines);
            lines.insert(at, header.to_string());
            at
        }
    };

    if !imports_name(&lines, decorator) {
        let import_at = lines[..at]
            .iter()
            .rposition(|l| is_import(l))
            .map_or_else(|| first_substantive(&lines[..at], is_python_comment), |i| i + 1);
        lines.insert(import_at, format!("from dagster import {decorator}"));

        let next_is_code = lines
            .get(import_at + 1)
            .is_some_and(|l| !l.trim().is_empty() && !is_import(l));
        if next_is_code {
            lines.insert(import_at + 1, String::new());
            lines.insert(import_at + 1, String::new());
        }
    }

    finish(lines)
}

/// Lines of a `{{ config(...) }}` block starting at `start`, if there is one.
fn sql_header_at(lines: &[String], start: usize) -> Option<RangeInclusive<usize>> {
    if !lines.get(start)?.trim_start().starts_with("{{") {
        return None;
    }
    let end = (start..lines.len()).find(|&i| lines[i].contains("}}"))?;
    let joined = lines[start..=end]
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join(" ");
    SQL_HEADER.is_match(&joined).then_some(start..=end)
}

/// Lines of the first Dagster decorator, following its parentheses.
fn python_decorator(lines: &[String]) -> Option<RangeInclusive<usize>> {
    let start = lines.iter().position(|l| PYTHON_DECORATOR.is_match(l))?;
    let mut depth = 0i32;
    for (i, line) in lines.iter().enumerate().skip(start) {
        depth += paren_delta(line);
        if depth <= 0 {
            return Some(start..=i);
        }
    }
    // Never closed: leave the rest of the file alone.
    Some(start..=start)
}

/// Net `(` minus `)` outside string literals and comments.
fn paren_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in line.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' => break,
                '(' => delta += 1,
                ')' => delta -= 1,
                _ => {}
            },
        }
    }
    delta
}

/// Index of the first line that is neither blank nor skippable.
fn first_substantive(lines: &[String], skippable: impl Fn(&str) -> bool) -> usize {
    lines
        .iter()
        .position(|l| !l.trim().is_empty() && !skippable(l))
        .unwrap_or(lines.len())
}

/// End of the module preamble: comments, blank lines, imports and a module
/// docstring.
fn python_preamble_end(lines: &[String]) -> usize {
    let mut open_quote: Option<&str> = None;
    for (i, line) in lines.iter().enumerate() {
        let t = line.trim();
        if let Some(quote) = open_quote {
            if t.contains(quote) {
                open_quote = None;
            }
            continue;
        }
        if t.is_empty() || is_python_comment(t) || is_import(t) {
            continue;
        }
        match ["\"\"\"", "'''"].into_iter().find(|q| t.starts_with(q)) {
            Some(quote) => {
                if !t[quote.len()..].contains(quote) {
                    open_quote = Some(quote);
                }
            }
            None => return i,
        }
    }
    lines.len()
}

fn is_sql_comment(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("--")
        || (t.starts_with("{#") && t.ends_with("#}"))
        || (t.starts_with("/*") && t.ends_with("*/"))
}

fn is_python_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_import(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("import ") || (t.starts_with("from ") && t.contains(" import "))
}

fn imports_name(lines: &[String], name: &str) -> bool {
    lines.iter().any(|l| {
        DAGSTER_IMPORT.captures(l).is_some_and(|caps| {
            caps[1].split(',').any(|item| {
                let item = item.trim();
                item == name || item.starts_with(&format!("{name} as "))
            })
        })
    })
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Quote a Python string literal.
pub fn py_str(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

/// Quote a Jinja (SQL header) string literal.
pub fn jinja_str(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
