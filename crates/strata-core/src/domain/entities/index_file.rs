//! Python `__init__.py` index documents.
//!
//! An index re-exports every generated module in its directory so that
//! Dagster's package-level loading picks new artifacts up automatically:
//!
//! ```text
//! from .a1 import a1
//! from .a2 import a2
//!
//! __all__ = ["a1", "a2"]
//! ```
//!
//! Merging is a best-effort textual transform. It never fails: when the
//! existing `__all__` construct cannot be read, a fresh one is appended and
//! the outcome says so.

use std::fmt;

const EXPORTS_KEY: &str = "__all__";

/// One registration: `from .<module> import <symbol>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub symbol: String,
    pub module: String,
}

impl IndexEntry {
    /// Entry whose module shares the symbol's name.
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            module: symbol.clone(),
            symbol,
        }
    }

    pub fn with_module(symbol: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            module: module.into(),
        }
    }

    pub fn import_line(&self) -> String {
        format!("from .{} import {}", self.module, self.symbol)
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.import_line())
    }
}

/// Result of merging an entry into an index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The import line was already present; nothing to write.
    Unchanged,
    /// New document content.
    Updated(String),
    /// New document content produced by the fallback path.
    Recovered { content: String, reason: String },
}

impl MergeOutcome {
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Updated(content) | Self::Recovered { content, .. } => Some(content),
        }
    }
}

/// Location and members of a parsed `__all__` list.
#[derive(Debug, PartialEq, Eq)]
struct ExportList {
    first_line: usize,
    last_line: usize,
    members: Vec<String>,
}

/// Merge `entry` into the index document `existing` (empty for a new file).
pub fn merge(existing: &str, entry: &IndexEntry) -> MergeOutcome {
    let import_line = entry.import_line();
    let lines: Vec<&str> = existing.lines().collect();

    if lines.iter().any(|line| line.trim() == import_line) {
        return MergeOutcome::Unchanged;
    }

    match find_exports(&lines) {
        Ok(Some(exports)) => {
            let mut members = exports.members;
            if !members.iter().any(|m| m == &entry.symbol) {
                members.push(entry.symbol.clone());
            }

            let body: Vec<&str> = lines
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < exports.first_line || *i > exports.last_line)
                .map(|(_, line)| *line)
                .collect();

            MergeOutcome::Updated(assemble(&body, &import_line, &members))
        }
        Ok(None) => MergeOutcome::Updated(assemble(
            &lines,
            &import_line,
            &imported_with(existing, &entry.symbol),
        )),
        Err(reason) => MergeOutcome::Recovered {
            content: assemble(&lines, &import_line, &imported_with(existing, &entry.symbol)),
            reason,
        },
    }
}

/// Symbols already imported by `document`, plus `symbol`.
fn imported_with(document: &str, symbol: &str) -> Vec<String> {
    let mut members = Vec::new();
    for name in registered_symbols(document)
        .into_iter()
        .chain(std::iter::once(symbol.to_string()))
    {
        if !members.contains(&name) {
            members.push(name);
        }
    }
    members
}

/// Every symbol currently imported by the document, in order.
pub fn registered_symbols(document: &str) -> Vec<String> {
    document
        .lines()
        .filter_map(|line| line.trim().strip_prefix("from ."))
        .filter_map(|rest| rest.split_once(" import "))
        .flat_map(|(_, names)| names.split(','))
        .filter_map(|name| name.split_whitespace().last())
        .map(str::to_string)
        .collect()
}

/// Render the exported-symbols construct.
pub fn render_exports(members: &[String]) -> String {
    let quoted: Vec<String> = members.iter().map(|m| format!("\"{m}\"")).collect();
    format!("{EXPORTS_KEY} = [{}]", quoted.join(", "))
}

fn assemble(body: &[&str], import_line: &str, members: &[String]) -> String {
    let mut lines: Vec<String> = body.iter().map(|l| l.to_string()).collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.push(import_line.to_string());
    lines.push(String::new());
    lines.push(render_exports(members));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Locate and parse the last readable `__all__ = [...]` construct.
///
/// `Ok(None)` when the document has none; `Err` when every one present has
/// an unexpected shape. Earlier unreadable assignments are left in place.
fn find_exports(lines: &[&str]) -> Result<Option<ExportList>, String> {
    let candidates: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| {
            l.trim_start()
                .strip_prefix(EXPORTS_KEY)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        })
        .map(|(i, _)| i)
        .collect();

    let mut failure = None;
    for &first_line in candidates.iter().rev() {
        match parse_exports(lines, first_line) {
            Ok(exports) => return Ok(Some(exports)),
            Err(reason) => {
                failure.get_or_insert(reason);
            }
        }
    }
    failure.map_or(Ok(None), Err)
}

fn parse_exports(lines: &[&str], first_line: usize) -> Result<ExportList, String> {
    let start = lines[first_line].trim_start();
    let after_eq = start[EXPORTS_KEY.len()..]
        .trim_start()
        .trim_start_matches('=')
        .trim_start();

    let Some(open) = after_eq.strip_prefix('[') else {
        return Err(format!(
            "line {}: {EXPORTS_KEY} is not a list literal",
            first_line + 1
        ));
    };

    let mut collected = String::new();
    let mut last_line = first_line;
    let mut fragment = open;
    loop {
        // Members are bare identifiers, so `#` always starts a comment.
        let fragment_code = fragment.split('#').next().unwrap_or_default();
        if let Some(close) = fragment_code.find(']') {
            collected.push_str(&fragment_code[..close]);
            let trailing = fragment_code[close + 1..].trim();
            if !trailing.is_empty() {
                return Err(format!(
                    "line {}: unexpected text after {EXPORTS_KEY} list",
                    last_line + 1
                ));
            }
            break;
        }
        collected.push_str(fragment_code);
        collected.push(',');
        last_line += 1;
        match lines.get(last_line) {
            Some(next) => fragment = next,
            None => {
                return Err(format!(
                    "line {}: {EXPORTS_KEY} list is never closed",
                    first_line + 1
                ));
            }
        }
    }

    let mut members = Vec::new();
    for raw in collected.split(',') {
        let member = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if member.is_empty() {
            continue;
        }
        if !member.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!(
                "line {}: cannot read {EXPORTS_KEY} member '{member}'",
                first_line + 1
            ));
        }
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
    }

    Ok(ExportList {
        first_line,
        last_line,
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(doc: &str, symbol: &str) -> String {
        match merge(doc, &IndexEntry::new(symbol)) {
            MergeOutcome::Unchanged => doc.to_string(),
            MergeOutcome::Updated(c) => c,
            MergeOutcome::Recovered { content, .. } => content,
        }
    }

    #[test]
    fn creates_document_from_empty() {
        let doc = apply("", "a1");
        assert_eq!(doc, "from .a1 import a1\n\n__all__ = [\"a1\"]\n");
    }

    #[test]
    fn second_registration_is_a_no_op() {
        let once = apply("", "a1");
        assert_eq!(merge(&once, &IndexEntry::new("a1")), MergeOutcome::Unchanged);
        assert_eq!(apply(&once, "a1"), once);
    }

    #[test]
    fn appends_and_preserves_member_order() {
        let doc = apply(&apply(&apply("", "b"), "a"), "c");
        assert_eq!(
            doc,
            "from .b import b\nfrom .a import a\nfrom .c import c\n\n__all__ = [\"b\", \"a\", \"c\"]\n"
        );
    }

    #[test]
    fn reads_multi_line_and_single_quoted_lists() {
        let existing = "\"\"\"Assets.\"\"\"\nfrom .x import x\nfrom .y import y\n\n__all__ = [\n    'x',\n    'y',\n]\n";
        let doc = apply(existing, "z");
        assert!(doc.starts_with("\"\"\"Assets.\"\"\"\n"));
        assert!(doc.ends_with("__all__ = [\"x\", \"y\", \"z\"]\n"));
        assert_eq!(doc.matches("__all__").count(), 1);
    }

    #[test]
    fn creates_exports_when_missing() {
        let existing = "from .legacy import legacy\n";
        let doc = apply(existing, "fresh");
        assert_eq!(
            doc,
            "from .legacy import legacy\nfrom .fresh import fresh\n\n__all__ = [\"legacy\", \"fresh\"]\n"
        );
    }

    #[test]
    fn unreadable_exports_fall_back_to_fresh_construct() {
        let existing = "from .x import x\n__all__ = build_exports()\n";
        let outcome = merge(existing, &IndexEntry::new("y"));
        match outcome {
            MergeOutcome::Recovered { content, reason } => {
                assert!(reason.contains("not a list literal"));
                assert!(content.contains("__all__ = build_exports()"));
                assert!(content.ends_with("from .y import y\n\n__all__ = [\"x\", \"y\"]\n"));
            }
            other => panic!("expected recovery, got {other:?}"),
        }
    }

    #[test]
    fn registrations_after_recovery_extend_the_readable_list() {
        let existing = "from .x import x\n__all__ = build_exports()\n";
        let once = apply(existing, "y");

        let outcome = merge(&once, &IndexEntry::new("z"));
        let MergeOutcome::Updated(twice) = outcome else {
            panic!("expected a plain update, got {outcome:?}");
        };
        assert_eq!(twice.matches("__all__ =").count(), 2);
        assert!(twice.starts_with("from .x import x\n__all__ = build_exports()\n"));
        assert!(twice.ends_with(
            "from .y import y\nfrom .z import z\n\n__all__ = [\"x\", \"y\", \"z\"]\n"
        ));
    }

    #[test]
    fn trailing_comments_inside_list_are_ignored() {
        let existing = "from .x import x\n\n__all__ = [  # public\n    \"x\",  # legacy\n]\n";
        let outcome = merge(existing, &IndexEntry::new("y"));
        let MergeOutcome::Updated(doc) = outcome else {
            panic!("expected a plain update, got {outcome:?}");
        };
        assert_eq!(
            doc,
            "from .x import x\nfrom .y import y\n\n__all__ = [\"x\", \"y\"]\n"
        );
    }

    #[test]
    fn unclosed_list_falls_back() {
        let existing = "__all__ = [\n    \"x\",\n";
        assert!(matches!(
            merge(existing, &IndexEntry::new("y")),
            MergeOutcome::Recovered { .. }
        ));
    }

    #[test]
    fn symbol_already_exported_is_not_duplicated() {
        let existing = "__all__ = [\"a\"]\n";
        let doc = apply(existing, "a");
        assert_eq!(doc, "from .a import a\n\n__all__ = [\"a\"]\n");
    }

    #[test]
    fn module_can_differ_from_symbol() {
        let entry = IndexEntry::with_module("daily_refresh_job", "daily_refresh");
        let doc = merge("", &entry).content().unwrap().to_string();
        assert!(doc.starts_with("from .daily_refresh import daily_refresh_job\n"));
    }

    #[test]
    fn lists_registered_symbols() {
        let doc = apply(&apply("", "a"), "b");
        assert_eq!(registered_symbols(&doc), vec!["a", "b"]);
        assert_eq!(
            registered_symbols("from .jobs import nightly, hourly as h\n"),
            vec!["nightly", "h"]
        );
    }
}
