//! Comment groups, doc comment lookup and the name → comment map.
//!
//! The name map is a heuristic: a comment is filed under its first word when
//! that word names something visible where the comment sits. Unconventionally
//! phrased comments can end up under the wrong name.

use std::collections::{BTreeMap, HashSet};

use crate::ast::SourceFile;
use crate::diagnostics::Pos;
use crate::lexer::RawComment;

/// Names visible in every file without a declaration: predeclared types,
/// constants and built-in functions.
pub const UNIVERSE: [&str; 44] = [
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "true", "false", "iota", "nil", "append", "cap", "clear",
    "close", "complex", "copy", "delete", "imag", "len", "make", "max", "min", "new", "panic",
    "print", "println", "real", "recover",
];

/// Adjacent comments merged into one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Text with markers removed, trimmed.
    pub text: String,
    pub start: Pos,
    pub end_line: u32,
    /// The group starts on a line of its own.
    pub own_line: bool,
}

/// Merge raw comments into groups.
///
/// A comment that shares its line with code stands alone; comments on their
/// own consecutive lines merge.
pub fn group(raw: Vec<RawComment>) -> Vec<CommentGroup> {
    let mut groups: Vec<(Vec<RawComment>, bool)> = Vec::new();
    for comment in raw {
        if let Some((members, own_line)) = groups.last_mut() {
            let last_end = members.last().map_or(0, |c| c.end_line);
            if *own_line && comment.own_line && comment.start.line == last_end + 1 {
                members.push(comment);
                continue;
            }
        }
        let own_line = comment.own_line;
        groups.push((vec![comment], own_line));
    }
    groups
        .into_iter()
        .filter_map(|(members, own_line)| {
            let first = members.first()?;
            let last = members.last()?;
            Some(CommentGroup {
                start: first.start,
                end_line: last.end_line,
                own_line,
                text: text_of(&members),
            })
        })
        .collect()
}

fn text_of(members: &[RawComment]) -> String {
    let lines: Vec<&str> = members
        .iter()
        .flat_map(|c| c.lines.iter())
        .map(|line| {
            let line = line.as_str();
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();
    lines.join("\n").trim().to_string()
}

/// The doc comment of something that starts on `line`: an own-line group
/// ending on the line just before it.
pub fn doc_for(groups: &[CommentGroup], line: u32) -> String {
    groups
        .iter()
        .find(|g| g.own_line && g.end_line + 1 == line)
        .map(|g| g.text.clone())
        .unwrap_or_default()
}

/// Build the name → comment map for a package.
///
/// Lookup walks file scope (imports), then package scope (`declared`), then
/// the universe. Later comments overwrite earlier ones.
pub fn harvest(files: &[SourceFile], declared: &HashSet<&str>) -> BTreeMap<String, String> {
    let mut comments = BTreeMap::new();
    for file in files {
        for group in &file.comments {
            if group.text.is_empty() {
                continue;
            }
            let Some(subject) = group.text.split(' ').next() else {
                continue;
            };
            let visible = file.imports_namespace(subject)
                || declared.contains(subject)
                || UNIVERSE.contains(&subject);
            if visible {
                comments.insert(subject.to_string(), group.text.clone());
            }
        }
    }
    comments
}
