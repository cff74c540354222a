//! Indented textual outline of a mind map (`mindmap` header, two spaces per level).


use std::collections::HashSet;

use crate::model::TagCategory;
use crate::tree::MindMap;
use crate::{Error, Result};

pub const OUTLINE_HEADER: &str = "mindmap";

const INDENT: &str = "  ";
const ROOT_OPEN: &str = "root((";
const ROOT_CLOSE: &str = "))";

/// One parsed outline line. The root sits at depth 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub text: String,
}

/// Stands in for empty text, which would otherwise leave a bare indent or `root(())`.
///
/// Escaped text never contains a literal `"`, so this cannot collide with real content.
const EMPTY_TEXT: &str = "\"\"";

/// Escapes the characters that carry meaning in outline syntax.
///
/// `&` goes first so that the result always unescapes back to the input. Leading and trailing
/// whitespace is written as numeric entities because indentation and line ends are trimmed.
pub fn escape_outline_text(text: &str) -> String {
    if text.is_empty() {
        return EMPTY_TEXT.to_string();
    }
    let lead_end = text.len() - text.trim_start().len();
    let trail_start = text.trim_end().len();

    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '&' => out.push_str("&amp;"),
            ':' => out.push_str("&#58;"),
            '(' => out.push_str("&#40;"),
            ')' => out.push_str("&#41;"),
            '[' => out.push_str("&#91;"),
            ']' => out.push_str("&#93;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if c.is_whitespace() && (i < lead_end || i >= trail_start) => {
                out.push_str(&format!("&#{};", u32::from(c)));
            }
            _ => out.push(ch),
        }
    }
    out
}

pub fn unescape_outline_text(text: &str) -> String {
    if text == EMPTY_TEXT {
        return String::new();
    }
    htmlize::unescape(text).into_owned()
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

fn push_root(out: &mut String, text: &str) {
    push_line(
        out,
        1,
        &format!("{ROOT_OPEN}{}{ROOT_CLOSE}", escape_outline_text(text)),
    );
}

/// Pre-order outline of `tree`, following [`MindMap::child_lists`].
pub fn serialize_outline(tree: &MindMap) -> String {
    let mut out = String::new();
    out.push_str(OUTLINE_HEADER);
    out.push('\n');

    let Some(root) = tree.root() else {
        tracing::warn!(map = %tree.id, "mind map has no root entry, emitting header only");
        return out;
    };
    push_root(&mut out, &root.text);

    let lists = tree.child_lists();
    let children = |id: &str| lists.get(id).map(Vec::as_slice).unwrap_or_default();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(root.id.as_str());
    let mut stack: Vec<(&str, usize)> = children(root.id.as_str())
        .iter()
        .rev()
        .map(|&c| (c, 2))
        .collect();
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        push_line(&mut out, depth, &escape_outline_text(&node.text));
        for &child in children(id).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}

/// Outline of a category forest hung under a synthetic root labelled `root_label`.
pub fn serialize_taxonomy_outline(root_label: &str, forest: &[TagCategory]) -> String {
    let mut out = String::new();
    out.push_str(OUTLINE_HEADER);
    out.push('\n');
    push_root(&mut out, root_label);

    let mut stack: Vec<(&TagCategory, usize)> = forest.iter().rev().map(|c| (c, 2)).collect();
    while let Some((category, depth)) = stack.pop() {
        push_line(&mut out, depth, &escape_outline_text(&category.name));
        for child in category.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}

fn malformed(line: usize, message: impl Into<String>) -> Error {
    Error::MalformedOutline {
        line,
        message: message.into(),
    }
}

fn split_indent(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches(' ');
    (line.len() - rest.len(), rest)
}

/// Reads an outline back into `(depth, unescaped text)` entries in document order.
///
/// Line numbers in errors are 1-based.
pub fn parse_outline(text: &str) -> Result<Vec<OutlineEntry>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    match lines.next() {
        Some((_, first)) if first.trim().eq_ignore_ascii_case(OUTLINE_HEADER) => {}
        Some((n, _)) => return Err(malformed(n, "expected mindmap header")),
        None => return Err(malformed(1, "empty outline")),
    }

    let mut entries: Vec<OutlineEntry> = Vec::new();
    for (n, line) in lines {
        let (indent, rest) = split_indent(line);
        if indent % INDENT.len() != 0 {
            return Err(malformed(n, format!("odd indentation of {indent} spaces")));
        }
        let depth = indent / INDENT.len();
        let body = rest.trim_end();

        let expected_max = entries.last().map(|e| e.depth + 1).unwrap_or(1);
        if depth == 0 || depth > expected_max {
            return Err(malformed(n, format!("unexpected depth {depth}")));
        }
        if depth == 1 && !entries.is_empty() {
            return Err(malformed(n, "second root"));
        }

        let body = if depth == 1 {
            body.strip_prefix(ROOT_OPEN)
                .and_then(|b| b.strip_suffix(ROOT_CLOSE))
                .unwrap_or(body)
        } else {
            body
        };
        entries.push(OutlineEntry {
            depth,
            text: unescape_outline_text(body),
        });
    }
    Ok(entries)
}
