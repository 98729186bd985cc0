//! Structural diff between two JSON trees.
//!
//! Objects are compared key by key regardless of insertion order, arrays
//! index by index. Numbers compare by value, so `1` and `1.0` are equal.
//! The inputs are finite parsed JSON; there is no cycle handling.

use std::fmt;

use serde_json::{Map, Number, Value};
use similar::TextDiff;

/// One step in a path from the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, ".{key}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// What happened at a path.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    Added { value: Value },
    Removed { old_value: Value },
    Changed { old_value: Value, value: Value },
}

/// A single difference between the old and the new tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: Vec<PathSegment>,
    pub kind: ChangeKind,
}

impl Change {
    /// Dotted path, `$` for the root.
    pub fn path_string(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            out.push_str(&segment.to_string());
        }
        out
    }
}

/// Every change needed to turn `old` into `new`, in traversal order.
///
/// Empty if and only if the two trees are structurally equal.
pub fn structural_diff(old: &Value, new: &Value) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    diff_into(old, new, &mut path, &mut changes);
    changes
}

fn diff_into(
    old: &Value,
    new: &Value,
    path: &mut Vec<PathSegment>,
    changes: &mut Vec<Change>,
) {
    match (old, new) {
        (Value::Object(old), Value::Object(new)) => diff_objects(old, new, path, changes),
        (Value::Array(old), Value::Array(new)) => diff_arrays(old, new, path, changes),
        (Value::Number(a), Value::Number(b)) if numbers_equal(a, b) => {}
        (a, b) if a == b => {}
        (a, b) => changes.push(Change {
            path: path.clone(),
            kind: ChangeKind::Changed {
                old_value: a.clone(),
                value: b.clone(),
            },
        }),
    }
}

fn diff_objects(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    path: &mut Vec<PathSegment>,
    changes: &mut Vec<Change>,
) {
    for (key, old_value) in old {
        path.push(PathSegment::Key(key.clone()));
        match new.get(key) {
            Some(new_value) => diff_into(old_value, new_value, path, changes),
            None => changes.push(Change {
                path: path.clone(),
                kind: ChangeKind::Removed {
                    old_value: old_value.clone(),
                },
            }),
        }
        path.pop();
    }
    for (key, value) in new {
        if old.contains_key(key) {
            continue;
        }
        path.push(PathSegment::Key(key.clone()));
        changes.push(Change {
            path: path.clone(),
            kind: ChangeKind::Added {
                value: value.clone(),
            },
        });
        path.pop();
    }
}

fn diff_arrays(
    old: &[Value],
    new: &[Value],
    path: &mut Vec<PathSegment>,
    changes: &mut Vec<Change>,
) {
    for index in 0..old.len().max(new.len()) {
        path.push(PathSegment::Index(index));
        match (old.get(index), new.get(index)) {
            (Some(a), Some(b)) => diff_into(a, b, path, changes),
            (Some(a), None) => changes.push(Change {
                path: path.clone(),
                kind: ChangeKind::Removed {
                    old_value: a.clone(),
                },
            }),
            (None, Some(b)) => changes.push(Change {
                path: path.clone(),
                kind: ChangeKind::Added { value: b.clone() },
            }),
            (None, None) => {}
        }
        path.pop();
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Unified text diff of two documents, pretty-printed with sorted keys.
///
/// `old = None` renders the whole of `new` as added lines.
pub fn render_text_diff(name: &str, old: Option<&Value>, new: &Value) -> String {
    let old_text = old.map(pretty).unwrap_or_default();
    let new_text = pretty(new);
    let old_header = format!("a/{name}");
    let new_header = format!("b/{name}");
    TextDiff::from_lines(&old_text, &new_text)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

fn pretty(value: &Value) -> String {
    // serde_json's default map is ordered by key, so output is stable.
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}
