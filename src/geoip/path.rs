//! Safe traversal of decoded lookup trees.
//!
//! A lookup tree is whatever the MaxMind decoder produced for an address
//! (maps, arrays and scalars). Missing links anywhere along a path are an
//! ordinary outcome, not an error.

use serde_json::Value;

/// One step of a path into a lookup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// Map member by name
    Key(&'static str),
    /// Array element by position
    Index(usize),
}

/// Reads the value at `path` below `root`.
///
/// Returns `root` unchanged when it is absent or when `path` is empty.
/// Otherwise descends one segment at a time and stops at the first missing
/// link. JSON `null` counts as missing.
pub fn read_path<'a>(root: Option<&'a Value>, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = root?;
    for segment in path {
        let next = match segment {
            PathSegment::Key(key) => current.get(*key),
            PathSegment::Index(index) => current.get(*index),
        };
        current = match next {
            Some(Value::Null) | None => return None,
            Some(value) => value,
        };
    }
    Some(current)
}
