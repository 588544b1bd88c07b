//! Line-oriented YAML scanning.
//!
//! [`scan`] reads block-style YAML one line at a time, without building a
//! tree, and reports every `key: value` line together with the field path
//! of its key. This is useful for annotating or rewriting YAML source in
//! place, where a full parse would lose comments and layout.
//!
//! Nesting is tracked by the column of each key. A list item (`- `) bumps
//! the subscript of the key that owns the list, so
//!
//! ```yaml
//! servers:
//! - host: a
//!   port: 1
//! - host: b
//! ```
//!
//! reports `.servers`, `.servers[0].host`, `.servers[0].port` and
//! `.servers[1].host`. Scalar items (`- a`) are reported with the item's own
//! path (`.tags[0]`). Comments, blank lines, document markers and lines that
//! are not shaped like a key are skipped.

use crate::error::{Result, TreeError};
use crate::path::FieldPath;

/// One reported line.
#[derive(Debug, Clone, Copy)]
pub struct YamlLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Everything before the value: indentation, `- `, key and colon.
    pub header: &'a str,
    /// Raw value text after the colon, trimmed; empty for a parent key.
    pub value: &'a str,
    /// Field path of the key (or of the item, for scalar list items).
    pub path: &'a FieldPath,
}

/// An open key on the current nesting chain.
struct Level {
    key: String,
    index: Option<usize>,
    column: usize,
}

/// A line broken into its structural parts.
struct Classified<'a> {
    dash_column: Option<usize>,
    key: Option<&'a str>,
    key_column: usize,
    header: &'a str,
    value: &'a str,
}

/// Scan `text`, invoking `on_line` for every key line and list item.
///
/// # Errors
///
/// `YamlLine` when a list item has no enclosing key, or when a key is
/// outdented to a column that matches no enclosing key.
pub fn scan(text: &str, mut on_line: impl FnMut(&YamlLine<'_>)) -> Result<()> {
    let mut levels: Vec<Level> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let number = i + 1;
        let Some(parts) = classify(line) else {
            tracing::trace!(line = number, "skipping");
            continue;
        };

        if let Some(dash) = parts.dash_column {
            while levels.last().is_some_and(|l| l.column > dash) {
                levels.pop();
            }
            let Some(parent) = levels.last_mut() else {
                return Err(TreeError::YamlLine {
                    line: number,
                    message: "list item without a parent key".to_string(),
                });
            };
            parent.index = Some(parent.index.map_or(0, |i| i + 1));
            tracing::trace!(line = number, parent = %parent.key, "list item");
            if let Some(key) = parts.key {
                levels.push(Level {
                    key: key.to_string(),
                    index: None,
                    column: parts.key_column,
                });
            }
        } else if let Some(key) = parts.key {
            let mut outdented = false;
            while levels.last().is_some_and(|l| l.column > parts.key_column) {
                levels.pop();
                outdented = true;
            }
            if let Some(top) = levels.last_mut().filter(|l| l.column == parts.key_column) {
                top.key = key.to_string();
                top.index = None;
            } else if outdented {
                return Err(TreeError::YamlLine {
                    line: number,
                    message: format!(
                        "outdent to column {} matches no enclosing key",
                        parts.key_column
                    ),
                });
            } else {
                levels.push(Level {
                    key: key.to_string(),
                    index: None,
                    column: parts.key_column,
                });
            }
        }

        let path = path_of(&levels);
        on_line(&YamlLine {
            number,
            header: parts.header,
            value: parts.value,
            path: &path,
        });
    }

    Ok(())
}

/// Every scanned line as `(path text, raw value)` pairs, in source order.
pub fn scan_paths(text: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    scan(text, |line| {
        out.push((line.path.to_string(), line.value.to_string()));
    })?;
    Ok(out)
}

fn path_of(levels: &[Level]) -> FieldPath {
    let mut path = FieldPath::root();
    for level in levels {
        path.push_key(level.key.as_str());
        if let Some(i) = level.index {
            path.push_index(i);
        }
    }
    path
}

fn classify(line: &str) -> Option<Classified<'_>> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let rest = &line[indent..];
    if rest.trim().is_empty()
        || rest.starts_with('#')
        || rest.starts_with("---")
        || rest.starts_with("...")
    {
        return None;
    }

    let (dash_column, body_start) = if rest == "-" || rest.starts_with("- ") {
        let after = &rest[1..];
        let gap = after.len() - after.trim_start_matches(' ').len();
        (Some(indent), indent + 1 + gap)
    } else {
        (None, indent)
    };

    let body = &line[body_start..];
    match split_key(body) {
        Some((key, value_offset)) => {
            let value_start = body_start + value_offset;
            Some(Classified {
                dash_column,
                key: Some(key),
                key_column: body_start,
                header: &line[..value_start],
                value: line[value_start..].trim_end(),
            })
        }
        // A scalar list item: the body is the value.
        None if dash_column.is_some() => Some(Classified {
            dash_column,
            key: None,
            key_column: body_start,
            header: &line[..body_start],
            value: body.trim_end(),
        }),
        None => None,
    }
}

/// Split `key: value` into the key and the byte offset where the value
/// starts. Keys are either quoted or a run without spaces ending at a colon
/// followed by a space or the end of the line.
fn split_key(body: &str) -> Option<(&str, usize)> {
    let (key, after_key) = match body.chars().next()? {
        q @ ('"' | '\'') => {
            let close = body[1..].find(q)? + 1;
            let after = close + 1;
            let gap = body[after..].len() - body[after..].trim_start_matches(' ').len();
            if !body[after + gap..].starts_with(':') {
                return None;
            }
            (&body[1..close], after + gap)
        }
        _ => {
            let colon = body
                .char_indices()
                .find(|&(i, c)| c == ':' && matches!(body[i + 1..].chars().next(), None | Some(' ')))
                .map(|(i, _)| i)?;
            let key = &body[..colon];
            if key.is_empty() || key.contains(' ') {
                return None;
            }
            (key, colon)
        }
    };

    let after_colon = after_key + 1;
    let gap = body[after_colon..].len() - body[after_colon..].trim_start_matches(' ').len();
    Some((key, after_colon + gap))
}
