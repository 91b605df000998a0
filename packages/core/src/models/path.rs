//! Path Decomposition
//!
//! Turns a dotted path such as `"1.4.2"` into the ordered prefixes the tree
//! builder walks, one per segment:
//!
//! ```rust
//! use treedata_core::models::{decompose, PathPolicy};
//!
//! let segments = decompose("1.4.2", PathPolicy::Strict).unwrap();
//! let prefixes: Vec<_> = segments.iter().map(|s| s.full_position.as_str()).collect();
//! assert_eq!(prefixes, ["1", "1.4", "1.4.2"]);
//! assert_eq!(segments[2].position, 2);
//! ```
//!
//! Leading and trailing separators are trimmed before splitting. Cumulative
//! paths are always rebuilt from the parsed integers, so the stored form of a
//! path is canonical regardless of how the caller spelled it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Malformed path input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Invalid segment '{segment}' at index {index} in path '{path}'")]
    InvalidSegment {
        path: String,
        index: usize,
        segment: String,
    },

    #[error("Segment '{segment}' in path '{path}' does not fit in a 32-bit position")]
    SegmentOutOfRange { path: String, segment: String },
}

impl PathError {
    fn invalid_segment(path: &str, index: usize, segment: &str) -> Self {
        Self::InvalidSegment {
            path: path.to_string(),
            index,
            segment: segment.to_string(),
        }
    }
}

/// How non-numeric path segments are handled
///
/// - `Strict`: only plain non-negative integers without leading zeros
///   (`"0"` itself is fine). Anything else is a `PathError`.
/// - `Lenient`: each segment keeps its leading ASCII digits and drops the
///   rest; a segment without leading digits becomes `0`. Kept for loading
///   legacy data files that relied on this coercion.
///
/// Empty input is rejected under both policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    #[default]
    Strict,
    Lenient,
}

impl fmt::Display for PathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPolicy::Strict => f.write_str("strict"),
            PathPolicy::Lenient => f.write_str("lenient"),
        }
    }
}

impl FromStr for PathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(PathPolicy::Strict),
            "lenient" => Ok(PathPolicy::Lenient),
            other => Err(format!(
                "Unknown path policy '{}' (expected 'strict' or 'lenient')",
                other
            )),
        }
    }
}

/// One decomposed prefix of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// The segment's own value relative to its parent
    pub position: u32,

    /// Dot-joined path from the root through this segment
    pub full_position: String,
}

/// Decompose a dotted path into `(position, full_position)` prefixes.
///
/// # Errors
///
/// - `PathError::Empty` if nothing is left after trimming separators
/// - `PathError::InvalidSegment` / `PathError::SegmentOutOfRange` for bad
///   segments under `PathPolicy::Strict`
pub fn decompose(path: &str, policy: PathPolicy) -> Result<Vec<PathSegment>, PathError> {
    let trimmed = path.trim_matches(PATH_SEPARATOR);
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = Vec::new();
    let mut full_position = String::with_capacity(trimmed.len());

    for (index, token) in trimmed.split(PATH_SEPARATOR).enumerate() {
        let position = match policy {
            PathPolicy::Strict => parse_strict(path, index, token)?,
            PathPolicy::Lenient => coerce_lenient(token),
        };

        if index > 0 {
            full_position.push(PATH_SEPARATOR);
        }
        full_position.push_str(&position.to_string());

        segments.push(PathSegment {
            position,
            full_position: full_position.clone(),
        });
    }

    Ok(segments)
}

/// Canonical full position for `path` (the last decomposed prefix)
pub fn normalize(path: &str, policy: PathPolicy) -> Result<String, PathError> {
    decompose(path, policy)?
        .pop()
        .map(|segment| segment.full_position)
        .ok_or(PathError::Empty)
}

fn parse_strict(path: &str, index: usize, token: &str) -> Result<u32, PathError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::invalid_segment(path, index, token));
    }
    if token.len() > 1 && token.starts_with('0') {
        return Err(PathError::invalid_segment(path, index, token));
    }

    token.parse::<u32>().map_err(|_| PathError::SegmentOutOfRange {
        path: path.to_string(),
        segment: token.to_string(),
    })
}

fn coerce_lenient(token: &str) -> u32 {
    token
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Tree order for full positions: compare segment by segment as integers,
/// so `"1.2"` comes before `"1.10"` and a parent comes before its children.
pub fn compare_full_positions(a: &str, b: &str) -> Ordering {
    let left = a.split(PATH_SEPARATOR).map(coerce_lenient);
    let right = b.split(PATH_SEPARATOR).map(coerce_lenient);
    left.cmp(right).then_with(|| a.cmp(b))
}
