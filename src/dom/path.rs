//! Stable node-path selectors for ranges
//!
//! A [`NodePath`] addresses a position in the tree as child-index steps
//! from the root plus a character offset, e.g. `/0/2/1:17`. Unlike raw
//! [`NodeId`]s, paths survive serialization and can be resolved against
//! a freshly rebuilt tree, so an external annotation store can persist
//! highlight targets and restore them in a later session.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::range::DocumentRange;
use super::selection::Anchor;
use super::{compare_steps, Document, NodeId};

/// Errors raised while parsing or resolving node paths
#[derive(Error, Debug)]
pub enum PathError {
    #[error("invalid path syntax: {0}")]
    Syntax(String),

    #[error("path cannot be resolved: {0}")]
    Unresolvable(String),
}

/// A serializable address of one range endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath {
    /// Child indices from the root down to the container node
    pub steps: Vec<usize>,
    /// Character offset within the container
    pub offset: usize,
}

/// A serializable address of a whole range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePath {
    pub start: NodePath,
    pub end: NodePath,
}

impl NodePath {
    /// Build a path for an anchor; the anchor's node must be attached
    pub fn from_anchor(doc: &Document, anchor: &Anchor) -> Result<Self, PathError> {
        if !doc.is_attached(anchor.node) {
            return Err(PathError::Unresolvable(
                "anchor node is detached from the document".to_string(),
            ));
        }
        Ok(Self {
            steps: doc.node_steps(anchor.node),
            offset: anchor.offset,
        })
    }

    /// Resolve the path back to an anchor in the given document
    pub fn resolve(&self, doc: &Document) -> Result<Anchor, PathError> {
        let mut node = doc.root();
        for (depth, &step) in self.steps.iter().enumerate() {
            node = doc.children(node).get(step).copied().ok_or_else(|| {
                PathError::Unresolvable(format!(
                    "no child {} at depth {} under {:?}",
                    step, depth, node
                ))
            })?;
        }
        let limit = match doc.text_len(node) {
            Some(len) => len,
            None => doc.children(node).len(),
        };
        if self.offset > limit {
            return Err(PathError::Unresolvable(format!(
                "offset {} exceeds node length {}",
                self.offset, limit
            )));
        }
        Ok(Anchor::new(node, self.offset))
    }

    fn position_steps(&self) -> Vec<usize> {
        let mut steps = self.steps.clone();
        steps.push(self.offset);
        steps
    }
}

impl Ord for NodePath {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_steps(&self.position_steps(), &other.position_steps())
    }
}

impl PartialOrd for NodePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RangePath {
    /// Build a range path; both endpoints must be attached
    pub fn from_range(doc: &Document, range: &DocumentRange) -> Result<Self, PathError> {
        Ok(Self {
            start: NodePath::from_anchor(doc, &range.start)?,
            end: NodePath::from_anchor(doc, &range.end)?,
        })
    }

    /// Resolve both endpoints against the given document
    pub fn resolve(&self, doc: &Document) -> Result<DocumentRange, PathError> {
        let start = self.start.resolve(doc)?;
        let end = self.end.resolve(doc)?;
        Ok(DocumentRange::new(doc, start, end))
    }
}

// Display / parse round-trip for storage in plain-text selectors

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        write!(f, ":{}", self.offset)
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (steps_part, offset_part) = s
            .rsplit_once(':')
            .ok_or_else(|| PathError::Syntax(format!("missing offset in {:?}", s)))?;
        let offset = offset_part
            .parse::<usize>()
            .map_err(|_| PathError::Syntax(format!("invalid offset in {:?}", s)))?;
        let mut steps = Vec::new();
        for part in steps_part.split('/') {
            if part.is_empty() {
                continue;
            }
            let step = part
                .parse::<usize>()
                .map_err(|_| PathError::Syntax(format!("invalid step {:?} in {:?}", part, s)))?;
            steps.push(step);
        }
        Ok(Self { steps, offset })
    }
}

impl fmt::Display for RangePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range({},{})", self.start, self.end)
    }
}

impl FromStr for RangePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix("range(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| PathError::Syntax(format!("expected range(...), got {:?}", s)))?;
        let (start, end) = inner
            .split_once(',')
            .ok_or_else(|| PathError::Syntax(format!("expected two endpoints in {:?}", s)))?;
        Ok(Self {
            start: start.trim().parse()?,
            end: end.trim().parse()?,
        })
    }
}
