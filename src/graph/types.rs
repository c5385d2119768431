//! Core type definitions for the relationship graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Drug,
    SideEffect,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Drug => write!(f, "drug"),
            NodeKind::SideEffect => write!(f, "side_effect"),
        }
    }
}

/// Node identity: trimmed name plus kind.
///
/// Drugs and side effects live in disjoint label spaces, so a drug and a
/// side effect sharing a name are distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeKey {
    pub name: String,
    pub kind: NodeKind,
}

impl NodeKey {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        NodeKey {
            name: name.into(),
            kind,
        }
    }

    pub fn drug(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Drug)
    }

    pub fn side_effect(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::SideEffect)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Reporting frequency of a drug -> side-effect edge, in percent.
///
/// Source values that do not parse as numbers are preserved as
/// [`Frequency::Unknown`] instead of being coerced to zero; a zero frequency
/// and an unparsable one must stay distinguishable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Known(f64),
    Unknown,
}

impl Frequency {
    /// Parse a raw frequency cell. `None`, empty, or non-numeric input
    /// yields `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(text) if !text.is_empty() => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Frequency::Known(value),
                _ => Frequency::Unknown,
            },
            _ => Frequency::Unknown,
        }
    }

    pub fn as_known(&self) -> Option<f64> {
        match self {
            Frequency::Known(value) => Some(*value),
            Frequency::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Frequency::Known(_))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Known(value) => write!(f, "{value}%"),
            Frequency::Unknown => write!(f, "N/A"),
        }
    }
}
