use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Source,
    Target,
    Intermediate,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub name: String,
    pub info: String,
    pub gender: Gender,
    pub level: usize,
    /// Index within the level after crossing reduction.
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub role: NodeRole,
}

/// Connector for one hop of one path.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub path_id: String,
    pub path_index: usize,
    pub from: String,
    pub to: String,
    pub relationship: String,
    pub color: String,
    pub points: Vec<(f32, f32)>,
    pub label_anchor: (f32, f32),
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Keyed by person id.
    pub nodes: BTreeMap<String, NodeLayout>,
    /// Person ids per level, in slot order.
    pub levels: Vec<Vec<String>>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            levels: Vec::new(),
            edges: Vec::new(),
            width,
            height,
        }
    }

    pub fn position(&self, id: &str) -> Option<(f32, f32)> {
        self.nodes.get(id).map(|node| (node.x, node.y))
    }

    /// Nodes in level order, then slot order.
    pub fn ordered_nodes(&self) -> impl Iterator<Item = &NodeLayout> + '_ {
        self.levels
            .iter()
            .flatten()
            .filter_map(|id| self.nodes.get(id))
    }
}

/// Names of the people pinned to the first and last level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutAnchors {
    pub source: String,
    pub target: String,
}

impl LayoutAnchors {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Anchors taken from the first and last name of the first path.
    pub fn from_first_path(paths: &[crate::pathfinder::ConnectionPath]) -> Option<Self> {
        let first = paths.first()?;
        let source = first.path.first()?;
        let target = first.path.last()?;
        Some(Self::new(source.clone(), target.clone()))
    }
}
