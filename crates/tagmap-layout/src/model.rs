//! Public layout types plus the internal graph labels the pipeline works on.

use serde::{Deserialize, Serialize};
use tagmap_graphlib::EdgeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    TB,
    BT,
    #[default]
    LR,
    RL,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoLayoutOptions {
    /// Footprint used for every workspace node.
    pub node_width: f64,
    pub node_height: f64,
    pub rank_sep: f64,
    pub node_sep: f64,
    pub rankdir: RankDir,
    /// Left edge given to the root node after layout.
    pub root_pin_x: f64,
    /// Upper bound on barycenter ordering sweeps.
    pub order_sweeps: usize,
}

impl Default for AutoLayoutOptions {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 120.0,
            rank_sep: 100.0,
            node_sep: 80.0,
            rankdir: RankDir::LR,
            root_pin_x: 50.0,
            order_sweeps: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceNode {
    pub id: String,
    #[serde(default)]
    pub is_root: bool,
    /// Top-left corner.
    #[serde(default)]
    pub position: Point,
}

impl WorkspaceNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_root: false,
            position: Point::default(),
        }
    }

    pub fn root(id: impl Into<String>) -> Self {
        Self {
            is_root: true,
            ..Self::new(id)
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

impl WorkspaceEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    /// Top-left corner of the node footprint.
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    pub source: String,
    pub target: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<RoutedEdge>,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NodeLabel {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) rank: usize,
    pub(crate) order: usize,
    /// Set on dummy nodes: the long edge they stand in for.
    pub(crate) edge_obj: Option<EdgeKey>,
    pub(crate) edge_label: Option<EdgeLabel>,
}

impl NodeLabel {
    pub(crate) fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub(crate) fn is_dummy(&self) -> bool {
        self.edge_obj.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeLabel {
    pub(crate) minlen: usize,
    pub(crate) weight: f64,
    pub(crate) reversed: bool,
    pub(crate) forward_name: Option<String>,
    pub(crate) points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
            forward_name: None,
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GraphLabel {
    pub(crate) rankdir: RankDir,
    pub(crate) nodesep: f64,
    pub(crate) ranksep: f64,
    pub(crate) order_sweeps: usize,
    /// First dummy node of every split edge.
    pub(crate) dummy_chains: Vec<String>,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

pub(crate) type LayoutGraph = tagmap_graphlib::Graph<NodeLabel, EdgeLabel, GraphLabel>;
