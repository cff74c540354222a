#![forbid(unsafe_code)]

//! Directed auto-layout for free-form mind map workspaces.
//!
//! [`auto_layout`] runs a layered (Sugiyama-style) pipeline over an arbitrary node/edge graph:
//! cycle breaking, longest-path ranking, dummy nodes for long edges, barycenter ordering and
//! coordinate assignment. [`layout_subtree`] is the cheap local alternative that only moves the
//! descendants of one node.

mod model;
mod pipeline;
mod workspace;

pub use model::{
    AutoLayout, AutoLayoutOptions, Point, PositionedNode, RankDir, RoutedEdge, WorkspaceEdge,
    WorkspaceNode,
};
pub use workspace::{
    DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING, auto_layout, auto_layout_routed,
    layout_subtree,
};
