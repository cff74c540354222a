#![forbid(unsafe_code)]

//! `tagmap` builds mind maps out of tagged material and lays them out, without any UI.
//!
//! The tag-driven generator, the editable tree entity and the outline serializer come from
//! `tagmap-core` and are re-exported at the crate root.
//!
//! # Features
//!
//! - `layout` (default): directed auto-layout for free-form workspaces (`tagmap::layout`)

pub use tagmap_core::*;

#[cfg(feature = "layout")]
pub mod layout {
    pub use tagmap_layout::{
        AutoLayout, AutoLayoutOptions, DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING,
        Point, PositionedNode, RankDir, RoutedEdge, WorkspaceEdge, WorkspaceNode, auto_layout,
        auto_layout_routed, layout_subtree,
    };

    use tagmap_core::MindMap;

    #[derive(Debug, thiserror::Error)]
    pub enum LayoutError {
        #[error(transparent)]
        Tree(#[from] tagmap_core::Error),
    }

    pub type Result<T> = std::result::Result<T, LayoutError>;

    /// Converts a tree into workspace nodes (root flagged) and parent-to-child edges.
    ///
    /// Edges follow [`MindMap::child_lists`], so children known only through their parent link
    /// still get an edge.
    pub fn workspace_graph(map: &MindMap) -> (Vec<WorkspaceNode>, Vec<WorkspaceEdge>) {
        let nodes: Vec<WorkspaceNode> = map
            .nodes
            .iter()
            .map(|n| {
                if n.id == map.root_node.id {
                    WorkspaceNode::root(n.id.clone())
                } else {
                    WorkspaceNode::new(n.id.clone())
                }
            })
            .collect();

        let edges: Vec<WorkspaceEdge> = map
            .child_lists()
            .iter()
            .flat_map(|(&parent, children)| children.iter().map(move |&c| edge_between(parent, c)))
            .collect();
        (nodes, edges)
    }

    fn edge_between(source: &str, target: &str) -> WorkspaceEdge {
        WorkspaceEdge {
            id: Some(format!("edge-{source}-{target}")),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Validates `map`, then runs [`auto_layout`] over it with the root pinned.
    pub fn layout_mind_map(
        map: &MindMap,
        options: &AutoLayoutOptions,
    ) -> Result<Vec<PositionedNode>> {
        map.validate()?;
        let (nodes, edges) = workspace_graph(map);
        Ok(auto_layout(
            &nodes,
            &edges,
            Some(map.root_node.id.as_str()),
            options,
        ))
    }
}
