//! Layout entry points for the free-form workspace graph.

use rustc_hash::{FxHashMap, FxHashSet};
use tagmap_graphlib::GraphOptions;

use crate::model::{
    AutoLayout, AutoLayoutOptions, EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, Point,
    PositionedNode, RoutedEdge, WorkspaceEdge, WorkspaceNode,
};
use crate::pipeline;

pub const DEFAULT_HORIZONTAL_SPACING: f64 = 150.0;
pub const DEFAULT_VERTICAL_SPACING: f64 = 100.0;

/// Lays the whole workspace out as a layered directed graph.
///
/// Every node gets the footprint from `options`; returned positions are top-left corners, one per
/// distinct node id, in input order. The root (a node with `is_root`, or the one named by
/// `pinned_root_id`) keeps the computed `y` but is moved to `options.root_pin_x`.
///
/// Edges naming unknown nodes are skipped with a warning and self-loops are ignored, so the
/// function never fails.
pub fn auto_layout(
    nodes: &[WorkspaceNode],
    edges: &[WorkspaceEdge],
    pinned_root_id: Option<&str>,
    options: &AutoLayoutOptions,
) -> Vec<PositionedNode> {
    auto_layout_routed(nodes, edges, pinned_root_id, options).nodes
}

/// Like [`auto_layout`], but also returns edge polylines and the drawing extent.
///
/// Edge points are in the unpinned frame.
pub fn auto_layout_routed(
    nodes: &[WorkspaceNode],
    edges: &[WorkspaceEdge],
    pinned_root_id: Option<&str>,
    options: &AutoLayoutOptions,
) -> AutoLayout {
    let mut g = LayoutGraph::new(GraphOptions { multigraph: true });
    g.set_graph(GraphLabel {
        rankdir: options.rankdir,
        nodesep: options.node_sep,
        ranksep: options.rank_sep,
        order_sweeps: options.order_sweeps,
        ..GraphLabel::default()
    });

    let mut order: Vec<&WorkspaceNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if g.has_node(&node.id) {
            tracing::warn!(node = %node.id, "duplicate workspace node ignored");
            continue;
        }
        g.set_node(
            node.id.clone(),
            NodeLabel::sized(options.node_width, options.node_height),
        );
        order.push(node);
    }

    let mut kept: Vec<(&WorkspaceEdge, String)> = Vec::with_capacity(edges.len());
    for (i, edge) in edges.iter().enumerate() {
        if !g.has_node(&edge.source) || !g.has_node(&edge.target) {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                "edge references an unknown node, skipped"
            );
            continue;
        }
        if edge.source == edge.target {
            tracing::debug!(node = %edge.source, "self-loop ignored");
            continue;
        }
        let name = edge.id.clone().unwrap_or_else(|| format!("e{i}"));
        if g.has_edge(&edge.source, &edge.target, Some(&name)) {
            tracing::warn!(edge = %name, "duplicate edge id ignored");
            continue;
        }
        g.set_edge_named(
            edge.source.clone(),
            edge.target.clone(),
            Some(name.clone()),
            Some(EdgeLabel::default()),
        );
        kept.push((edge, name));
    }

    tracing::debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        "running auto-layout"
    );
    pipeline::layout(&mut g);

    let positioned = order
        .iter()
        .filter_map(|node| {
            let n = g.node(&node.id)?;
            let mut position = Point::new(n.x - n.width / 2.0, n.y - n.height / 2.0);
            if node.is_root || pinned_root_id == Some(node.id.as_str()) {
                position.x = options.root_pin_x;
            }
            Some(PositionedNode {
                id: node.id.clone(),
                position,
            })
        })
        .collect();

    let routed = kept
        .iter()
        .filter_map(|(edge, name)| {
            let label = g.edge(&edge.source, &edge.target, Some(name))?;
            Some(RoutedEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                points: label.points.clone(),
            })
        })
        .collect();

    AutoLayout {
        nodes: positioned,
        edges: routed,
        width: g.graph().width,
        height: g.graph().height,
    }
}

/// Re-positions the descendants of `root_id`, leaving every other node where it is.
///
/// A node's children are the nodes, in input order, that one of its out-edges points at. They are
/// stacked `vertical_spacing` apart, centered on the parent's `y`, one `horizontal_spacing` to its
/// right. Each node is placed once, so cycles and shared children terminate. An unknown `root_id`
/// returns the nodes unchanged.
pub fn layout_subtree(
    root_id: &str,
    nodes: &[WorkspaceNode],
    edges: &[WorkspaceEdge],
    horizontal_spacing: f64,
    vertical_spacing: f64,
) -> Vec<WorkspaceNode> {
    let mut out: Vec<WorkspaceNode> = nodes.to_vec();

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }
    if !index.contains_key(root_id) {
        tracing::warn!(root = root_id, "subtree root not found");
        return out;
    }

    let mut targets: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    for edge in edges {
        targets
            .entry(edge.source.as_str())
            .or_default()
            .insert(edge.target.as_str());
    }

    let mut placed: FxHashSet<&str> = FxHashSet::default();
    placed.insert(root_id);
    let mut stack: Vec<&str> = vec![root_id];
    while let Some(parent) = stack.pop() {
        let Some(outgoing) = targets.get(parent) else {
            continue;
        };
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let children: Vec<&str> = nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| outgoing.contains(id) && seen.insert(*id))
            .collect();
        let Some(anchor) = index.get(parent).map(|&i| out[i].position) else {
            continue;
        };

        let start_y = anchor.y - (children.len() as f64 - 1.0) * vertical_spacing / 2.0;
        let mut next: Vec<&str> = Vec::new();
        for (i, child) in children.iter().enumerate() {
            if !placed.insert(*child) {
                continue;
            }
            if let Some(&slot) = index.get(child) {
                out[slot].position = Point::new(
                    anchor.x + horizontal_spacing,
                    start_y + i as f64 * vertical_spacing,
                );
            }
            next.push(*child);
        }
        stack.extend(next.into_iter().rev());
    }
    out
}
