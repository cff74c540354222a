//! Coordinate assignment in the internal top-to-bottom frame.
//!
//! Ranks stack downward, each as tall as its tallest node plus `ranksep`. Within a rank nodes are
//! packed left to right, then pulled toward the mean of their predecessors (downward pass) and
//! centered over their successors (upward pass). Both passes only ever move a node right of its
//! left neighbor plus `nodesep`, so the order from the ordering step is kept.

use rustc_hash::FxHashMap;

use crate::model::LayoutGraph;

pub(super) fn position(g: &mut LayoutGraph) {
    let layering = layers_by_order(g);
    let nodesep = g.graph().nodesep;
    let ranksep = g.graph().ranksep;

    let mut ys: FxHashMap<String, f64> = FxHashMap::default();
    let mut y_cursor = 0.0;
    for layer in &layering {
        let height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in layer {
            ys.insert(v.clone(), y_cursor + height / 2.0);
        }
        y_cursor += height + ranksep;
    }

    let mut xs: FxHashMap<String, f64> = FxHashMap::default();
    for layer in &layering {
        let mut cursor = 0.0;
        for v in layer {
            let width = width_of(g, v);
            xs.insert(v.clone(), cursor + width / 2.0);
            cursor += width + nodesep;
        }
    }

    for layer in layering.iter().skip(1) {
        align_layer(g, layer, &mut xs, nodesep, true);
    }
    for layer in layering.iter().rev().skip(1) {
        align_layer(g, layer, &mut xs, nodesep, false);
    }

    g.for_each_node_mut(|id, n| {
        n.x = xs.get(id).copied().unwrap_or(0.0);
        n.y = ys.get(id).copied().unwrap_or(0.0);
    });
}

fn layers_by_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut entries: Vec<(usize, usize, &str)> = g
        .nodes()
        .filter_map(|v| g.node(v).map(|n| (n.rank, n.order, v)))
        .collect();
    entries.sort_by_key(|&(rank, order, _)| (rank, order));

    let mut layers: Vec<Vec<String>> = Vec::new();
    for (rank, _, v) in entries {
        while layers.len() <= rank {
            layers.push(Vec::new());
        }
        layers[rank].push(v.to_string());
    }
    layers
}

fn width_of(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map_or(0.0, |n| n.width)
}

fn align_layer(
    g: &LayoutGraph,
    layer: &[String],
    xs: &mut FxHashMap<String, f64>,
    nodesep: f64,
    toward_predecessors: bool,
) {
    let mut left: Option<(f64, f64)> = None;
    for v in layer {
        let width = width_of(g, v);
        let neighbors = if toward_predecessors {
            g.predecessors(v)
        } else {
            g.successors(v)
        };
        let anchors: Vec<f64> = neighbors
            .iter()
            .filter_map(|u| xs.get(*u).copied())
            .collect();
        let current = xs.get(v).copied().unwrap_or(0.0);
        let desired = if anchors.is_empty() {
            current
        } else {
            anchors.iter().sum::<f64>() / anchors.len() as f64
        };
        let min_x = left.map_or(f64::NEG_INFINITY, |(lx, lw)| lx + (lw + width) / 2.0 + nodesep);
        let x = desired.max(min_x);
        xs.insert(v.clone(), x);
        left = Some((x, width));
    }
}
