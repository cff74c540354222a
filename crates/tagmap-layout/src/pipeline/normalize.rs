//! Split edges spanning several ranks into chains of unit-length edges through dummy nodes.

use crate::model::{EdgeLabel, LayoutGraph, NodeLabel, Point};

pub(super) fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();

    for e in g.edge_keys() {
        let v_rank = g.node(&e.v).map_or(0, |n| n.rank);
        let w_rank = g.node(&e.w).map_or(0, |n| n.rank);
        if w_rank <= v_rank + 1 {
            continue;
        }
        let Some(label) = g.remove_edge_key(&e) else {
            continue;
        };

        let mut prev = e.v.clone();
        for rank in v_rank + 1..w_rank {
            let id = next_dummy_id(g);
            g.set_node(
                id.clone(),
                NodeLabel {
                    rank,
                    edge_obj: Some(e.clone()),
                    edge_label: Some(label.clone()),
                    ..NodeLabel::default()
                },
            );
            if rank == v_rank + 1 {
                g.graph_mut().dummy_chains.push(id.clone());
            }
            g.set_edge_named(prev, id.clone(), e.name.clone(), Some(link(&label)));
            prev = id;
        }
        g.set_edge_named(prev, e.w.clone(), e.name.clone(), Some(link(&label)));
    }
}

/// Folds every dummy chain back into its original edge, keeping the dummy centers as bend points.
pub(super) fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(first) = g.node(&start) else {
            continue;
        };
        let (Some(edge_obj), Some(mut label)) = (first.edge_obj.clone(), first.edge_label.clone())
        else {
            continue;
        };
        label.points.clear();

        let mut current = start;
        loop {
            let Some(node) = g.node(&current) else {
                break;
            };
            if !node.is_dummy() {
                break;
            }
            label.points.push(Point::new(node.x, node.y));
            let next = g.successors(&current).first().map(|s| s.to_string());
            g.remove_node(&current);
            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        g.set_edge_named(edge_obj.v, edge_obj.w, edge_obj.name, Some(label));
    }
}

fn link(label: &EdgeLabel) -> EdgeLabel {
    EdgeLabel {
        weight: label.weight,
        ..EdgeLabel::default()
    }
}

fn next_dummy_id(g: &LayoutGraph) -> String {
    let mut i = g.node_count();
    loop {
        let candidate = format!("_d{i}");
        if !g.has_node(&candidate) {
            return candidate;
        }
        i += 1;
    }
}
