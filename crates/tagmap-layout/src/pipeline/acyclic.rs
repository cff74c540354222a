//! Break cycles by reversing a depth-first feedback arc set.

use rustc_hash::FxHashSet;
use tagmap_graphlib::EdgeKey;

use crate::model::LayoutGraph;

pub(super) fn run(g: &mut LayoutGraph) {
    for e in dfs_fas(g) {
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

/// Puts reversed edges back the right way round, flipping their routed points with them.
pub(super) fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|l| l.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        label.points.reverse();
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

fn unique_rev_name(g: &LayoutGraph, v: &str, w: &str) -> String {
    let mut i = 1usize;
    loop {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();

    for root in g.node_ids() {
        if !visited.insert(root.clone()) {
            continue;
        }
        on_stack.insert(root.clone());
        let out = g.out_edges(&root);
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> = vec![(root, out, 0)];

        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            if top.2 >= top.1.len() {
                if let Some((v, _, _)) = stack.pop() {
                    on_stack.remove(&v);
                }
                continue;
            }
            let e = top.1[top.2].clone();
            top.2 += 1;

            if e.is_self_loop() {
                continue;
            }
            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                let out = g.out_edges(&e.w);
                stack.push((e.w, out, 0));
            }
        }
    }
    fas
}
