//! Traversal helpers over [`Graph`].
//!
//! Walks are iterative so deep chains cannot overflow the stack.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::Graph;

/// Kahn topological order, seeded in node order. `None` when the graph has a cycle.
///
/// Parallel edges count once and self-loops are ignored.
pub fn topsort<N, E, G>(g: &Graph<N, E, G>) -> Option<Vec<String>> {
    let mut indegree: FxHashMap<&str, usize> = g
        .nodes()
        .map(|v| {
            let d = g.predecessors(v).into_iter().filter(|&u| u != v).count();
            (v, d)
        })
        .collect();

    let mut queue: VecDeque<&str> = g
        .nodes()
        .filter(|v| indegree.get(v).copied() == Some(0))
        .collect();
    let mut order: Vec<String> = Vec::with_capacity(g.node_count());
    while let Some(v) = queue.pop_front() {
        order.push(v.to_string());
        for w in g.successors(v) {
            if w == v {
                continue;
            }
            if let Some(d) = indegree.get_mut(w) {
                *d = d.saturating_sub(1);
                if *d == 0 {
                    queue.push_back(w);
                }
            }
        }
    }

    (order.len() == g.node_count()).then_some(order)
}
