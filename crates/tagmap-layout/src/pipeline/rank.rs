//! Longest-path ranking: sources sit on rank 0 and every edge spans at least its `minlen`.

use rustc_hash::FxHashMap;
use tagmap_graphlib::alg;

use crate::model::LayoutGraph;

pub(super) fn longest_path(g: &mut LayoutGraph) {
    let order = match alg::topsort(g) {
        Some(order) => order,
        None => {
            tracing::warn!("graph still cyclic after reversal, ranking in node order");
            g.node_ids()
        }
    };

    let mut rank: FxHashMap<String, usize> = order.iter().map(|v| (v.clone(), 0)).collect();
    for v in &order {
        let r = rank.get(v).copied().unwrap_or(0);
        for e in g.out_edges(v) {
            if e.is_self_loop() {
                continue;
            }
            let minlen = g.edge_by_key(&e).map_or(1, |l| l.minlen.max(1));
            let slot = rank.entry(e.w.clone()).or_insert(0);
            *slot = (*slot).max(r + minlen);
        }
    }

    g.for_each_node_mut(|id, n| n.rank = rank.get(id).copied().unwrap_or(0));
}
