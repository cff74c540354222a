//! Node ordering within ranks: DFS initial order, then barycenter sweeps that keep the layering
//! with the fewest crossings.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::LayoutGraph;

pub(super) fn order(g: &mut LayoutGraph) {
    let sweeps = g.graph().order_sweeps;
    let mut layering = init_order(g);
    let mut best = layering.clone();
    let mut best_cc = cross_count(g, &layering);

    for i in 0..sweeps {
        if best_cc == 0.0 {
            break;
        }
        sweep(g, &mut layering, i % 2 == 0);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            best_cc = cc;
            best = layering.clone();
        }
    }
    tracing::trace!(crossings = best_cc, ranks = best.len(), "ordering settled");

    for layer in &best {
        for (i, v) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = i;
            }
        }
    }
}

/// Rank-by-rank lists of node ids, filled by a depth-first walk started from low ranks first.
fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max_rank) = g.nodes().filter_map(|v| g.node(v)).map(|n| n.rank).max() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); max_rank + 1];

    let mut starts: Vec<&str> = g.nodes().collect();
    starts.sort_by_key(|v| g.node(v).map_or(0, |n| n.rank));

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    for start in starts {
        let mut stack: Vec<&str> = vec![start];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            if let Some(n) = g.node(v) {
                layers[n.rank].push(v.to_string());
            }
            for w in g.successors(v).into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }
    layers
}

/// One barycenter pass. Downward passes sort each rank by the mean position of its predecessors,
/// upward passes by its successors. Nodes without fixed neighbors keep their index.
fn sweep(g: &LayoutGraph, layering: &mut [Vec<String>], down: bool) {
    let n = layering.len();
    if n < 2 {
        return;
    }
    let ranks: Vec<usize> = if down {
        (1..n).collect()
    } else {
        (0..n - 1).rev().collect()
    };

    for r in ranks {
        let fixed = if down { r - 1 } else { r + 1 };
        let reordered: Vec<String> = {
            let fixed_pos: FxHashMap<&str, usize> = layering[fixed]
                .iter()
                .enumerate()
                .map(|(i, v)| (v.as_str(), i))
                .collect();
            let mut keyed: Vec<(f64, usize)> = layering[r]
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let neighbors = if down {
                        g.predecessors(v)
                    } else {
                        g.successors(v)
                    };
                    let (sum, count) = neighbors
                        .iter()
                        .filter_map(|u| fixed_pos.get(u))
                        .fold((0.0, 0.0), |(s, c), &p| (s + p as f64, c + 1.0));
                    let barycenter = if count > 0.0 { sum / count } else { i as f64 };
                    (barycenter, i)
                })
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            keyed.iter().map(|&(_, i)| layering[r][i].clone()).collect()
        };
        layering[r] = reordered;
    }
}

/// Weighted crossings between every pair of adjacent ranks.
pub(super) fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let south_pos: FxHashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut row: Vec<(usize, f64)> = g
            .out_edges(v)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                Some((pos, weight))
            })
            .collect();
        row.sort_by_key(|&(pos, _)| pos);
        entries.extend(row);
    }

    // Accumulator tree over south positions.
    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let mut tree = vec![0.0f64; 2 * first_index - 1];
    first_index -= 1;

    let mut cc = 0.0;
    for (pos, weight) in entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}
