//! The pipeline lays out top-to-bottom; other directions swap or mirror axes around it.

use crate::model::{LayoutGraph, RankDir};

pub(super) fn adjust(g: &mut LayoutGraph) {
    match g.graph().rankdir {
        RankDir::LR | RankDir::RL => swap_width_height(g),
        RankDir::TB | RankDir::BT => {}
    }
}

pub(super) fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if matches!(rankdir, RankDir::LR | RankDir::RL) {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_id, n| {
        (n.width, n.height) = (n.height, n.width);
    });
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_id, n| n.y = -n.y);
    g.for_each_edge_mut(|_key, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_id, n| {
        (n.x, n.y) = (n.y, n.x);
    });
    g.for_each_edge_mut(|_key, e| {
        for p in &mut e.points {
            (p.x, p.y) = (p.y, p.x);
        }
    });
}
