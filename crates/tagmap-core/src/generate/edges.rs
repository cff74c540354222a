use crate::model::{EdgeStyle, LayoutEdge};

use super::levels::Skeleton;

/// Style hints for an edge ending at `level`; edges leaving the central node are dashed.
pub fn edge_style(level: u32, from_center: bool) -> EdgeStyle {
    let depth = f64::from(level.saturating_sub(1));
    EdgeStyle {
        stroke_width: (6.0 - 0.5 * depth).max(2.0),
        emphasis: (1.0 - 0.1 * depth).max(0.6),
        dashed: from_center,
    }
}

pub(super) fn derive_edges(skeleton: &Skeleton) -> Vec<LayoutEdge> {
    skeleton
        .nodes
        .iter()
        .filter_map(|child| {
            let parent = &skeleton.nodes[child.parent?];
            Some(LayoutEdge {
                id: format!("edge-{}-{}", parent.id, child.id),
                source_id: parent.id.clone(),
                target_id: child.id.clone(),
                level: child.level,
                style_hints: edge_style(child.level, parent.parent.is_none()),
            })
        })
        .collect()
}
