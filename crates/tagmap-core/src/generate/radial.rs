use std::f64::consts::TAU;

use crate::config::RadialConstants;
use crate::model::{NodeKind, Point};

use super::levels::Skeleton;

/// Assigns a position (and fan-out angle) to every skeleton node.
///
/// Parents precede children in the arena, so a single forward pass always sees a placed parent.
pub(super) fn place(skeleton: &mut Skeleton, taxonomy_driven: bool, c: &RadialConstants) {
    if let Some(center) = skeleton.nodes.first_mut() {
        center.position = Point::ORIGIN;
        center.angle = 0.0;
    }

    for parent in 0..skeleton.nodes.len() {
        let tags = children_of_kind(skeleton, parent, NodeKind::Tag);
        let materials = children_of_kind(skeleton, parent, NodeKind::Material);

        if parent == 0 {
            place_ring(skeleton, &tags, c);
            place_search_row(skeleton, &materials, c);
            continue;
        }

        let wedge = if taxonomy_driven {
            c.taxonomy_wedge
        } else {
            c.corpus_wedge
        };
        let child_level = skeleton.nodes[parent].level + 1;
        let tag_offset = match (taxonomy_driven, child_level) {
            (false, _) => c.corpus_tag_offset,
            (true, 2) => c.taxonomy_level2_offset,
            (true, _) => c.taxonomy_deep_offset,
        };
        place_wedge(skeleton, parent, &tags, wedge, tag_offset);
        place_wedge(skeleton, parent, &materials, wedge, c.material_offset);
    }
}

fn children_of_kind(skeleton: &Skeleton, parent: usize, kind: NodeKind) -> Vec<usize> {
    skeleton.nodes[parent]
        .children
        .iter()
        .copied()
        .filter(|&c| skeleton.nodes[c].kind == kind)
        .collect()
}

fn place_ring(skeleton: &mut Skeleton, ring: &[usize], c: &RadialConstants) {
    let n = ring.len();
    if n == 0 {
        return;
    }
    let radius = c.min_first_radius.max(n as f64 * c.radius_per_sibling);
    for (i, &idx) in ring.iter().enumerate() {
        let angle = i as f64 * TAU / n as f64;
        let node = &mut skeleton.nodes[idx];
        node.angle = angle;
        node.position = Point::ORIGIN.polar_offset(radius, angle);
    }
}

fn place_search_row(skeleton: &mut Skeleton, row: &[usize], c: &RadialConstants) {
    let half = (row.len() / 2) as f64;
    for (i, &idx) in row.iter().enumerate() {
        let x = (i as f64 - half) * c.search_row_spacing;
        let y = c.search_row_y;
        let node = &mut skeleton.nodes[idx];
        node.position = Point::new(x, y);
        node.angle = y.atan2(x);
    }
}

fn place_wedge(skeleton: &mut Skeleton, parent: usize, fan: &[usize], wedge: f64, offset: f64) {
    let n = fan.len();
    if n == 0 {
        return;
    }
    let origin = skeleton.nodes[parent].position;
    let theta = skeleton.nodes[parent].angle;
    for (i, &idx) in fan.iter().enumerate() {
        let angle = if n > 1 {
            theta + wedge * (i as f64 / (n - 1) as f64 - 0.5)
        } else {
            theta
        };
        let node = &mut skeleton.nodes[idx];
        node.angle = angle;
        node.position = origin.polar_offset(offset, angle);
    }
}
