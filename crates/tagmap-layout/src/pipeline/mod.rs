//! The layered layout pipeline.
//!
//! Runs on a graph whose nodes already carry their width and height. Afterwards every node has a
//! center `(x, y)` and every edge a polyline that starts and ends on its endpoints' borders.

mod acyclic;
mod coordinate_system;
mod normalize;
mod order;
mod position;
mod rank;

use crate::model::{LayoutGraph, NodeLabel, Point};

pub(crate) fn layout(g: &mut LayoutGraph) {
    acyclic::run(g);
    rank::longest_path(g);
    normalize::run(g);
    order::order(g);
    coordinate_system::adjust(g);
    position::position(g);
    normalize::undo(g);
    coordinate_system::undo(g);
    translate(g);
    assign_node_intersects(g);
    acyclic::undo(g);
}

/// Shifts the drawing so its top-left corner sits at the origin and records its extent.
fn translate(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in g.nodes() {
        let Some(n) = g.node(v) else {
            continue;
        };
        min_x = min_x.min(n.x - n.width / 2.0);
        min_y = min_y.min(n.y - n.height / 2.0);
        max_x = max_x.max(n.x + n.width / 2.0);
        max_y = max_y.max(n.y + n.height / 2.0);
    }
    if !min_x.is_finite() {
        return;
    }

    g.for_each_node_mut(|_id, n| {
        n.x -= min_x;
        n.y -= min_y;
    });
    g.for_each_edge_mut(|_key, e| {
        for p in &mut e.points {
            p.x -= min_x;
            p.y -= min_y;
        }
    });
    let label = g.graph_mut();
    label.width = max_x - min_x;
    label.height = max_y - min_y;
}

fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let (Some(src), Some(dst)) = (g.node(&e.v).map(Rect::of), g.node(&e.w).map(Rect::of))
        else {
            continue;
        };
        let Some(label) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let (toward_src, toward_dst) = match (label.points.first(), label.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (dst.center(), src.center()),
        };
        label.points.insert(0, intersect_rect(src, toward_src));
        label.points.push(intersect_rect(dst, toward_dst));
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn of(n: &NodeLabel) -> Self {
        Self {
            x: n.x,
            y: n.y,
            width: n.width,
            height: n.height,
        }
    }

    fn center(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Where the segment from the center of `rect` toward `point` leaves the rectangle.
fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    // Coincident centers have no direction; use the right edge.
    if dx == 0.0 && dy == 0.0 {
        return Point::new(rect.x + w, rect.y);
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Point::new(rect.x + sx, rect.y + sy)
}
