use std::collections::{HashSet, VecDeque};

use crate::config::GenerationConfig;
use crate::corpus::TagIndex;
use crate::model::{LayoutNode, Material, NodeKind, Point, TagCategory};

use super::Focus;

pub(super) const CENTRAL_ID: &str = "central";

#[derive(Debug, Clone)]
pub(super) struct SkeletonNode {
    pub(super) id: String,
    pub(super) parent: Option<usize>,
    pub(super) level: u32,
    pub(super) kind: NodeKind,
    pub(super) label: String,
    pub(super) full_path: Vec<String>,
    pub(super) materials: Vec<Material>,
    pub(super) children: Vec<usize>,
    pub(super) position: Point,
    /// Direction from the centre used to fan out this node's children.
    pub(super) angle: f64,
}

/// Arena of the level-assigned tree; parents always precede their children.
#[derive(Debug, Clone)]
pub(super) struct Skeleton {
    pub(super) nodes: Vec<SkeletonNode>,
}

impl Skeleton {
    fn with_center(label: &str, full_path: Vec<String>, materials: &[Material]) -> Self {
        let center = SkeletonNode {
            id: CENTRAL_ID.to_string(),
            parent: None,
            level: 0,
            kind: NodeKind::Central,
            label: label.to_string(),
            full_path,
            materials: materials_tagged(materials, label),
            children: Vec::new(),
            position: Point::ORIGIN,
            angle: 0.0,
        };
        Self {
            nodes: vec![center],
        }
    }

    fn push_child(
        &mut self,
        parent: usize,
        kind: NodeKind,
        label: &str,
        materials: Vec<Material>,
    ) -> usize {
        let ordinal = self.nodes[parent]
            .children
            .iter()
            .filter(|c| self.nodes[**c].kind == kind)
            .count();
        let parent_node = &self.nodes[parent];
        let id = child_id(parent_node, kind, ordinal);
        let mut full_path = parent_node.full_path.clone();
        full_path.push(label.to_string());

        let idx = self.nodes.len();
        let node = SkeletonNode {
            id,
            parent: Some(parent),
            level: parent_node.level + 1,
            kind,
            label: label.to_string(),
            full_path,
            materials,
            children: Vec::new(),
            position: Point::ORIGIN,
            angle: 0.0,
        };
        self.nodes.push(node);
        self.nodes[parent].children.push(idx);
        idx
    }

    pub(super) fn into_layout_nodes(self) -> Vec<LayoutNode> {
        self.nodes
            .into_iter()
            .map(|n| LayoutNode {
                id: n.id,
                level: n.level,
                kind: n.kind,
                label: n.label,
                position: n.position,
                full_path: n.full_path,
                attached_materials: n.materials,
            })
            .collect()
    }
}

/// `tag-0`, `tag-0-2`, `material-0-2-1`, `search-3`.
fn child_id(parent: &SkeletonNode, kind: NodeKind, ordinal: usize) -> String {
    let parent_suffix = parent.id.strip_prefix("tag-");
    match (kind, parent_suffix) {
        (NodeKind::Material, None) => format!("search-{ordinal}"),
        (NodeKind::Material, Some(suffix)) => format!("material-{suffix}-{ordinal}"),
        (_, None) => format!("tag-{ordinal}"),
        (_, Some(suffix)) => format!("tag-{suffix}-{ordinal}"),
    }
}

fn materials_tagged(materials: &[Material], label: &str) -> Vec<Material> {
    if label.is_empty() {
        return Vec::new();
    }
    materials.iter().filter(|m| m.has_tag(label)).cloned().collect()
}

pub(super) fn assign_corpus(
    index: &TagIndex,
    central: &str,
    focus: &Focus,
    materials: &[Material],
    config: &GenerationConfig,
) -> Skeleton {
    // With no corpus tag to centre on, the caller's own focus text is the best label we have.
    let label = if central.is_empty() {
        focus
            .selected_label()
            .or_else(|| focus.query_text())
            .unwrap_or_default()
    } else {
        central
    };
    let mut skeleton = Skeleton::with_center(label, vec![label.to_string()], materials);
    if central.is_empty() {
        return skeleton;
    }

    let first_level: Vec<&str> = index.related(central).take(config.max_first_level).collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(first_level.len() + 1);
    placed.insert(central);
    placed.extend(first_level.iter().copied());

    let mut first_level_idx = Vec::with_capacity(first_level.len());
    for tag in &first_level {
        let idx = skeleton.push_child(0, NodeKind::Tag, tag, materials_tagged(materials, tag));
        first_level_idx.push((idx, *tag));
    }
    tracing::trace!(count = first_level.len(), "corpus level 1");

    // Level 2: a tag claimed by an earlier first-level sibling is skipped by later ones.
    for (parent_idx, parent_tag) in first_level_idx {
        let second: Vec<&str> = index
            .related(parent_tag)
            .filter(|t| !placed.contains(t))
            .take(config.max_children_per_tag)
            .collect();
        for tag in second {
            placed.insert(tag);
            skeleton.push_child(
                parent_idx,
                NodeKind::Tag,
                tag,
                materials_tagged(materials, tag),
            );
        }
    }
    tracing::trace!(total = skeleton.nodes.len(), "corpus level 2");

    skeleton
}

pub(super) fn assign_taxonomy(
    anchor: &TagCategory,
    path: &[String],
    materials: &[Material],
) -> Skeleton {
    let mut skeleton = Skeleton::with_center(&anchor.name, path.to_vec(), materials);

    let mut queue: VecDeque<(usize, &TagCategory)> = VecDeque::new();
    queue.push_back((0, anchor));
    while let Some((parent_idx, category)) = queue.pop_front() {
        for child in &category.children {
            let idx = skeleton.push_child(
                parent_idx,
                NodeKind::Tag,
                &child.name,
                materials_tagged(materials, &child.name),
            );
            queue.push_back((idx, child));
        }
    }
    tracing::trace!(total = skeleton.nodes.len(), "taxonomy levels mirrored");

    skeleton
}

/// Hangs up to `max_search_materials` query matches directly under the central node.
pub(super) fn attach_search_materials(
    skeleton: &mut Skeleton,
    materials: &[Material],
    query: &str,
    config: &GenerationConfig,
) {
    let needle = query.to_lowercase();
    let hits: Vec<&Material> = materials
        .iter()
        .filter(|m| m.matches_query(&needle))
        .take(config.max_search_materials)
        .collect();
    tracing::trace!(hits = hits.len(), "search material leaves");
    for material in hits {
        skeleton.push_child(0, NodeKind::Material, &material.title, vec![material.clone()]);
    }
}

/// Gives every tag node without tag children up to `per_tag` material leaves.
pub(super) fn attach_tag_materials(skeleton: &mut Skeleton, per_tag: usize) {
    let leaves: Vec<usize> = (0..skeleton.nodes.len())
        .filter(|&i| {
            let node = &skeleton.nodes[i];
            node.kind == NodeKind::Tag
                && !node
                    .children
                    .iter()
                    .any(|c| skeleton.nodes[*c].kind == NodeKind::Tag)
        })
        .collect();

    for idx in leaves {
        let picks: Vec<Material> = skeleton.nodes[idx]
            .materials
            .iter()
            .take(per_tag)
            .cloned()
            .collect();
        for material in picks {
            let title = material.title.clone();
            skeleton.push_child(idx, NodeKind::Material, &title, vec![material]);
        }
    }
}
