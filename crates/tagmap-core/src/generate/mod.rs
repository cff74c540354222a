//! Corpus/taxonomy driven mind map generation.
//!
//! The pipeline is strictly leaf-first: index the corpus, choose an anchor, expand it into a
//! level-tagged skeleton, then place the skeleton radially and derive edges. Every step is a
//! pure function of its inputs, so identical inputs always produce identical node/edge lists.

mod central;
mod edges;
mod levels;
mod radial;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::corpus::TagIndex;
use crate::model::{LayoutEdge, LayoutNode, Material, TagCategory};
use crate::{Error, Result};

pub use central::{Anchor, find_taxonomy_anchor, select_anchor, select_corpus_tag};
pub use edges::edge_style;

/// What the caller wants the map to be centred on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Focus {
    #[default]
    None,
    /// An explicitly chosen tag/category label (exact match).
    Selected(String),
    /// Free-text search (case-insensitive substring match); also pulls in matching materials.
    Query(String),
}

impl Focus {
    pub fn selected(label: impl Into<String>) -> Self {
        Self::Selected(label.into())
    }

    pub fn query(text: impl Into<String>) -> Self {
        Self::Query(text.into())
    }

    /// The search text, when it is non-blank.
    pub fn query_text(&self) -> Option<&str> {
        match self {
            Focus::Query(q) if !q.trim().is_empty() => Some(q.trim()),
            _ => None,
        }
    }

    pub fn selected_label(&self) -> Option<&str> {
        match self {
            Focus::Selected(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildMode {
    Corpus,
    Taxonomy,
    /// Nothing to expand: the output is a lone central node.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMindMap {
    pub mode: BuildMode,
    pub central_label: String,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl TagMindMap {
    /// Turns the degraded single-node result into [`Error::EmptyInput`] for strict callers.
    pub fn require_content(self) -> Result<Self> {
        if self.mode == BuildMode::Empty {
            return Err(Error::EmptyInput);
        }
        Ok(self)
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Builds the positioned tag mind map for `materials`, optionally anchored in `taxonomy`.
pub fn build_tag_mind_map(
    materials: &[Material],
    taxonomy: &[TagCategory],
    focus: &Focus,
    config: &GenerationConfig,
) -> TagMindMap {
    let index = TagIndex::build(materials);
    let anchor = select_anchor(&index, taxonomy, focus);

    let mut skeleton = match &anchor {
        Anchor::Corpus { tag } => levels::assign_corpus(&index, tag, focus, materials, config),
        Anchor::Taxonomy { category, path } => {
            levels::assign_taxonomy(category, path, materials)
        }
    };

    if let Some(query) = focus.query_text() {
        levels::attach_search_materials(&mut skeleton, materials, query, config);
    }
    if config.materials_per_tag > 0 {
        levels::attach_tag_materials(&mut skeleton, config.materials_per_tag);
    }

    let taxonomy_driven = matches!(anchor, Anchor::Taxonomy { .. });
    radial::place(&mut skeleton, taxonomy_driven, &config.radial);

    let mode = if skeleton.nodes.len() <= 1 {
        BuildMode::Empty
    } else if taxonomy_driven {
        BuildMode::Taxonomy
    } else {
        BuildMode::Corpus
    };

    let central_label = skeleton.nodes[0].label.clone();
    tracing::debug!(
        ?mode,
        central = %central_label,
        nodes = skeleton.nodes.len(),
        "built tag mind map"
    );

    let edges = edges::derive_edges(&skeleton);
    let nodes = skeleton.into_layout_nodes();
    TagMindMap {
        mode,
        central_label,
        nodes,
        edges,
    }
}
