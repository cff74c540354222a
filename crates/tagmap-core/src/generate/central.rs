use crate::corpus::TagIndex;
use crate::model::TagCategory;

use super::Focus;

/// The node a generated map is centred on.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor<'a> {
    /// A corpus tag; empty when the corpus has no tags at all.
    Corpus { tag: String },
    /// A taxonomy node together with its label path from the forest root (inclusive).
    Taxonomy {
        category: &'a TagCategory,
        path: Vec<String>,
    },
}

/// Picks the tag with the most materials; ties go to the tag encountered first.
///
/// An explicitly selected label wins when the corpus knows it.
pub fn select_corpus_tag(index: &TagIndex, selected: Option<&str>) -> String {
    if let Some(label) = selected {
        if index.contains(label) {
            return label.to_string();
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (tag, entry) in index.iter() {
        let count = entry.material_titles.len();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((tag, count)),
        }
    }
    best.map(|(tag, _)| tag.to_string()).unwrap_or_default()
}

/// Depth-first pre-order search of the taxonomy forest for the focus label.
///
/// A selected label must match a category name exactly; a query matches the first name that
/// contains it case-insensitively.
pub fn find_taxonomy_anchor<'a>(
    forest: &'a [TagCategory],
    focus: &Focus,
) -> Option<(&'a TagCategory, Vec<String>)> {
    let matcher: Box<dyn Fn(&str) -> bool> = if let Some(label) = focus.selected_label() {
        let label = label.to_string();
        Box::new(move |name: &str| name == label)
    } else if let Some(query) = focus.query_text() {
        let needle = query.to_lowercase();
        Box::new(move |name: &str| name.to_lowercase().contains(&needle))
    } else {
        return None;
    };

    let mut stack: Vec<(&TagCategory, usize)> = forest.iter().rev().map(|c| (c, 0)).collect();
    let mut path: Vec<String> = Vec::new();
    while let Some((category, depth)) = stack.pop() {
        path.truncate(depth);
        path.push(category.name.clone());
        if matcher(&category.name) {
            return Some((category, path));
        }
        for child in category.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    None
}

pub fn select_anchor<'a>(index: &TagIndex, forest: &'a [TagCategory], focus: &Focus) -> Anchor<'a> {
    if let Some((category, path)) = find_taxonomy_anchor(forest, focus) {
        tracing::debug!(anchor = %category.name, depth = path.len(), "taxonomy anchor found");
        return Anchor::Taxonomy { category, path };
    }

    let tag = select_corpus_tag(index, focus.selected_label());
    tracing::debug!(central = %tag, "corpus anchor selected");
    Anchor::Corpus { tag }
}
