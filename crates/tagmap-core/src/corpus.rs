//! Tag membership and co-occurrence index over a material corpus.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::model::Material;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub material_titles: IndexSet<String>,
    pub related_tags: IndexSet<String>,
}

/// Tags in first-encounter order, each with the titles carrying it and the tags seen next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagIndex {
    entries: IndexMap<String, TagEntry>,
}

impl TagIndex {
    pub fn build(materials: &[Material]) -> Self {
        let mut entries: IndexMap<String, TagEntry> = IndexMap::new();
        for material in materials {
            let tags = material.distinct_tags();
            for tag in &tags {
                let entry = entries.entry((*tag).to_string()).or_default();
                entry.material_titles.insert(material.title.clone());
                for other in &tags {
                    if other != tag {
                        entry.related_tags.insert((*other).to_string());
                    }
                }
            }
        }
        tracing::trace!(tags = entries.len(), "indexed corpus");
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, tag: &str) -> Option<&TagEntry> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn membership_count(&self, tag: &str) -> usize {
        self.entries
            .get(tag)
            .map(|e| e.material_titles.len())
            .unwrap_or(0)
    }

    /// Related tags of `tag` in index order; empty for unknown tags.
    pub fn related(&self, tag: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(tag)
            .into_iter()
            .flat_map(|e| e.related_tags.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Material> {
        vec![
            Material::new("X", ["web", "js"]),
            Material::new("Y", ["web", "css"]),
            Material::new("Y", ["web"]),
        ]
    }

    #[test]
    fn membership_uses_set_semantics() {
        let index = TagIndex::build(&corpus());
        assert_eq!(index.membership_count("web"), 2);
        assert_eq!(index.membership_count("js"), 1);
        assert_eq!(index.membership_count("missing"), 0);
    }

    #[test]
    fn relations_are_populated_in_both_directions() {
        let index = TagIndex::build(&corpus());
        assert_eq!(index.related("web").collect::<Vec<_>>(), ["js", "css"]);
        assert_eq!(index.related("js").collect::<Vec<_>>(), ["web"]);
        assert_eq!(index.related("css").collect::<Vec<_>>(), ["web"]);
    }

    #[test]
    fn iteration_follows_first_encounter() {
        let index = TagIndex::build(&corpus());
        assert_eq!(index.tags().collect::<Vec<_>>(), ["web", "js", "css"]);
    }

    #[test]
    fn repeated_and_blank_tags_are_ignored() {
        let index = TagIndex::build(&[Material::new("Z", ["a", " ", "a", "b"])]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.related("a").collect::<Vec<_>>(), ["b"]);
        assert!(!index.get("a").unwrap().related_tags.contains("a"));
    }

    #[test]
    fn empty_corpus_and_untagged_materials_yield_empty_index() {
        assert!(TagIndex::build(&[]).is_empty());
        assert!(TagIndex::build(&[Material::new("untagged", Vec::<String>::new())]).is_empty());
    }
}
