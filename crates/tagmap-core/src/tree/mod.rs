//! The persisted mind-map tree and its editing operations.
//!
//! `MindMap::nodes` is the source of truth. Each node keeps its parent id plus an inline list of
//! child ids, and `MindMap::root_node` mirrors the root entry of `nodes`. Every editor operation
//! takes the tree by reference and returns an updated copy.

mod ids;


use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

pub use ids::{IdGenerator, RandomIds, SequentialIds};

pub const DEFAULT_ROOT_TEXT: &str = "Central topic";

/// Attempts before an id generator that keeps colliding is reported as [`Error::DuplicateId`].
const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapNode {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ids of the direct children, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl MindMapNode {
    fn new(id: String, text: String, parent_id: Option<String>) -> Self {
        Self {
            id,
            text,
            parent_id,
            children: Vec::new(),
            attributes: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMap {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root_node: MindMapNode,
    pub nodes: Vec<MindMapNode>,
    pub owner_id: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MindMap {
    pub fn node(&self, id: &str) -> Option<&MindMapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut MindMapNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// The root entry of `nodes` (not the mirror).
    pub fn root(&self) -> Option<&MindMapNode> {
        self.node(&self.root_node.id)
    }

    /// Direct children of every node: the resolvable inline ids first, then nodes that name the
    /// node as parent but are missing from its list, in `nodes` order.
    pub fn child_lists(&self) -> IndexMap<&str, Vec<&str>> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut lists: IndexMap<&str, Vec<&str>> = self
            .nodes
            .iter()
            .map(|n| {
                let inline = n
                    .children
                    .iter()
                    .map(String::as_str)
                    .filter(|c| ids.contains(c))
                    .collect();
                (n.id.as_str(), inline)
            })
            .collect();
        for node in &self.nodes {
            let Some(parent) = node.parent_id.as_deref() else {
                continue;
            };
            let Some(list) = lists.get_mut(parent) else {
                continue;
            };
            if !list.contains(&node.id.as_str()) {
                tracing::debug!(node = %node.id, parent, "child reachable only through its parent link");
                list.push(node.id.as_str());
            }
        }
        lists
    }

    /// Direct children of `id`, as listed by [`MindMap::child_lists`].
    pub fn children_of(&self, id: &str) -> Vec<&MindMapNode> {
        self.child_lists()
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|c| self.node(c))
            .collect()
    }

    /// Every node below `id` (excluding `id`), discovered through parent links.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut by_parent: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent) = node.parent_id.as_deref() {
                by_parent.entry(parent).or_default().push(node.id.as_str());
            }
        }

        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut stack: Vec<&str> = vec![id];
        while let Some(current) = stack.pop() {
            for &child in by_parent.get(current).into_iter().flatten() {
                if child != id && seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        seen.into_iter().map(str::to_string).collect()
    }

    /// Number of parent hops from `id` to the root; `None` for unknown ids or broken chains.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut current = self.node(id)?;
        let mut depth = 0;
        while let Some(parent) = current.parent_id.as_deref() {
            depth += 1;
            if depth > self.nodes.len() {
                return None;
            }
            current = self.node(parent)?;
        }
        Some(depth)
    }

    /// Checks the structural invariants of a tree read back from storage.
    pub fn validate(&self) -> Result<()> {
        let corrupt = |message: String| Error::CorruptTree {
            map_id: self.id.clone(),
            message,
        };

        let mut ids: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(corrupt(format!("node id {} appears twice", node.id)));
            }
        }

        let roots: Vec<&MindMapNode> = self.nodes.iter().filter(|n| n.is_root()).collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(corrupt("no root node".to_string())),
            _ => return Err(corrupt(format!("{} root nodes", roots.len()))),
        };
        if *root != self.root_node {
            return Err(corrupt(format!(
                "rootNode mirror {} does not match root {}",
                self.root_node.id, root.id
            )));
        }

        for node in &self.nodes {
            if let Some(parent_id) = node.parent_id.as_deref() {
                let Some(parent) = self.node(parent_id) else {
                    return Err(corrupt(format!(
                        "parent {parent_id} of {} does not exist",
                        node.id
                    )));
                };
                if !parent.children.iter().any(|c| *c == node.id) {
                    return Err(corrupt(format!(
                        "{} is missing from the children of {parent_id}",
                        node.id
                    )));
                }
            }
            for child_id in &node.children {
                match self.node(child_id) {
                    Some(child) if child.parent_id.as_deref() == Some(node.id.as_str()) => {}
                    Some(_) => {
                        return Err(corrupt(format!(
                            "child {child_id} of {} points at another parent",
                            node.id
                        )));
                    }
                    None => {
                        return Err(corrupt(format!(
                            "child {child_id} of {} does not exist",
                            node.id
                        )));
                    }
                }
            }
            if self.depth_of(&node.id).is_none() {
                return Err(corrupt(format!("{} is part of a cycle", node.id)));
            }
        }
        Ok(())
    }

    fn sync_root_mirror(&mut self) {
        let root_id = self.root_node.id.clone();
        if let Some(root) = self.node(&root_id) {
            self.root_node = root.clone();
        }
    }
}

/// Parameters for [`MindMapEditor::create_mind_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMindMap {
    pub title: String,
    pub owner_id: String,
    /// Falls back to [`DEFAULT_ROOT_TEXT`].
    #[serde(default)]
    pub root_text: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewMindMap {
    pub fn new(title: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    pub fn root_text(mut self, text: impl Into<String>) -> Self {
        self.root_text = Some(text.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of the descriptive fields; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapInfoUpdate {
    #[serde(default)]
    pub title: Option<String>,
    /// An empty description clears it.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Applies edits to [`MindMap`] values using an injected id generator and clock.
#[derive(Debug, Clone)]
pub struct MindMapEditor<G = RandomIds> {
    ids: G,
    fixed_now: Option<DateTime<Utc>>,
}

impl MindMapEditor<RandomIds> {
    pub fn new() -> Self {
        Self::with_ids(RandomIds)
    }
}

impl Default for MindMapEditor<RandomIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> MindMapEditor<G> {
    pub fn with_ids(ids: G) -> Self {
        Self {
            ids,
            fixed_now: None,
        }
    }

    /// Pins the clock used for `createdAt`/`updatedAt` (tests, reproducible CLI output).
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    fn fresh_node_id(&mut self, tree: &MindMap) -> Result<String> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id("node");
            if !tree.contains(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(id = %candidate, "node id collision, drawing again");
            last = candidate;
        }
        Err(Error::DuplicateId { id: last })
    }

    pub fn create_mind_map(&mut self, new: NewMindMap) -> MindMap {
        let now = self.now();
        let id = self.ids.next_id("map");
        let root_text = new
            .root_text
            .unwrap_or_else(|| DEFAULT_ROOT_TEXT.to_string());
        let root = MindMapNode::new(self.ids.next_id("node"), root_text, None);
        tracing::debug!(map = %id, root = %root.id, "created mind map");

        MindMap {
            id,
            title: new.title,
            description: new.description,
            root_node: root.clone(),
            nodes: vec![root],
            owner_id: new.owner_id,
            is_public: new.is_public,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a new node under `parent_id`.
    pub fn add_node(&mut self, tree: &MindMap, parent_id: &str, text: &str) -> Result<MindMap> {
        if !tree.contains(parent_id) {
            return Err(Error::not_found(parent_id));
        }
        let id = self.fresh_node_id(tree)?;

        let mut next = tree.clone();
        if let Some(parent) = next.node_mut(parent_id) {
            parent.children.push(id.clone());
        }
        next.nodes.push(MindMapNode::new(
            id,
            text.to_string(),
            Some(parent_id.to_string()),
        ));
        next.updated_at = self.now();
        next.sync_root_mirror();
        Ok(next)
    }

    pub fn update_node(&self, tree: &MindMap, node_id: &str, text: &str) -> Result<MindMap> {
        let mut next = tree.clone();
        let node = next
            .node_mut(node_id)
            .ok_or_else(|| Error::not_found(node_id))?;
        node.text = text.to_string();
        next.updated_at = self.now();
        next.sync_root_mirror();
        Ok(next)
    }

    /// Removes `node_id` together with its whole subtree. The root cannot be removed.
    pub fn remove_node(&self, tree: &MindMap, node_id: &str) -> Result<MindMap> {
        if node_id == tree.root_node.id {
            return Err(Error::InvalidOperation {
                message: "Cannot remove root node".to_string(),
            });
        }
        if !tree.contains(node_id) {
            return Err(Error::not_found(node_id));
        }

        let mut doomed: HashSet<String> = tree.descendants(node_id).into_iter().collect();
        doomed.insert(node_id.to_string());
        tracing::debug!(node = %node_id, removed = doomed.len(), "removing subtree");

        let mut next = tree.clone();
        next.nodes.retain(|n| !doomed.contains(&n.id));
        for node in &mut next.nodes {
            node.children.retain(|c| !doomed.contains(c));
        }
        next.updated_at = self.now();
        next.sync_root_mirror();
        Ok(next)
    }

    pub fn update_info(&self, tree: &MindMap, update: MindMapInfoUpdate) -> MindMap {
        let mut next = tree.clone();
        if let Some(title) = update.title {
            next.title = title;
        }
        if let Some(description) = update.description {
            next.description = (!description.is_empty()).then_some(description);
        }
        if let Some(is_public) = update.is_public {
            next.is_public = is_public;
        }
        if let Some(tags) = update.tags {
            next.tags = tags;
        }
        next.updated_at = self.now();
        next
    }
}
