//! The directed `Graph` container.
//!
//! Nodes and edges are kept in insertion order, which every query below preserves; layout passes
//! rely on that for deterministic output.

mod edge_key;
mod entries;

pub use edge_key::EdgeKey;

use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Allow parallel edges distinguished by name. Without it names are dropped.
    pub multigraph: bool,
}

#[derive(Debug, Clone)]
pub struct Graph<N, E, G = ()> {
    options: GraphOptions,
    graph_label: G,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    /// Per-node incident edges in insertion order, so adjacency queries skip the full edge scan.
    out_adj: HashMap<String, Vec<EdgeKey>>,
    in_adj: HashMap<String, Vec<EdgeKey>>,
}

impl<N, E, G> Graph<N, E, G>
where
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            out_adj: HashMap::default(),
            in_adj: HashMap::default(),
        }
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    fn canonical_name(&self, name: Option<String>) -> Option<String> {
        if self.options.multigraph { name } else { None }
    }

    fn lookup_key(&self, v: &str, w: &str, name: Option<&str>) -> EdgeKey {
        EdgeKey {
            v: v.to_string(),
            w: w.to_string(),
            name: self.canonical_name(name.map(str::to_string)),
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts `id` or replaces its label; an existing node keeps its position in the order.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in &mut self.nodes {
            f(n.id.as_str(), &mut n.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in &mut self.edges {
            f(&e.key, &mut e.label);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&self.lookup_key(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let idx = *self.edge_index.get(&self.lookup_key(v, w, name))?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let idx = *self.edge_index.get(&self.lookup_key(v, w, name))?;
        Some(&mut self.edges[idx].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        let (v, w, name) = (key.v.clone(), key.w.clone(), key.name.clone());
        self.edge_mut(&v, &w, name.as_deref())
    }

    fn reindex_edges_from(&mut self, start: usize) {
        for i in start..self.edges.len() {
            if let Some(slot) = self.edge_index.get_mut(&self.edges[i].key) {
                *slot = i;
            }
        }
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let key = self.lookup_key(v, w, name);
        let idx = self.edge_index.remove(&key)?;
        let entry = self.edges.remove(idx);
        self.reindex_edges_from(idx);
        detach(&mut self.out_adj, &key.v, &key);
        detach(&mut self.in_adj, &key.w, &key);
        Some(entry.label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Removes `id` together with every incident edge.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let idx = self.node_index.remove(id)?;
        let entry = self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            if let Some(slot) = self.node_index.get_mut(self.nodes[i].id.as_str()) {
                *slot = i;
            }
        }

        for key in self.out_adj.remove(id).unwrap_or_default() {
            detach(&mut self.in_adj, &key.w, &key);
        }
        for key in self.in_adj.remove(id).unwrap_or_default() {
            detach(&mut self.out_adj, &key.v, &key);
        }

        let before = self.edges.len();
        self.edges.retain(|e| e.key.v != id && e.key.w != id);
        if self.edges.len() != before {
            self.edge_index.clear();
            for (i, e) in self.edges.iter().enumerate() {
                self.edge_index.insert(e.key.clone(), i);
            }
        }
        Some(entry.label)
    }

    /// Targets of `v`'s out-edges, in edge insertion order, without repeats.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for key in self.out_adj.get(v).into_iter().flatten() {
            if !out.contains(&key.w.as_str()) {
                out.push(key.w.as_str());
            }
        }
        out
    }

    /// Sources of `v`'s in-edges, in edge insertion order, without repeats.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for key in self.in_adj.get(v).into_iter().flatten() {
            if !out.contains(&key.v.as_str()) {
                out.push(key.v.as_str());
            }
        }
        out
    }

    pub fn out_edges(&self, v: &str) -> Vec<EdgeKey> {
        self.out_adj.get(v).cloned().unwrap_or_default()
    }
}

fn detach(adj: &mut HashMap<String, Vec<EdgeKey>>, id: &str, key: &EdgeKey) {
    if let Some(list) = adj.get_mut(id) {
        if let Some(pos) = list.iter().position(|k| k == key) {
            list.remove(pos);
        }
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
{
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
    E: Default,
{
    /// Adds (or relabels) an edge, creating missing endpoints with default labels.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let (v, w) = (v.into(), w.into());
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        let name = self.canonical_name(name.map(Into::into));
        let key = EdgeKey { v, w, name };

        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        let idx = self.edges.len();
        self.out_adj
            .entry(key.v.clone())
            .or_default()
            .push(key.clone());
        self.in_adj.entry(key.w.clone()).or_default().push(key.clone());
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label: label.unwrap_or_default(),
        });
        self.edge_index.insert(key, idx);
        self
    }
}
