//! Boundary value types shared by the generation pipeline and its consumers.

use serde::{Deserialize, Serialize};

/// A tagged learning material, already normalized by the caller's adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Material {
    pub fn new<T, I, S>(title: T, tags: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Tags in declared order with blanks and repeats removed.
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if tag.is_empty() || out.contains(&tag) {
                continue;
            }
            out.push(tag);
        }
        out
    }

    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.iter().any(|t| t.trim() == label)
    }

    /// Case-insensitive substring match against the title and every tag.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        if self.title.to_lowercase().contains(query_lower) {
            return true;
        }
        self.tags
            .iter()
            .any(|t| t.to_lowercase().contains(query_lower))
    }
}

/// One node of the externally supplied tag taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<TagCategory>,
}

impl TagCategory {
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TagCategory>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `distance` away from `self` in direction `angle` (radians).
    pub fn polar_offset(self, distance: f64, angle: f64) -> Self {
        Self {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Central,
    Tag,
    Material,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub level: u32,
    pub kind: NodeKind,
    pub label: String,
    pub position: Point,
    /// Labels down to this node, inclusive. Corpus maps start at the central tag; taxonomy maps
    /// start at the anchor's forest root so the path names the full category chain.
    pub full_path: Vec<String>,
    #[serde(default)]
    pub attached_materials: Vec<Material>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke_width: f64,
    pub emphasis: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub level: u32,
    pub style_hints: EdgeStyle,
}
