#![forbid(unsafe_code)]

//! Tag-driven mind map construction (headless).
//!
//! Design goals:
//! - deterministic output: identical inputs give identical node/edge lists and coordinates
//! - pure, synchronous computations with no I/O
//! - JSON-friendly boundary types (camelCase) shared with UI collaborators

pub mod config;
pub mod corpus;
pub mod error;
pub mod generate;
pub mod model;
pub mod outline;
pub mod tree;

pub use config::{GenerationConfig, MapConfig, RadialConstants};
pub use corpus::{TagEntry, TagIndex};
pub use error::{Error, Result};
pub use generate::{BuildMode, Focus, TagMindMap, build_tag_mind_map, edge_style};
pub use model::{EdgeStyle, LayoutEdge, LayoutNode, Material, NodeKind, Point, TagCategory};
pub use outline::{
    OutlineEntry, escape_outline_text, parse_outline, serialize_outline,
    serialize_taxonomy_outline, unescape_outline_text,
};
pub use tree::{
    IdGenerator, MindMap, MindMapEditor, MindMapInfoUpdate, MindMapNode, NewMindMap, RandomIds,
    SequentialIds,
};
