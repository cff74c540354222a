#![forbid(unsafe_code)]

//! Graph container used by `tagmap-layout`.
//!
//! A small, insertion-ordered directed multigraph with string node ids and arbitrary node, edge
//! and graph labels.

pub mod alg;
pub mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions};
