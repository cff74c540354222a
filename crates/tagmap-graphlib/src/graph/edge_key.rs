//! Edge key type.
//!
//! Edges are identified by their endpoints `v -> w` plus an optional `name`, which lets a
//! multigraph hold several parallel edges.

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    pub fn unnamed(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self::new(v, w, None::<String>)
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}
