pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Node not found: {node_id}")]
    NotFound { node_id: String },

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Nothing to build: the corpus and the taxonomy are both empty")]
    EmptyInput,

    #[error("Corrupt mind map ({map_id}): {message}")]
    CorruptTree { map_id: String, message: String },

    #[error("Malformed outline at line {line}: {message}")]
    MalformedOutline { line: usize, message: String },

    #[error("Id generator produced an id that is already in use: {id}")]
    DuplicateId { id: String },
}

impl Error {
    pub(crate) fn not_found(node_id: &str) -> Self {
        Self::NotFound {
            node_id: node_id.to_string(),
        }
    }
}
