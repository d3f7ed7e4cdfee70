pub type Result<T> = std::result::Result<T, Error>;

/// Failures while loading a dashboard snapshot.
///
/// Lookups of unknown nodes or edges are not errors; they return `None` or
/// `false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid snapshot document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown routing style index {0}")]
    UnknownStyle(i64),

    #[error("unknown ending style index {0}")]
    UnknownEndingStyle(i64),

    #[error("snapshot contains a node without an id")]
    EmptyNodeId,

    #[error("duplicate node id `{0}` in snapshot")]
    DuplicateNodeId(String),

    #[error("invalid zoom factor {0}")]
    InvalidZoomFactor(f32),
}
