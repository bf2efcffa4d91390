use std::fmt;

/// Errors raised while reading, decoding, or encoding a topology.
#[derive(Debug)]
pub enum TopoError {
    Json(serde_json::Error),
    /// Document is valid JSON but its `type` is not `Topology`.
    NotATopology,
    /// Document structure does not follow the TopoJSON format.
    InvalidData(String),
    /// The named object is not present in `objects`.
    MissingObject(String),
    /// A geometry references an arc index past the end of `arcs`.
    ArcOutOfRange(i64),
}

impl From<serde_json::Error> for TopoError {
    fn from(e: serde_json::Error) -> Self {
        TopoError::Json(e)
    }
}

impl fmt::Display for TopoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopoError::Json(e) => write!(f, "invalid JSON: {e}"),
            TopoError::NotATopology => write!(f, "document is not a TopoJSON topology"),
            TopoError::InvalidData(msg) => write!(f, "invalid TopoJSON: {msg}"),
            TopoError::MissingObject(name) => write!(f, "topology has no object named '{name}'"),
            TopoError::ArcOutOfRange(index) => write!(f, "arc index {index} is out of range"),
        }
    }
}

impl std::error::Error for TopoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TopoError::Json(e) => Some(e),
            _ => None,
        }
    }
}
