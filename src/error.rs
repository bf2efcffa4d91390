use thiserror::Error;

/// Errors raised by the object model.
///
/// Validation failures are raised at the point of assignment; nothing is
/// retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unrecognized input.
    #[error("{0}")]
    Value(String),

    /// The operation needs a Cargo feature that was not compiled in.
    #[error("{0}")]
    Dependency(String),

    /// JavaScript literal text could not be tokenized or parsed.
    #[error("unable to parse JavaScript literal at offset {position}: {message}")]
    JsParse { position: usize, message: String },

    /// Generated or supplied JavaScript is structurally invalid.
    #[error("{0}")]
    JavaScript(String),

    /// A series could not be converted to another series type.
    #[error("{0}")]
    SeriesConversion(String),

    /// Attempted to change a property derived from other state.
    #[error("{0}")]
    ReadOnly(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Topology(#[from] topograph::TopoError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    #[inline] pub(crate) fn value(msg: impl Into<String>) -> Self { Error::Value(msg.into()) }

    /// Feature-gated capability that is not compiled in.
    #[allow(dead_code)]
    pub(crate) fn missing_feature(operation: &str, feature: &str) -> Self {
        Error::Dependency(format!("{operation} requires the `{feature}` feature of highmaps"))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
