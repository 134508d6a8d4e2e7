/// Core error type for the event layer.
///
/// Client implementations map their transport/RPC failures into `NotFound` (the
/// reference cannot be resolved) or `Network` (anything else) so the lazy
/// resolution code can tell which failures have a fallback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("misconfigured event family: {0}")]
    MisconfiguredEventFamily(String),

    #[error("event is not attached to a client")]
    NoClient,

    #[error("invalid peer id: {0}")]
    InvalidPeerId(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
