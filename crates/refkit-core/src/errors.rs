/// Core error type for refkit.
///
/// Adapters (gateway caches, REST fetchers, chat views) should map their
/// specific errors into this type. Resolver misses and paginator timeouts are
/// not errors and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Contract violation detected while building a session, before any event
    /// is consumed.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
