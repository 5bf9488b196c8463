use thiserror::Error;

use crate::status::StatusCode;

/// The errors surfaced by a load.
///
/// Local recoverable issues never appear here: a duplicate in-flight load
/// is reported through [`crate::LoadOutcome::Skipped`], and a parameter
/// that fails encoding is dropped from the request rather than failing it.
#[derive(Debug, Error)]
pub enum Error {
    /// The descriptor could not be assembled into a valid request.
    #[error("Invalid request URL")]
    InvalidRequest,
    /// The underlying transport failed.
    #[error("Transport failure")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A response arrived without a usable status.
    #[error("Unusable response")]
    UnexpectedResponse,
    /// The response status was not in the accepted set.
    #[error("Unacceptable response status {0}")]
    Status(StatusCode),
    /// The response body could not be decoded to the expected type.
    #[error("Response decoding failed")]
    Decode(#[from] serde_json::Error),
    /// The in-flight load was canceled.
    #[error("Load canceled")]
    Canceled,
}

/// A `Result` alias where the `Err` case is [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps a transport's native error.
    pub fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(source))
    }
}
