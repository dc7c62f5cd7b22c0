//! Error type for tile tree construction.

use thiserror::Error;

/// Errors raised while validating input or building a tile tree.
///
/// All of these are deterministic functions of the input; nothing here is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TilingError {
    /// A parameter or input value is malformed (non-positive capacity or
    /// tile size, inverted or non-finite bounds, non-finite weight).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two input records share the same identifier.
    #[error("duplicate feature id: {0}")]
    DuplicateId(String),

    /// The build was cancelled through its [`CancelFlag`](crate::CancelFlag).
    #[error("tile tree build cancelled")]
    Cancelled,
}

impl TilingError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
