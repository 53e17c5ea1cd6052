use thiserror::Error;

/// Errors raised by problem construction and evaluation.
///
/// These are structural errors. None of them are retried; numerical trouble
/// such as NaN propagation is reported through the evaluated values instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation is not provided by this problem.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Malformed input or a dimension mismatch.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The problem holds state that cannot be duplicated.
    #[error("{0} cannot be cloned")]
    NotCloneable(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] from anything printable.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
