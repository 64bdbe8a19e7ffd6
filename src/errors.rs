use std::io;
use thiserror::Error;

/// Failures surfaced while compressing or decompressing a stream.
///
/// The codec never recovers locally: the first error aborts the operation
/// and is returned to the caller with the underlying cause preserved.
#[derive(Debug, Error)]
pub enum LzpiError {
    /// The input ended between a control byte and its first token.
    ///
    /// The encoder never emits an empty group, so a trailing control byte
    /// means the stream was cut short.
    #[error("truncated stream: control byte with no tokens")]
    TruncatedGroup,
    /// The input ended between the two bytes of a back-reference.
    #[error("truncated stream: end of input inside a back-reference")]
    TruncatedMatch,
    #[error(transparent)]
    Io(#[from] io::Error),
}
