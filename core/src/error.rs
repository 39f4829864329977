//! Precondition errors shared by the text algorithms.
//!
//! These describe caller mistakes (inputs the algorithms do not define a
//! result for), not ordinary "no answer" outcomes. They are returned instead
//! of truncating input or substituting a made-up value.

use thiserror::Error;

/// Errors raised when an input violates a documented precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// The two strings passed to the distance engine are too long together
    /// for its 16-bit cost table.
    #[error("combined input length {len} bytes exceeds the distance limit of {limit} bytes")]
    InputTooLong {
        /// Combined byte length of both inputs.
        len: usize,
        /// Exclusive upper bound on `len`.
        limit: usize,
    },

    /// Paragraph text contains a control character other than `\n`.
    #[error("unexpected control character {code_point:#04x} at byte offset {offset}")]
    ControlCharacter {
        /// The offending code point.
        code_point: u32,
        /// Byte offset of the character in the input.
        offset: usize,
    },
}

impl From<TextError> for std::io::Error {
    fn from(err: TextError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}

/// Convenience alias for results with [`TextError`].
pub type Result<T> = std::result::Result<T, TextError>;
