use std::collections::TryReserveError;

use thiserror::Error;

/// Alias for the result type of front coding operations.
pub type FrencResult<T> = Result<T, FrencError>;

/// Errors that can occur when encoding or decoding a string list.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FrencError {
    /// A string list must contain at least one string
    #[error("Cannot encode an empty string list")]
    EmptyInput,

    /// A string is too long for the prefix arithmetic (limit is `i32::MAX` bytes)
    #[error("String #{index} is {len} bytes long, the limit is {} bytes", i32::MAX)]
    StringTooLong { index: usize, len: usize },

    /// A string contains the `0` byte used as the entry terminator
    #[error("String #{index} contains an embedded NUL byte")]
    EmbeddedTerminator { index: usize },

    /// A size hint is beyond the range of the 12-bit packing
    #[error("Size {0} cannot be represented as a packed size hint")]
    HintOutOfRange(u64),

    /// The encoded data is malformed
    #[error("Malformed data at offset {offset}: {reason}")]
    MalformedData { offset: usize, reason: Malformed },

    /// Output buffer too small
    #[error("Output buffer too small: {needed} bytes needed, {available} available")]
    OutputBufferTooSmall { needed: usize, available: usize },

    /// Memory for the output could not be reserved
    #[error("Allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// I/O error in the streaming API
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The specific defect found in a malformed blob.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    #[error("input is empty")]
    Empty,
    #[error("input does not end with a NUL terminator")]
    MissingTerminator,
    #[error("delta code is cut short")]
    TruncatedDelta,
    #[error("delta code is not followed by a suffix")]
    TrailingMarker,
    #[error("suffix is not terminated")]
    TruncatedSuffix,
    #[error("prefix length shrinks below zero")]
    PrefixUnderflow,
    #[error("prefix length exceeds the maximum string length")]
    PrefixOverflow,
    #[error("prefix length exceeds the previous string")]
    PrefixExceedsPrevious,
    #[error("size hint header is cut short")]
    TruncatedHeader,
}

/// Coarse classification of a [`FrencError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A magnitude cannot be represented (encode side)
    Range,
    /// The encoded bytes are malformed (decode side)
    Data,
    /// Resource exhaustion
    Alloc,
    /// The caller broke the input contract
    Input,
    /// The underlying reader or writer failed
    Io,
}

impl FrencError {
    pub(crate) fn malformed(offset: usize, reason: Malformed) -> Self {
        log::debug!("rejecting malformed input at offset {offset}: {reason}");
        FrencError::MalformedData { offset, reason }
    }

    /// Returns the broad category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrencError::StringTooLong { .. } | FrencError::HintOutOfRange(_) => ErrorKind::Range,
            FrencError::MalformedData { .. } => ErrorKind::Data,
            FrencError::Alloc(_) => ErrorKind::Alloc,
            FrencError::EmptyInput
            | FrencError::EmbeddedTerminator { .. }
            | FrencError::OutputBufferTooSmall { .. } => ErrorKind::Input,
            FrencError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the malformation reason if this is a data error.
    pub fn malformed_reason(&self) -> Option<Malformed> {
        match self {
            FrencError::MalformedData { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        let err = FrencError::StringTooLong {
            index: 3,
            len: 1 << 31,
        };
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(
            FrencError::malformed(7, Malformed::TruncatedDelta).kind(),
            ErrorKind::Data
        );
        assert_eq!(FrencError::EmptyInput.kind(), ErrorKind::Input);
    }

    #[test]
    fn display_mentions_offset_and_reason() {
        let err = FrencError::malformed(12, Malformed::PrefixUnderflow);
        assert_eq!(
            err.to_string(),
            "Malformed data at offset 12: prefix length shrinks below zero"
        );
        assert_eq!(err.malformed_reason(), Some(Malformed::PrefixUnderflow));
    }
}
