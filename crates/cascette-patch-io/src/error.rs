//! Error types for random-access and stream I/O
//!
//! Every operation in this crate reports failures through [`PatchIoError`].
//! The stream adapters also implement the standard `Read`/`Write` traits, so
//! the error converts into [`std::io::Error`] with a matching
//! [`std::io::ErrorKind`].

use thiserror::Error;

/// Errors raised by random-access objects and stream adapters
#[derive(Error, Debug)]
pub enum PatchIoError {
    /// The medium ran out of bytes before a fixed-width or block read was satisfied
    #[error("End of medium: need {needed} bytes, got {available} bytes")]
    EndOfMedium {
        /// Bytes the read required
        needed: usize,
        /// Bytes obtained before the medium was exhausted
        available: usize,
    },

    /// A range or block bound is negative, overflows, or exceeds its container
    #[error("Illegal range: {reason}")]
    IllegalRange {
        /// Description of the violated bound
        reason: String,
    },

    /// Operation not valid in the current state (no mark set, handle closed)
    #[error("Illegal state: {0}")]
    IllegalState(&'static str),

    /// Text-oriented operation on a strictly binary object
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Propagated system-level failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for patch I/O operations
pub type Result<T> = std::result::Result<T, PatchIoError>;

impl PatchIoError {
    /// Create an illegal range error with a reason
    pub fn illegal_range<S: Into<String>>(reason: S) -> Self {
        Self::IllegalRange {
            reason: reason.into(),
        }
    }

    /// Create an end-of-medium error
    pub fn end_of_medium(needed: usize, available: usize) -> Self {
        Self::EndOfMedium { needed, available }
    }

    /// Error returned by every operation on a closed handle
    pub(crate) const fn closed() -> Self {
        Self::IllegalState("handle is closed")
    }

    /// Check if the medium was exhausted before a read completed
    pub fn is_end_of_medium(&self) -> bool {
        matches!(self, Self::EndOfMedium { .. })
    }

    /// Check if this error stems from misuse by the caller rather than the medium
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::IllegalRange { .. } | Self::IllegalState(_) | Self::UnsupportedOperation(_)
        )
    }
}

impl From<PatchIoError> for std::io::Error {
    fn from(error: PatchIoError) -> Self {
        use std::io::ErrorKind;

        match error {
            PatchIoError::Io(inner) => inner,
            PatchIoError::EndOfMedium { .. } => Self::new(ErrorKind::UnexpectedEof, error),
            PatchIoError::IllegalRange { .. } => Self::new(ErrorKind::InvalidInput, error),
            PatchIoError::IllegalState(_) => Self::other(error),
            PatchIoError::UnsupportedOperation(_) => Self::new(ErrorKind::Unsupported, error),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_creation_helpers() {
        let range = PatchIoError::illegal_range("offset past end");
        assert!(matches!(range, PatchIoError::IllegalRange { .. }));

        let eof = PatchIoError::end_of_medium(8, 3);
        assert!(matches!(
            eof,
            PatchIoError::EndOfMedium {
                needed: 8,
                available: 3
            }
        ));
        assert!(eof.is_end_of_medium());
    }

    #[test]
    fn test_error_categorization() {
        let caller_errors = vec![
            PatchIoError::illegal_range("test"),
            PatchIoError::IllegalState("mark not set"),
            PatchIoError::UnsupportedOperation("read_line"),
            PatchIoError::closed(),
        ];

        for error in &caller_errors {
            assert!(error.is_caller_error(), "Should be caller error: {error:?}");
            assert!(!error.is_end_of_medium());
        }

        let medium_errors = vec![
            PatchIoError::end_of_medium(4, 0),
            PatchIoError::Io(std::io::Error::other("disk full")),
        ];

        for error in &medium_errors {
            assert!(
                !error.is_caller_error(),
                "Should not be caller error: {error:?}"
            );
        }
    }

    #[test]
    fn test_error_display() {
        let message = PatchIoError::end_of_medium(100, 50).to_string();
        assert!(message.contains("100"));
        assert!(message.contains("50"));

        let message = PatchIoError::illegal_range("Read range exceeds file length").to_string();
        assert!(message.contains("Read range exceeds file length"));
    }

    #[test]
    fn test_io_error_kinds() {
        let kind = |e: PatchIoError| std::io::Error::from(e).kind();

        assert_eq!(kind(PatchIoError::end_of_medium(1, 0)), ErrorKind::UnexpectedEof);
        assert_eq!(kind(PatchIoError::illegal_range("x")), ErrorKind::InvalidInput);
        assert_eq!(kind(PatchIoError::closed()), ErrorKind::Other);
        assert_eq!(
            kind(PatchIoError::UnsupportedOperation("read_utf")),
            ErrorKind::Unsupported
        );
        assert_eq!(
            kind(PatchIoError::Io(std::io::Error::from(ErrorKind::PermissionDenied))),
            ErrorKind::PermissionDenied
        );
    }
}
