//! Error type shared by the Lagrange engine and the secret sharing protocol.

use core::fmt;

/// Errors that can occur in the secret sharing protocol.
///
/// Failing to verify a proof is **not** an error: [`verify()`](crate::pvss::verify()) and
/// [`verify_decryption()`](crate::pvss::verify_decryption()) return `Ok(false)` in this case.
/// The variants here correspond to malformed inputs or an unavailable randomness source.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Threshold, number of parties or the security parameter are out of the supported range.
    InvalidParameters(&'static str),
    /// Evaluation points are not pairwise distinct.
    DegenerateInput,
    /// A collection has a different size than expected.
    LengthMismatch {
        /// Human-readable collection name, such as "ciphertexts".
        collection: &'static str,
        /// Expected size of the collection.
        expected: usize,
        /// Actual size of the collection.
        actual: usize,
    },
    /// Too few partial decryptions were selected for reconstruction.
    InsufficientShares {
        /// Minimum number of shares (i.e., the threshold).
        required: usize,
        /// Number of provided shares.
        provided: usize,
    },
    /// Party index is out of bounds.
    InvalidIndex {
        /// Offending index.
        index: usize,
        /// Total number of parties; valid indexes are `0..parties`.
        parties: usize,
    },
    /// Secure randomness source has failed.
    RandomnessFailure,
}

impl Error {
    pub(crate) fn check_lengths(
        collection: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                collection,
                expected,
                actual,
            })
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters(reason) => write!(formatter, "invalid parameters: {reason}"),
            Self::DegenerateInput => {
                formatter.write_str("evaluation points are not pairwise distinct")
            }
            Self::LengthMismatch {
                collection,
                expected,
                actual,
            } => write!(
                formatter,
                "number of {collection} ({actual}) differs from expected ({expected})"
            ),
            Self::InsufficientShares { required, provided } => write!(
                formatter,
                "insufficient shares for reconstruction: required {required}, provided {provided}"
            ),
            Self::InvalidIndex { index, parties } => write!(
                formatter,
                "party index {index} out of bounds, expected a value in 0..{parties}"
            ),
            Self::RandomnessFailure => formatter.write_str("secure randomness source has failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
