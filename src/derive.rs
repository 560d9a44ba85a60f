//! Deterministic derivation of scalars from a byte seed.

use merlin::Transcript;

use crate::{alloc::Vec, group::Group, proofs::TranscriptForGroup};

/// Expands `seed` into `count` pseudorandom scalars.
///
/// The output is a pure function of `seed` and `count`: the seed and count are absorbed
/// into a [`Transcript`] with a dedicated domain separator, and each scalar is squeezed
/// after absorbing its index. Hence, the outputs for the same seed but different `count`s
/// are not prefixes of each other.
///
/// # Examples
///
/// ```
/// # use dhpvss::{derive_scalars, group::Ristretto};
/// let scalars = derive_scalars::<Ristretto>(b"seed", 5);
/// assert_eq!(scalars.len(), 5);
/// assert_eq!(scalars, derive_scalars::<Ristretto>(b"seed", 5));
/// assert_ne!(scalars, derive_scalars::<Ristretto>(b"other seed", 5));
/// ```
pub fn derive_scalars<G: Group>(seed: &[u8], count: usize) -> Vec<G::Scalar> {
    let mut transcript = Transcript::new(b"dhpvss_derive_scalars");
    transcript.append_message(b"seed", seed);
    transcript.append_u64(b"count", count as u64);

    (0..count)
        .map(|index| {
            transcript.append_u64(b"k", index as u64);
            transcript.challenge_scalar::<G>(b"scalar")
        })
        .collect()
}
