//! [`BatchLogEqualityProof`] and related logic.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::serde::ScalarHelper;
use crate::{
    alloc::{vec, Vec},
    group::Group,
    proofs::{TranscriptForGroup, VerificationError},
    PublicKey, SecretKey,
};

/// Zero-knowledge proof that a single secret scalar is the discrete log of several group
/// elements in their respective bases.
///
/// This is a generalization of [`LogEqualityProof`](crate::LogEqualityProof) to multiple
/// statements sharing the same witness.
///
/// # Construction
///
/// - The prover knows `x` such that `P = [x]G`, and presents statements `(R_j, Q_j)`
///   for which it claims `Q_j = [x]R_j`.
/// - The prover generates random scalar `r` and commits to `[r]G` and `[r]R_j` for all `j`.
/// - The challenge `c` is derived from the transcript, which absorbs `P`, all statements
///   and all commitments.
/// - The prover responds with `z = r - cx`.
///
/// The verifier restores commitments as `[z]G + [c]P` and `[z]R_j + [c]Q_j`, and checks
/// that they lead to the same challenge. Hence, the proof has constant size `(c, z)`
/// regardless of the number of statements.
///
/// # Examples
///
/// ```
/// # use dhpvss::{group::{ElementOps, Ristretto}, BatchLogEqualityProof, Keypair};
/// # use merlin::Transcript;
/// # use rand::thread_rng;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut rng = thread_rng();
/// let (public_key, secret_key) = Keypair::<Ristretto>::generate(&mut rng).into_tuple();
/// let statements: Vec<_> = (0..5)
///     .map(|_| {
///         let base = Keypair::<Ristretto>::generate(&mut rng).public().as_element();
///         (base, base * secret_key.expose_scalar())
///     })
///     .collect();
///
/// let proof = BatchLogEqualityProof::new(
///     &public_key,
///     &secret_key,
///     &statements,
///     &mut Transcript::new(b"custom_proof"),
///     &mut rng,
/// );
/// proof.verify(&public_key, &statements, &mut Transcript::new(b"custom_proof"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct BatchLogEqualityProof<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "ScalarHelper::<G>"))]
    challenge: G::Scalar,
    #[cfg_attr(feature = "serde", serde(with = "ScalarHelper::<G>"))]
    response: G::Scalar,
}

impl<G: Group> BatchLogEqualityProof<G> {
    fn absorb_statements(
        transcript: &mut Transcript,
        public_key: &PublicKey<G>,
        statements: &[(G::Element, G::Element)],
    ) {
        transcript.start_proof(b"batch_log_eq");
        transcript.append_element_bytes(b"P", public_key.as_bytes());
        transcript.append_u64(b"statements", statements.len() as u64);
        for (base, power) in statements {
            transcript.append_element::<G>(b"R", base);
            transcript.append_element::<G>(b"Q", power);
        }
    }

    /// Creates a new proof.
    ///
    /// `statements` are `(R_j, Q_j)` pairs such that `Q_j = [x]R_j`, where `x` is the `secret`
    /// corresponding to `public_key`. This is **not** checked; if a statement is invalid,
    /// the proof will not [`verify`](Self::verify()).
    pub fn new<R: CryptoRng + RngCore>(
        public_key: &PublicKey<G>,
        secret: &SecretKey<G>,
        statements: &[(G::Element, G::Element)],
        transcript: &mut Transcript,
        rng: &mut R,
    ) -> Self {
        Self::absorb_statements(transcript, public_key, statements);

        let nonce = SecretKey::<G>::generate(rng);
        transcript.append_element::<G>(b"[r]G", &G::mul_generator(nonce.expose_scalar()));
        for (base, _) in statements {
            transcript.append_element::<G>(b"[r]R", &(*base * nonce.expose_scalar()));
        }
        let challenge = transcript.challenge_scalar::<G>(b"c");
        let response = *nonce.expose_scalar() - challenge * *secret.expose_scalar();

        Self {
            challenge,
            response,
        }
    }

    /// Verifies this proof against the provided `public_key` and `statements`.
    ///
    /// # Errors
    ///
    /// Returns an error if this proof does not verify.
    pub fn verify(
        &self,
        public_key: &PublicKey<G>,
        statements: &[(G::Element, G::Element)],
        transcript: &mut Transcript,
    ) -> Result<(), VerificationError> {
        Self::absorb_statements(transcript, public_key, statements);

        let commitment = G::vartime_double_mul_generator(
            &self.challenge,
            public_key.as_element(),
            &self.response,
        );
        transcript.append_element::<G>(b"[r]G", &commitment);
        for &(base, power) in statements {
            let commitment =
                G::vartime_multi_mul(&[self.response, self.challenge], [base, power]);
            transcript.append_element::<G>(b"[r]R", &commitment);
        }
        let expected_challenge = transcript.challenge_scalar::<G>(b"c");

        if expected_challenge == self.challenge {
            Ok(())
        } else {
            Err(VerificationError::ChallengeMismatch)
        }
    }

    /// Serializes this proof into bytes: 2 scalars `(c, z)`.
    pub fn to_bytes(self) -> Vec<u8> {
        let mut bytes = vec![0_u8; 2 * G::SCALAR_SIZE];
        G::serialize_scalar(&self.challenge, &mut bytes[..G::SCALAR_SIZE]);
        G::serialize_scalar(&self.response, &mut bytes[G::SCALAR_SIZE..]);
        bytes
    }

    /// Attempts to parse the proof from `bytes`. Returns `None` if `bytes` do not represent
    /// a well-formed proof.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 2 * G::SCALAR_SIZE {
            return None;
        }

        let challenge = G::deserialize_scalar(&bytes[..G::SCALAR_SIZE])?;
        let response = G::deserialize_scalar(&bytes[G::SCALAR_SIZE..])?;
        Some(Self {
            challenge,
            response,
        })
    }
}
