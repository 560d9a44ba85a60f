//! [`LogEqualityProof`] and related logic.

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

/// Zero-knowledge proof of equality of two discrete logarithms in different bases,
/// aka Chaum–Pedersen protocol.
///
/// # Construction
///
/// This proof is a result of the [Fiat–Shamir transform][fst] applied to a standard
/// ZKP of equality of the two discrete logs in different bases.
///
/// - Public parameters of the proof are the two bases `G` and `K` in a prime-order group
///   in which discrete log problem is believed to be hard.
/// - Prover and verifier both know group elements `P` and `Q`, which presumably have
///   the same discrete log in bases `G` and `K` respectively.
/// - Prover additionally knows the discrete log in question: `x = dlog_G(P) = dlog_K(Q)`.
///
/// The interactive proof is specified as a sigma protocol as follows:
///
/// 1. **Commitment:** The prover generates random scalar `r`. The prover sends to the verifier
///   `[r]G` and `[r]K`.
/// 2. **Challenge:** The verifier sends to the prover random scalar `c`.
/// 3. **Response:** The prover computes scalar `z = r - cx` and sends it to the verifier.
///
/// Verification equations are:
///
/// ```text
/// [r]G ?= [z]G + [c]P;
/// [r]K ?= [z]K + [c]Q.
/// ```
///
/// In the non-interactive version of the proof, challenge `c` is derived from the [`Transcript`]
/// the proof is created with. The caller may append arbitrary context to the transcript
/// beforehand, which ties the proof to this context.
///
/// We represent the proof as `(c, z)`; during verification, we restore the commitments
/// from the verification equations above and recompute the challenge.
///
/// # Implementation details
///
/// - The proof is serialized as 2 scalars: `(c, z)`.
/// - Proof generation is constant-time. Verification is **not** constant-time.
///
/// # Examples
///
/// ```
/// # use dhpvss::{group::Ristretto, Keypair, LogEqualityProof};
/// # use merlin::Transcript;
/// # use rand::thread_rng;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut rng = thread_rng();
/// let (log_base, _) = Keypair::<Ristretto>::generate(&mut rng).into_tuple();
/// let (power_g, discrete_log) = Keypair::<Ristretto>::generate(&mut rng).into_tuple();
/// let power_k = log_base.as_element() * discrete_log.expose_scalar();
///
/// let proof = LogEqualityProof::new(
///     &log_base,
///     &discrete_log,
///     (power_g.as_element(), power_k),
///     &mut Transcript::new(b"custom_proof"),
///     &mut rng,
/// );
/// proof.verify(
///     &log_base,
///     (power_g.as_element(), power_k),
///     &mut Transcript::new(b"custom_proof"),
/// )?;
/// # Ok(())
/// # }
/// ```
///
/// [fst]: https://en.wikipedia.org/wiki/Fiat%E2%80%93Shamir_heuristic
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct LogEqualityProof<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "ScalarHelper::<G>"))]
    challenge: G::Scalar,
    #[cfg_attr(feature = "serde", serde(with = "ScalarHelper::<G>"))]
    response: G::Scalar,
}

impl<G: Group> LogEqualityProof<G> {
    pub(crate) fn from_parts(challenge: G::Scalar, response: G::Scalar) -> Self {
        Self {
            challenge,
            response,
        }
    }

    /// Creates a new proof.
    ///
    /// # Parameters
    ///
    /// - `log_base` is the second discrete log base (`K` in the notation above). The first
    ///   log base is always the [`Group`] generator.
    /// - `secret` is the discrete log (`x` in the notation above).
    /// - `powers` are `[x]G` and `[x]K`, respectively. It is **not** checked whether `x`
    ///   is a discrete log of these powers; if this is not the case, the constructed proof
    ///   will not [`verify`](Self::verify()).
    pub fn new<R: CryptoRng + RngCore>(
        log_base: &PublicKey<G>,
        secret: &SecretKey<G>,
        powers: (G::Element, G::Element),
        transcript: &mut Transcript,
        rng: &mut R,
    ) -> Self {
        transcript.start_proof(b"log_eq");
        transcript.append_element_bytes(b"K", log_base.as_bytes());
        transcript.append_element::<G>(b"P", &powers.0);
        transcript.append_element::<G>(b"Q", &powers.1);

        let nonce = SecretKey::<G>::generate(rng);
        transcript.append_element::<G>(b"[r]G", &G::mul_generator(nonce.expose_scalar()));
        transcript.append_element::<G>(b"[r]K", &(log_base.as_element() * nonce.expose_scalar()));
        let challenge = transcript.challenge_scalar::<G>(b"c");
        let response = *nonce.expose_scalar() - challenge * *secret.expose_scalar();

        Self {
            challenge,
            response,
        }
    }

    /// Returns the challenge scalar `c`.
    pub fn challenge(&self) -> G::Scalar {
        self.challenge
    }

    /// Returns the response scalar `z`.
    pub fn response(&self) -> G::Scalar {
        self.response
    }

    /// Verifies this proof.
    ///
    /// # Parameters
    ///
    /// - `log_base` is the second discrete log base (`K` in the notation above). The first
    ///   log base is always the [`Group`] generator.
    /// - `powers` are group elements presumably equal to `[x]G` and `[x]K` respectively,
    ///   where `x` is a secret scalar.
    ///
    /// # Errors
    ///
    /// Returns an error if this proof does not verify.
    pub fn verify(
        &self,
        log_base: &PublicKey<G>,
        powers: (G::Element, G::Element),
        transcript: &mut Transcript,
    ) -> Result<(), VerificationError> {
        let commitments = (
            G::vartime_double_mul_generator(&self.challenge, powers.0, &self.response),
            G::vartime_multi_mul(
                &[self.response, self.challenge],
                [log_base.as_element(), powers.1],
            ),
        );

        transcript.start_proof(b"log_eq");
        transcript.append_element_bytes(b"K", log_base.as_bytes());
        transcript.append_element::<G>(b"P", &powers.0);
        transcript.append_element::<G>(b"Q", &powers.1);
        transcript.append_element::<G>(b"[r]G", &commitments.0);
        transcript.append_element::<G>(b"[r]K", &commitments.1);
        let expected_challenge = transcript.challenge_scalar::<G>(b"c");

        if expected_challenge == self.challenge {
            Ok(())
        } else {
            Err(VerificationError::ChallengeMismatch)
        }
    }

    /// Serializes this proof into bytes. As described [above](#implementation-details),
    /// the proof is serialized as 2 scalars: `(c, z)`, i.e., challenge and response.
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
