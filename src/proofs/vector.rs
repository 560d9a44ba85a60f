//! [`VectorLogEqualityProof`] and related logic.

use merlin::Transcript;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::serde::ScalarVec;
use crate::{
    alloc::{vec, Vec},
    group::Group,
    proofs::{LogEqualityProof, VerificationError},
    PublicKey,
};

/// Collection of independent [`LogEqualityProof`]s sharing the second log base.
///
/// Each proof `j` states that `dlog_G(P_j) = dlog_K(Q_j)` with its own witness and is produced
/// with its own [`Transcript`]. Challenges and responses are stored in two index-aligned
/// vectors; their lengths are always equal.
///
/// Unlike [`BatchLogEqualityProof`](crate::BatchLogEqualityProof), failure of a single proof
/// can be attributed to the specific statement via [`Self::invalid_indexes()`].
///
/// # Implementation details
///
/// The proof is serialized as `2 * len` scalars: all challenges followed by all responses.
///
/// # Examples
///
/// ```
/// # use dhpvss::{group::Ristretto, Keypair, LogEqualityProof, VectorLogEqualityProof};
/// # use merlin::Transcript;
/// # use rand::thread_rng;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut rng = thread_rng();
/// let log_base = Keypair::<Ristretto>::generate(&mut rng).into_tuple().0;
/// let transcript_for = |i: usize| {
///     let mut transcript = Transcript::new(b"custom_proof");
///     transcript.append_u64(b"i", i as u64);
///     transcript
/// };
///
/// let mut powers = vec![];
/// let mut proofs = vec![];
/// for i in 0..3 {
///     let (power_g, secret) = Keypair::<Ristretto>::generate(&mut rng).into_tuple();
///     let power = (power_g.as_element(), log_base.as_element() * secret.expose_scalar());
///     proofs.push(LogEqualityProof::new(
///         &log_base,
///         &secret,
///         power,
///         &mut transcript_for(i),
///         &mut rng,
///     ));
///     powers.push(power);
/// }
///
/// let proof = VectorLogEqualityProof::from_proofs(proofs);
/// assert_eq!(proof.len(), 3);
/// proof.verify(&log_base, &powers, transcript_for)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound = "", try_from = "RawVectorProof<G>")
)]
pub struct VectorLogEqualityProof<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "ScalarVec::<G, 0>"))]
    challenges: Vec<G::Scalar>,
    #[cfg_attr(feature = "serde", serde(with = "ScalarVec::<G, 0>"))]
    responses: Vec<G::Scalar>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(bound = "")]
struct RawVectorProof<G: Group> {
    #[serde(with = "ScalarVec::<G, 0>")]
    challenges: Vec<G::Scalar>,
    #[serde(with = "ScalarVec::<G, 0>")]
    responses: Vec<G::Scalar>,
}

#[cfg(feature = "serde")]
impl<G: Group> TryFrom<RawVectorProof<G>> for VectorLogEqualityProof<G> {
    type Error = VerificationError;

    fn try_from(raw: RawVectorProof<G>) -> Result<Self, Self::Error> {
        VerificationError::check_lengths("responses", raw.challenges.len(), raw.responses.len())?;
        Ok(Self {
            challenges: raw.challenges,
            responses: raw.responses,
        })
    }
}

impl<G: Group> VectorLogEqualityProof<G> {
    /// Combines individual proofs into a vector proof.
    pub fn from_proofs(proofs: impl IntoIterator<Item = LogEqualityProof<G>>) -> Self {
        let (challenges, responses) = proofs
            .into_iter()
            .map(|proof| (proof.challenge(), proof.response()))
            .unzip();
        Self {
            challenges,
            responses,
        }
    }

    /// Returns the number of proofs in this collection.
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Checks whether this collection is empty.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Returns the proof at the specified `index`, or `None` if the index is out of bounds.
    pub fn get(&self, index: usize) -> Option<LogEqualityProof<G>> {
        let challenge = *self.challenges.get(index)?;
        let response = *self.responses.get(index)?;
        Some(LogEqualityProof::from_parts(challenge, response))
    }

    /// Iterates over proofs in this collection.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = LogEqualityProof<G>> + '_ {
        self.challenges
            .iter()
            .zip(&self.responses)
            .map(|(&challenge, &response)| LogEqualityProof::from_parts(challenge, response))
    }

    /// Verifies all proofs in this collection.
    ///
    /// `powers` are the `(P_j, Q_j)` pairs, and `transcript_for` creates the transcript
    /// for the proof with the specified index. Verification stops on the first failing proof.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of `powers` differs from the number of proofs,
    /// or if any of the proofs does not verify.
    pub fn verify(
        &self,
        log_base: &PublicKey<G>,
        powers: &[(G::Element, G::Element)],
        mut transcript_for: impl FnMut(usize) -> Transcript,
    ) -> Result<(), VerificationError> {
        VerificationError::check_lengths("statements", self.len(), powers.len())?;
        for (i, (proof, &power)) in self.iter().zip(powers).enumerate() {
            proof.verify(log_base, power, &mut transcript_for(i))?;
        }
        Ok(())
    }

    /// Returns indexes of all proofs in this collection that do not verify. Parameters have
    /// the same meaning as for [`Self::verify()`].
    ///
    /// # Errors
    ///
    /// Returns an error if the number of `powers` differs from the number of proofs.
    pub fn invalid_indexes(
        &self,
        log_base: &PublicKey<G>,
        powers: &[(G::Element, G::Element)],
        mut transcript_for: impl FnMut(usize) -> Transcript,
    ) -> Result<Vec<usize>, VerificationError> {
        VerificationError::check_lengths("statements", self.len(), powers.len())?;
        Ok(self
            .iter()
            .zip(powers)
            .enumerate()
            .filter_map(|(i, (proof, &power))| {
                proof
                    .verify(log_base, power, &mut transcript_for(i))
                    .is_err()
                    .then_some(i)
            })
            .collect())
    }

    /// Serializes this proof into bytes: all challenges followed by all responses.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.len();
        let mut bytes = vec![0_u8; 2 * len * G::SCALAR_SIZE];
        let (challenge_bytes, response_bytes) = bytes.split_at_mut(len * G::SCALAR_SIZE);
        let scalars = self.challenges.iter().zip(&self.responses);
        let chunks = challenge_bytes
            .chunks_exact_mut(G::SCALAR_SIZE)
            .zip(response_bytes.chunks_exact_mut(G::SCALAR_SIZE));
        for ((challenge, response), (challenge_chunk, response_chunk)) in scalars.zip(chunks) {
            G::serialize_scalar(challenge, challenge_chunk);
            G::serialize_scalar(response, response_chunk);
        }
        bytes
    }

    /// Attempts to parse the proof from `bytes`. Returns `None` if `bytes` do not represent
    /// a well-formed proof.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() % (2 * G::SCALAR_SIZE) != 0 {
            return None;
        }
        let len = bytes.len() / (2 * G::SCALAR_SIZE);
        let (challenge_bytes, response_bytes) = bytes.split_at(len * G::SCALAR_SIZE);

        let challenges: Option<Vec<_>> = challenge_bytes
            .chunks_exact(G::SCALAR_SIZE)
            .map(G::deserialize_scalar)
            .collect();
        let responses: Option<Vec<_>> = response_bytes
            .chunks_exact(G::SCALAR_SIZE)
            .map(G::deserialize_scalar)
            .collect();
        Some(Self {
            challenges: challenges?,
            responses: responses?,
        })
    }
}
