//! Diffie–Hellman-based [publicly verifiable secret sharing][pvss] (DHPVSS).
//!
//! A *dealer* splits a secret group element `S = [s]G` among `n` *parties* so that any `t`
//! of them, cooperating with a single designated *recipient*, can reconstruct `S`. Unlike
//! plain verifiable secret sharing, every step of the protocol is verifiable by anyone
//! (not only by the protocol participants) with the help of zero-knowledge proofs.
//!
//! # Construction
//!
//! **Inputs:**
//!
//! - Total number of parties `n` and the reconstruction threshold `t`, `1 < t <= n`
//! - Prime-order group with discrete log assumption with generator `G`
//! - Keys: dealer `(a, A = [a]G)`, recipient `(b, B = [b]G)`, parties `(sk_i, E_i = [sk_i]G)`
//!
//! Party `i` (0-based) is assigned the evaluation point `α_i = i + 1`. Additionally, everyone
//! computes `v_i`, the Lagrange coefficients for interpolation at zero over all `n` points;
//! see [`DhpvssParams`].
//!
//! The protocol proceeds as follows:
//!
//! 1. **Sharing.** The dealer picks a random polynomial `f` of degree `t - 1` with `f(0) = s`
//!    and publishes *encrypted shares* `C_i = [f(α_i)]G + [a](E_i + B)`. The dealer proves
//!    that the shares are well-formed with a single [`SharingProof`]; see [`share()`].
//! 2. **Verification.** Anyone can [`verify()`] the sharing proof against the public keys
//!    of the dealer, the recipient and the parties.
//! 3. **Partial decryption.** Each party strips its mask from its share:
//!    `Cp_i = C_i - [sk_i]A = [f(α_i)]G + [a]B`, and proves the correctness of this operation.
//!    See [`partial_decrypt()`] and its batch version [`pre_reconstruct()`].
//! 4. **Decryption verification.** Anyone can check partial decryptions via
//!    [`verify_decryption()`]; [`invalid_decryptions()`] pinpoints the faulty parties.
//! 5. **Reconstruction.** The recipient takes any `t` verified partial decryptions,
//!    interpolates them at zero and removes the recipient mask:
//!    `S = Σ λ_k Cp_k - [b]A`. See [`reconstruct()`].
//!
//! ## Sharing proof
//!
//! The well-formedness of shares is checked using the dual code of the Reed–Solomon code
//! defined by the evaluation points (the approach introduced in [SCRAPE]). For a polynomial
//! `m*` of degree at most `n - t - 1`, the weights `w_i = v_i α_i m*(α_i)` satisfy
//! `Σ w_i g(α_i) = 0` for any polynomial `g` of degree less than `t`; in particular,
//! `Σ w_i = 0`. Hence, for honestly formed shares,
//!
//! ```text
//! U = Σ [w_i]C_i = [a] Σ [w_i]E_i = [a]V,
//! ```
//!
//! and the dealer proves knowledge of `a` such that `A = [a]G` and `U = [a]V` with
//! a [`BatchLogEqualityProof`](crate::BatchLogEqualityProof). Coefficients of `m*` are derived
//! via [`derive_scalars()`](crate::derive_scalars()) from a challenge squeezed out
//! of a transcript absorbing all public inputs, so the dealer cannot adapt shares to `m*`.
//!
//! If `t == n`, `m*` is the zero polynomial and the degree check is vacuous; any `n` shares
//! are consistent with some polynomial of degree `n - 1`.
//!
//! [pvss]: https://en.wikipedia.org/wiki/Publicly_Verifiable_Secret_Sharing
//! [SCRAPE]: https://eprint.iacr.org/2017/216
//!
//! # Examples
//!
//! Sharing a secret among 5 parties with threshold 3.
//!
//! ```
//! # use dhpvss::{group::Ristretto, pvss, Keypair};
//! # use rand::thread_rng;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = thread_rng();
//! let (params, secret) = pvss::setup::<Ristretto, _>(5, 3, 128, &mut rng)?;
//! let dealer = Keypair::<Ristretto>::generate(&mut rng);
//! let recipient = Keypair::<Ristretto>::generate(&mut rng);
//! let parties: Vec<_> = (0..5).map(|_| Keypair::<Ristretto>::generate(&mut rng)).collect();
//! let party_keys: Vec<_> = parties.iter().map(|party| party.public().clone()).collect();
//!
//! // The dealer shares the secret...
//! let (ciphertexts, proof) =
//!     pvss::share(&params, recipient.public(), &dealer, &party_keys, &secret, &mut rng)?;
//! // ...and anyone can check that the shares are well-formed.
//! assert!(pvss::verify(
//!     &params,
//!     dealer.public(),
//!     recipient.public(),
//!     &ciphertexts,
//!     &party_keys,
//!     &proof,
//! )?);
//!
//! // Parties partially decrypt their shares.
//! let secret_keys: Vec<_> = parties.iter().map(|party| party.secret().clone()).collect();
//! let (partial_decryptions, dec_proof) = pvss::pre_reconstruct(
//!     &params,
//!     dealer.public(),
//!     &party_keys,
//!     &secret_keys,
//!     &ciphertexts,
//!     &mut rng,
//! )?;
//! assert!(pvss::verify_decryption(
//!     &params,
//!     dealer.public(),
//!     &party_keys,
//!     &ciphertexts,
//!     &partial_decryptions,
//!     &dec_proof,
//! )?);
//!
//! // The recipient reconstructs the secret from any 3 partial decryptions.
//! let restored = pvss::reconstruct(
//!     &params,
//!     &partial_decryptions,
//!     dealer.public(),
//!     recipient.secret(),
//!     &[0, 2, 4],
//! )?;
//! assert_eq!(restored, secret.to_element());
//! # Ok(())
//! # }
//! ```

use merlin::Transcript;
use rand_chacha::ChaChaRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use core::fmt;

use crate::{
    alloc::Vec,
    group::Group,
    lagrange::{evaluation_points, lagrange_coefficients},
    BatchLogEqualityProof, Error, VectorLogEqualityProof,
};

mod decryption;
mod reconstruction;
mod sharing;

pub use self::{
    decryption::{invalid_decryptions, partial_decrypt, pre_reconstruct, verify_decryption},
    reconstruction::reconstruct,
    sharing::{share, share_with_seed, verify},
};

/// Proof of well-formedness of encrypted shares produced by [`share()`].
pub type SharingProof<G> = BatchLogEqualityProof<G>;

/// Proof of correctness of partial decryptions produced by [`pre_reconstruct()`].
pub type DecryptionProof<G> = VectorLogEqualityProof<G>;

/// Parameters of the secret sharing scheme: the number of parties and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawParams"))]
pub struct Params {
    parties: usize,
    threshold: usize,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawParams {
    parties: usize,
    threshold: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawParams> for Params {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Self::new(raw.parties, raw.threshold)
    }
}

impl Params {
    /// Creates new parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] if `threshold` is not in `2..=parties`.
    pub fn new(parties: usize, threshold: usize) -> Result<Self, Error> {
        if threshold <= 1 {
            Err(Error::InvalidParameters("threshold must be greater than 1"))
        } else if threshold > parties {
            Err(Error::InvalidParameters(
                "threshold must not exceed the number of parties",
            ))
        } else {
            Ok(Self { parties, threshold })
        }
    }

    /// Returns the total number of parties.
    pub fn parties(self) -> usize {
        self.parties
    }

    /// Returns the number of parties necessary to reconstruct the secret.
    pub fn threshold(self) -> usize {
        self.threshold
    }
}

/// Public parameters of the protocol shared by all its principals.
///
/// Besides [`Params`], contains the evaluation points `α_i = i + 1` and the Lagrange
/// coefficients `v_i` for interpolation at zero over all evaluation points. The latter
/// are fully determined by `Params`, so they are recomputed on deserialization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Params", into = "Params", bound = "")
)]
pub struct DhpvssParams<G: Group> {
    params: Params,
    points: Vec<G::Scalar>,
    coefficients: Vec<G::Scalar>,
}

impl<G: Group> DhpvssParams<G> {
    /// Computes public parameters based on the provided `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if Lagrange coefficients cannot be computed. This may only happen
    /// if the number of parties is not less than the group order.
    pub fn new(params: Params) -> Result<Self, Error> {
        let points = evaluation_points::<G>(0..params.parties);
        let coefficients = lagrange_coefficients::<G>(&points)?;
        Ok(Self {
            params,
            points,
            coefficients,
        })
    }

    /// Returns the number of parties and the threshold.
    pub fn params(&self) -> Params {
        self.params
    }

    /// Returns the total number of parties.
    pub fn parties(&self) -> usize {
        self.params.parties
    }

    /// Returns the number of parties necessary to reconstruct the secret.
    pub fn threshold(&self) -> usize {
        self.params.threshold
    }

    /// Returns evaluation points assigned to the parties.
    pub fn evaluation_points(&self) -> &[G::Scalar] {
        &self.points
    }

    /// Returns Lagrange coefficients for interpolation at zero over all evaluation points.
    pub fn coefficients(&self) -> &[G::Scalar] {
        &self.coefficients
    }

    fn commit(&self, transcript: &mut Transcript) {
        transcript.append_u64(b"n", self.params.parties as u64);
        transcript.append_u64(b"t", self.params.threshold as u64);
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.params.parties {
            Ok(())
        } else {
            Err(Error::InvalidIndex {
                index,
                parties: self.params.parties,
            })
        }
    }
}

impl<G: Group> TryFrom<Params> for DhpvssParams<G> {
    type Error = Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl<G: Group> From<DhpvssParams<G>> for Params {
    fn from(params: DhpvssParams<G>) -> Self {
        params.params
    }
}

/// Secret shared by the dealer. The reconstructed value is the group element
/// [`Self::to_element()`]; the scalar is zeroized on drop.
pub struct Secret<G: Group>(Zeroizing<G::Scalar>);

impl<G: Group> fmt::Debug for Secret<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Secret").finish_non_exhaustive()
    }
}

impl<G: Group> Clone for Secret<G> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<G: Group> Secret<G> {
    /// Wraps the provided scalar.
    pub fn from_scalar(scalar: G::Scalar) -> Self {
        Self(Zeroizing::new(scalar))
    }

    /// Exposes the secret scalar `s`.
    pub fn expose_scalar(&self) -> &G::Scalar {
        &self.0
    }

    /// Returns the group element `[s]G` that parties and the recipient reconstruct.
    pub fn to_element(&self) -> G::Element {
        G::mul_generator(&self.0)
    }
}

/// Sets up the protocol for `parties` parties and the given `threshold`, and samples a secret
/// to share.
///
/// `security_bits` is the required security level; it must be positive and must not exceed
/// the bit size of the group scalars.
///
/// # Errors
///
/// - Returns [`Error::InvalidParameters`] if `threshold` is not in `2..=parties`, or if
///   `security_bits` is out of range.
/// - Returns [`Error::RandomnessFailure`] if `rng` fails.
#[instrument(level = "debug", skip(rng))]
pub fn setup<G: Group, R: CryptoRng + RngCore>(
    parties: usize,
    threshold: usize,
    security_bits: usize,
    rng: &mut R,
) -> Result<(DhpvssParams<G>, Secret<G>), Error> {
    if security_bits == 0 {
        return Err(Error::InvalidParameters("security level must be positive"));
    }
    if security_bits > 8 * G::SCALAR_SIZE {
        return Err(Error::InvalidParameters(
            "security level exceeds the bit size of group scalars",
        ));
    }

    let params = DhpvssParams::new(Params::new(parties, threshold)?)?;
    let secret = Secret::from_scalar(try_generate_scalar::<G, _>(rng)?);
    Ok((params, secret))
}

/// Fills `dest` from `rng`, surfacing RNG failures as [`Error::RandomnessFailure`].
fn try_fill_bytes<R: RngCore>(rng: &mut R, dest: &mut [u8]) -> Result<(), Error> {
    rng.try_fill_bytes(dest).map_err(|err| {
        debug!(%err, "randomness source failed");
        Error::RandomnessFailure
    })
}

fn try_generate_scalar<G: Group, R: CryptoRng + RngCore>(rng: &mut R) -> Result<G::Scalar, Error> {
    let mut seed = Zeroizing::new(<ChaChaRng as SeedableRng>::Seed::default());
    try_fill_bytes(rng, &mut seed[..])?;
    let mut seeded_rng = ChaChaRng::from_seed(*seed);
    Ok(G::generate_scalar(&mut seeded_rng))
}
