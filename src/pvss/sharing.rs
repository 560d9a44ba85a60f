//! Dealing encrypted shares and verifying them.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, instrument, trace};
use zeroize::Zeroizing;

use super::{try_fill_bytes, DhpvssParams, Secret, SharingProof};
use crate::{
    alloc::Vec, derive_scalars, group::Group, proofs::TranscriptForGroup, Error, Keypair,
    PublicKey,
};

/// Size of the seed for the sharing polynomial drawn by [`share()`].
const SEED_SIZE: usize = 32;

/// Evaluates the polynomial with the given coefficients (starting from the constant term)
/// at `x` using Horner's method.
fn evaluate_polynomial<G: Group>(coefficients: &[G::Scalar], x: G::Scalar) -> G::Scalar {
    coefficients
        .iter()
        .rev()
        .fold(G::Scalar::from(0_u64), |acc, &coefficient| acc * x + coefficient)
}

fn sharing_transcript<G: Group>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    recipient_key: &PublicKey<G>,
    ciphertexts: &[G::Element],
    party_keys: &[PublicKey<G>],
) -> Transcript {
    let mut transcript = Transcript::new(b"dhpvss_sharing");
    params.commit(&mut transcript);
    transcript.append_element_bytes(b"A", dealer_key.as_bytes());
    transcript.append_element_bytes(b"B", recipient_key.as_bytes());
    for (party_key, ciphertext) in party_keys.iter().zip(ciphertexts) {
        transcript.append_element_bytes(b"E", party_key.as_bytes());
        transcript.append_element::<G>(b"C", ciphertext);
    }
    transcript
}

/// Computes the weights `w_i = v_i α_i m*(α_i)` based on the challenge squeezed
/// from the `transcript`, and returns the aggregated statement `(V, U)`.
fn aggregate_statement<G: Group>(
    params: &DhpvssParams<G>,
    ciphertexts: &[G::Element],
    party_keys: &[PublicKey<G>],
    transcript: &mut Transcript,
) -> (G::Element, G::Element) {
    let mut challenge = [0_u8; 32];
    transcript.challenge_bytes(b"m*", &mut challenge);
    let dual_poly = derive_scalars::<G>(&challenge, params.parties() - params.threshold());

    let weights: Vec<_> = params
        .evaluation_points()
        .iter()
        .zip(params.coefficients())
        .map(|(&point, &coefficient)| {
            coefficient * point * evaluate_polynomial::<G>(&dual_poly, point)
        })
        .collect();
    trace!(degree = dual_poly.len(), "computed dual code weights");

    let aggregated_keys = G::vartime_multi_mul(
        &weights,
        party_keys.iter().map(PublicKey::as_element),
    );
    let aggregated_ciphertexts = G::vartime_multi_mul(&weights, ciphertexts.iter().copied());
    (aggregated_keys, aggregated_ciphertexts)
}

/// Deals encrypted shares of the `secret` among parties with the specified public keys.
/// The sharing polynomial is derived from a random seed drawn from `rng`.
///
/// Returns encrypted shares `C_i`, one per party in the order of `party_keys`, together with
/// the proof of their well-formedness.
///
/// # Errors
///
/// - Returns [`Error::LengthMismatch`] if the number of `party_keys` differs from
///   the number of parties in `params`.
/// - Returns [`Error::RandomnessFailure`] if `rng` fails.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn share<G: Group, R: CryptoRng + RngCore>(
    params: &DhpvssParams<G>,
    recipient_key: &PublicKey<G>,
    dealer: &Keypair<G>,
    party_keys: &[PublicKey<G>],
    secret: &Secret<G>,
    rng: &mut R,
) -> Result<(Vec<G::Element>, SharingProof<G>), Error> {
    Error::check_lengths("party keys", params.parties(), party_keys.len())?;
    let mut seed = Zeroizing::new([0_u8; SEED_SIZE]);
    try_fill_bytes(rng, &mut seed[..])?;
    share_with_seed(params, recipient_key, dealer, party_keys, secret, &seed[..], rng)
}

/// Same as [`share()`], but with the non-constant coefficients of the sharing polynomial
/// derived deterministically from the provided `seed` via
/// [`derive_scalars()`](crate::derive_scalars()). `rng` is only used for the proof.
///
/// The `seed` must be kept secret and must not be reused across sharings:
/// shares for the same seed leak the difference of the shared secrets.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the number of `party_keys` differs from
/// the number of parties in `params`.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn share_with_seed<G: Group, R: CryptoRng + RngCore>(
    params: &DhpvssParams<G>,
    recipient_key: &PublicKey<G>,
    dealer: &Keypair<G>,
    party_keys: &[PublicKey<G>],
    secret: &Secret<G>,
    seed: &[u8],
    rng: &mut R,
) -> Result<(Vec<G::Element>, SharingProof<G>), Error> {
    Error::check_lengths("party keys", params.parties(), party_keys.len())?;

    let mut coefficients = Zeroizing::new(Vec::with_capacity(params.threshold()));
    coefficients.push(*secret.expose_scalar());
    coefficients.extend(derive_scalars::<G>(seed, params.threshold() - 1));

    let dealer_scalar = dealer.secret().expose_scalar();
    let recipient_element = recipient_key.as_element();
    let ciphertexts: Vec<_> = params
        .evaluation_points()
        .iter()
        .zip(party_keys)
        .map(|(&point, party_key)| {
            let share = Zeroizing::new(evaluate_polynomial::<G>(&coefficients, point));
            G::mul_generator(&share) + (party_key.as_element() + recipient_element) * dealer_scalar
        })
        .collect();
    trace!("encrypted shares");

    let mut transcript =
        sharing_transcript(params, dealer.public(), recipient_key, &ciphertexts, party_keys);
    let statement = aggregate_statement(params, &ciphertexts, party_keys, &mut transcript);
    let proof = SharingProof::new(
        dealer.public(),
        dealer.secret(),
        &[statement],
        &mut transcript,
        rng,
    );
    debug!("created sharing proof");
    Ok((ciphertexts, proof))
}

/// Verifies encrypted shares `ciphertexts` produced by the dealer with the public key
/// `dealer_key` for the specified recipient and parties.
///
/// Returns `Ok(false)` if the proof does not verify.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the number of `ciphertexts` or `party_keys` differs
/// from the number of parties in `params`.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn verify<G: Group>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    recipient_key: &PublicKey<G>,
    ciphertexts: &[G::Element],
    party_keys: &[PublicKey<G>],
    proof: &SharingProof<G>,
) -> Result<bool, Error> {
    Error::check_lengths("ciphertexts", params.parties(), ciphertexts.len())?;
    Error::check_lengths("party keys", params.parties(), party_keys.len())?;

    let mut transcript =
        sharing_transcript(params, dealer_key, recipient_key, ciphertexts, party_keys);
    let statement = aggregate_statement(params, ciphertexts, party_keys, &mut transcript);
    match proof.verify(dealer_key, &[statement], &mut transcript) {
        Ok(()) => Ok(true),
        Err(err) => {
            debug!(%err, "sharing proof rejected");
            Ok(false)
        }
    }
}
