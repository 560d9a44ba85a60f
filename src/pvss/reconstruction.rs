//! Reconstruction of the shared secret by the recipient.

use tracing::{instrument, trace};

use super::DhpvssParams;
use crate::{
    alloc::Vec,
    group::Group,
    lagrange::{evaluation_points, lagrange_coefficients},
    Error, PublicKey, SecretKey,
};

/// Reconstructs the shared secret `S = [s]G` from partial decryptions of the parties
/// with the specified 0-based `indexes`.
///
/// `partial_decryptions` must contain decryptions of all parties ordered by the party index;
/// only the ones at `indexes` are used. It is the caller's responsibility to
/// [verify](super::verify_decryption()) the decryptions beforehand.
///
/// # Errors
///
/// - Returns [`Error::LengthMismatch`] if the number of `partial_decryptions` differs
///   from the number of parties in `params`.
/// - Returns [`Error::InsufficientShares`] if fewer than `threshold` indexes are provided.
/// - Returns [`Error::InvalidIndex`] if any of `indexes` is out of bounds.
/// - Returns [`Error::DegenerateInput`] if `indexes` contain duplicates.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold(), shares = indexes.len())
)]
pub fn reconstruct<G: Group>(
    params: &DhpvssParams<G>,
    partial_decryptions: &[G::Element],
    dealer_key: &PublicKey<G>,
    recipient_secret: &SecretKey<G>,
    indexes: &[usize],
) -> Result<G::Element, Error> {
    Error::check_lengths(
        "partial decryptions",
        params.parties(),
        partial_decryptions.len(),
    )?;
    if indexes.len() < params.threshold() {
        return Err(Error::InsufficientShares {
            required: params.threshold(),
            provided: indexes.len(),
        });
    }
    for &index in indexes {
        params.check_index(index)?;
    }

    let points = evaluation_points::<G>(indexes.iter().copied());
    let coefficients = lagrange_coefficients::<G>(&points)?;
    let selected: Vec<_> = indexes
        .iter()
        .map(|&index| partial_decryptions[index])
        .collect();
    let masked_secret = G::vartime_multi_mul(&coefficients, selected);
    trace!("interpolated partial decryptions");

    Ok(masked_secret - dealer_key.as_element() * recipient_secret.expose_scalar())
}
