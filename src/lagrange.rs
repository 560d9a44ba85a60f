//! Lagrange coefficients for polynomial interpolation at zero.
//!
//! The same coefficients serve two purposes in the [`pvss`](crate::pvss) protocol:
//! at setup, they are computed over all evaluation points so that anyone can check
//! that dealt shares are consistent with a low-degree polynomial; at reconstruction,
//! they are computed over the chosen subset of points to recombine partial decryptions.

use tracing::instrument;

use crate::{alloc::Vec, group::Group, Error};

/// Returns evaluation points corresponding to the provided 0-based party `indexes`.
/// A party with index `i` is assigned the point `i + 1`.
pub fn evaluation_points<G: Group>(indexes: impl IntoIterator<Item = usize>) -> Vec<G::Scalar> {
    indexes
        .into_iter()
        .map(|index| G::Scalar::from(index as u64 + 1))
        .collect()
}

/// Computes Lagrange coefficients for interpolation at zero based on the function values
/// at the given `points`.
///
/// For each point `a_i`, the returned coefficient is
///
/// ```text
/// v_i = Π_{j != i} (-a_j) / (a_i - a_j),
/// ```
///
/// i.e., the value of the `i`th Lagrange basis polynomial at zero. All arithmetic is performed
/// in the scalar field of `G`.
///
/// # Errors
///
/// Returns [`Error::DegenerateInput`] if `points` are not pairwise distinct.
#[instrument(level = "trace", skip_all, fields(len = points.len()))]
pub fn lagrange_coefficients<G: Group>(points: &[G::Scalar]) -> Result<Vec<G::Scalar>, Error> {
    let zero = G::Scalar::from(0_u64);
    let one = G::Scalar::from(1_u64);

    let mut numerators = Vec::with_capacity(points.len());
    let mut denominators = Vec::with_capacity(points.len());
    for (i, &point) in points.iter().enumerate() {
        let (numerator, denominator) = points
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .fold((one, one), |(num, denom), (_, &other)| {
                (num * -other, denom * (point - other))
            });
        if denominator == zero {
            return Err(Error::DegenerateInput);
        }
        numerators.push(numerator);
        denominators.push(denominator);
    }

    G::invert_scalars(&mut denominators);
    Ok(numerators
        .into_iter()
        .zip(denominators)
        .map(|(numerator, inverse)| numerator * inverse)
        .collect())
}
