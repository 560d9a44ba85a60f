use elliptic_curve::{
    generic_array::{typenum::Unsigned, GenericArray},
    group::{Curve as _, Group as _},
    sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    CurveArithmetic, Field, FieldBytesSize, PrimeField, ProjectivePoint, Scalar,
};
use rand_core::{CryptoRng, RngCore};

use core::marker::PhantomData;

use crate::group::{ElementOps, Group, ScalarOps};

/// Generic [`Group`] implementation for elliptic curves defined in terms of the traits
/// from the [`elliptic-curve`] crate.
///
/// # Assumptions
///
/// - Arithmetic operations required to be constant-time as per [`ScalarOps`] and [`ElementOps`]
///   contracts are indeed constant-time.
///
/// Elements are serialized in the compressed SEC1 form (the point at infinity, which
/// has no such form, is written as all zeros and never deserialized).
///
/// [`elliptic-curve`]: https://docs.rs/elliptic-curve/
#[derive(Debug)]
pub struct Generic<C>(PhantomData<C>);

impl<C> Clone for Generic<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Generic<C> {}

impl<C: CurveArithmetic> ScalarOps for Generic<C> {
    type Scalar = Scalar<C>;

    const SCALAR_SIZE: usize = <FieldBytesSize<C> as Unsigned>::USIZE;

    fn generate_scalar<R: CryptoRng + RngCore>(rng: &mut R) -> Self::Scalar {
        <Scalar<C> as Field>::random(rng)
    }

    fn invert_scalar(scalar: Self::Scalar) -> Self::Scalar {
        Option::from(<Scalar<C> as Field>::invert(&scalar)).unwrap_or_default()
    }

    fn serialize_scalar(scalar: &Self::Scalar, buffer: &mut [u8]) {
        let repr = <Scalar<C> as PrimeField>::to_repr(scalar);
        buffer.copy_from_slice(repr.as_ref());
    }

    fn deserialize_scalar(buffer: &[u8]) -> Option<Self::Scalar> {
        if buffer.len() != Self::SCALAR_SIZE {
            return None;
        }
        let repr = GenericArray::clone_from_slice(buffer);
        <Scalar<C> as PrimeField>::from_repr(repr).into()
    }
}

impl<C> ElementOps for Generic<C>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    C::AffinePoint: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    type Element = ProjectivePoint<C>;

    const ELEMENT_SIZE: usize = <FieldBytesSize<C> as Unsigned>::USIZE + 1;

    fn identity() -> Self::Element {
        ProjectivePoint::<C>::identity()
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.is_identity().into()
    }

    fn generator() -> Self::Element {
        ProjectivePoint::<C>::generator()
    }

    fn serialize_element(element: &Self::Element, buffer: &mut [u8]) {
        if Self::is_identity(element) {
            buffer.fill(0);
        } else {
            let encoded_point = element.to_affine().to_encoded_point(true);
            buffer.copy_from_slice(encoded_point.as_bytes());
        }
    }

    fn deserialize_element(buffer: &[u8]) -> Option<Self::Element> {
        let encoded_point = EncodedPoint::<C>::from_bytes(buffer).ok()?;
        let affine_point: Option<C::AffinePoint> =
            C::AffinePoint::from_encoded_point(&encoded_point).into();
        affine_point.map(ProjectivePoint::<C>::from)
    }
}

impl<C> Group for Generic<C>
where
    C: CurveArithmetic + 'static,
    FieldBytesSize<C>: ModulusSize,
    C::AffinePoint: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
}
