//! Diffie–Hellman-based [publicly verifiable secret sharing][pvss] (DHPVSS)
//! with pluggable crypto backend.
//!
//! # ⚠ Warnings
//!
//! While the logic in this crate relies on standard cryptographic assumptions
//! (complexity of discrete log and computational / decisional Diffie–Hellman problems
//! in certain groups), it has not been independently verified for correctness or absence
//! of side-channel attack vectors. **Use at your own risk.**
//!
//! # Overview
//!
//! - [`pvss`] module implements the secret sharing protocol: a dealer splits a secret group
//!   element among `n` parties, so that any `t` of them can help a designated recipient
//!   reconstruct it. Sharing and partial decryption are publicly verifiable.
//! - The protocol participants are represented by [`PublicKey`], [`SecretKey`] and
//!   [`Keypair`].
//! - Zero-knowledge proofs of discrete log equality the protocol relies on are available
//!   as standalone building blocks: [`LogEqualityProof`], [`BatchLogEqualityProof`]
//!   and [`VectorLogEqualityProof`].
//! - [`lagrange`] module computes Lagrange coefficients for interpolation at zero;
//!   [`derive_scalars()`] deterministically expands a seed into scalars.
//!
//! # Backends
//!
//! [`group`] module exposes a generic framework for plugging a [`Group`]
//! implementation into crypto primitives. It also provides several implementations:
//!
//! - [`Ristretto`] implementation based on Curve25519.
//! - [`Generic`] implementation allowing to plug in any elliptic curve group conforming to
//!   the traits specified by the [`elliptic-curve`] crate. For example,
//!   the secp256k1 curve can be used via the [`k256`] crate.
//!
//! # Crate features
//!
//! ## `std`
//!
//! *(on by default)*
//!
//! Enables support of types from `std`, such as the `Error` trait. Without this feature,
//! the crate is `no_std`-compatible, but still requires an allocator.
//!
//! ## `curve25519-dalek`
//!
//! *(on by default)*
//!
//! Implements [`Group`] for the Ristretto transform of Curve25519 (aka ristretto255)
//! using the [`curve25519-dalek`] crate.
//!
//! ## `serde`
//!
//! *(off by default)*
//!
//! Enables [`Serialize`](::serde::Serialize) / [`Deserialize`](::serde::Deserialize)
//! implementations for keys, protocol parameters and proofs.
//! Group scalars and wrapper key types are serialized to human-readable formats
//! (JSON, YAML, TOML, etc.) as strings that represent corresponding byte buffers using
//! base64-url encoding without padding. For binary formats, byte buffers are serialized directly.
//!
//! # Logging
//!
//! Protocol phases are instrumented with [`tracing`] spans on the `debug` level; rejected
//! proofs are reported as `debug` events. Secret values are never logged. The crate does not
//! install a subscriber.
//!
//! [pvss]: https://en.wikipedia.org/wiki/Publicly_Verifiable_Secret_Sharing
//! [`Group`]: group::Group
//! [`Ristretto`]: group::Ristretto
//! [`curve25519-dalek`]: https://docs.rs/curve25519-dalek/
//! [`Generic`]: group::Generic
//! [`elliptic-curve`]: https://docs.rs/elliptic-curve/
//! [`k256`]: https://docs.rs/k256/
//! [`tracing`]: https://docs.rs/tracing/

#![cfg_attr(not(feature = "std"), no_std)]
// Documentation settings.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/dhpvss/0.1.0")]
// Linter settings.
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

mod derive;
mod error;
pub mod group;
mod keys;
pub mod lagrange;
mod proofs;
pub mod pvss;
#[cfg(feature = "serde")]
mod serde;

// Polyfill for `alloc` types.
mod alloc {
    #[cfg(not(feature = "std"))]
    extern crate alloc as std;

    pub use std::{string::ToString, vec, vec::Vec};
}

pub use crate::{
    derive::derive_scalars,
    error::Error,
    keys::{Keypair, PublicKey, PublicKeyConversionError, SecretKey},
    proofs::{
        BatchLogEqualityProof, LogEqualityProof, VectorLogEqualityProof, VerificationError,
    },
};
