//! # quartz-crypto
//!
//! Keccak-256 hashing for the Quartz ABI codec.
//!
//! The codec never hashes on its own: selector and topic computation go
//! through the [`Keccak256`] trait, so callers can substitute their own
//! implementation. [`Sha3Keccak`] is the default, backed by the `sha3`
//! crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod keccak;

pub use keccak::{keccak256, Keccak256, Sha3Keccak};
