//! # quartz-primitives
//!
//! Primitive types for the Quartz contract ABI codec.
//!
//! Provides the fundamental byte-oriented types the codec operates on:
//! 20-byte addresses, 32-byte words/topics, and 256-bit integers.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub use address::Address;
pub use error::PrimitiveError;
pub use hash::H256;

// Re-export primitive-types for U256
pub use primitive_types::U256;
