//! Deterministic pseudo-random value precompile.
//!
//! Output is a function of the contract address, the caller, a nonce and an
//! index. It is reproducible by anyone who knows those inputs.
//!
//! # Modules
//!
//! - [`codec`]: typed (ABI) and raw call-data layouts.
//! - [`gas`]: gas schedule and deduction.
//! - [`generator`]: seed derivation and HMAC-SHA256 expansion.
//! - [`precompile`]: the dispatcher tying the pieces together.

pub mod codec;
pub mod gas;
pub mod generator;
pub mod precompile;

#[cfg(test)]
mod test;

pub use precompile::{
    into_precompile_result, ncsprng, ncsprng_precompile, CallFailure, CallOutput, CallResult,
    CallStage,
};

use revm::{precompile::u64_to_address, primitives::Address};

/// Default address of the precompile, `0x…069420`.
pub const NCSPRNG_ADDRESS: Address = u64_to_address(0x69420);
