//! Gas accounting for the PRNG precompile.
//!
//! Cost depends only on the declared shape of the call, never on the work
//! performed afterwards. Metering runs before decoding, so oversized or
//! malformed payloads are still charged.

use crate::result::RngError;

/// Base cost of every call.
pub const NCSPRNG_BASE_GAS: u64 = 1024;

/// Linear gas schedule `base + floor(len / 32) * per_word`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasSchedule {
    pub base: u64,
    /// Charged per full 32-byte word of call data.
    pub per_word: u64,
}

impl GasSchedule {
    /// Flat cost, independent of the payload.
    pub const FLAT: Self = Self {
        base: NCSPRNG_BASE_GAS,
        per_word: 0,
    };

    /// One extra gas per full word of call data.
    pub const CALLDATA_METERED: Self = Self {
        base: NCSPRNG_BASE_GAS,
        per_word: 1,
    };

    /// Gas required to process `input`.
    pub fn required_gas(&self, input: &[u8]) -> u64 {
        let words = (input.len() / 32) as u64;
        self.base.saturating_add(words.saturating_mul(self.per_word))
    }
}

/// Deducts `cost` from `supplied`, returning the gas left.
pub fn deduct_gas(supplied: u64, cost: u64) -> Result<u64, RngError> {
    supplied.checked_sub(cost).ok_or(RngError::OutOfGas {
        required: cost,
        supplied,
    })
}
