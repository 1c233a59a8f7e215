//! Extension point for mixing external entropy into generated values.
//!
//! The precompile on its own is a deterministic function of public data:
//! anyone can precompute every value a caller will receive. Deployments that
//! need unpredictability (lotteries, leader election) have to layer a
//! commit-reveal scheme or an external beacon on top, and can feed its output
//! in through [`EntropySource`]. The default [`NoEntropy`] leaves the
//! derivation untouched.

use std::sync::Arc;

use auto_impl::auto_impl;
use revm::primitives::{Address, B256};

/// Supplies an optional 32-byte word appended to every HMAC message.
///
/// Implementations must return the same word for the same inputs within a
/// block, otherwise nodes disagree on the call result.
#[auto_impl(&, Box, Arc)]
pub trait EntropySource {
    fn entropy(&self, caller: Address, nonce: u64) -> Option<B256>;
}

/// Contributes no entropy. Output is fully reproducible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoEntropy;

impl EntropySource for NoEntropy {
    #[inline]
    fn entropy(&self, _caller: Address, _nonce: u64) -> Option<B256> {
        None
    }
}

/// Fixed entropy word, e.g. a revealed beacon value for the current block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedEntropy(pub B256);

impl EntropySource for FixedEntropy {
    #[inline]
    fn entropy(&self, _caller: Address, _nonce: u64) -> Option<B256> {
        Some(self.0)
    }
}
