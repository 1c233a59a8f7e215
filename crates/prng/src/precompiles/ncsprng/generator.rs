//! Seed derivation and value expansion.
//!
//! ```text
//! server_seed = keccak256(contract)
//! user_seed   = keccak256(caller ‖ server_seed)
//! value_i     = HMAC-SHA256(key = server_seed, msg = user_seed ‖ u64_be(nonce) ‖ u64_be(i) [‖ entropy])
//! ```
//!
//! Values are read as big-endian 256-bit integers and returned in index order.
//! Nothing is cached between calls.

use hmac::{Hmac, Mac};
use revm::primitives::{keccak256, Address, B256, U256};
use sha2::Sha256;

use crate::{entropy::EntropySource, result::RngError};

type HmacSha256 = Hmac<Sha256>;

/// Per-caller seed pair, a pure function of the two addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedMaterial {
    pub server_seed: B256,
    pub user_seed: B256,
}

impl SeedMaterial {
    pub fn derive(contract: Address, caller: Address) -> Self {
        let server_seed = keccak256(contract);

        let mut preimage = [0u8; 20 + 32];
        preimage[..20].copy_from_slice(caller.as_slice());
        preimage[20..].copy_from_slice(server_seed.as_slice());

        Self {
            server_seed,
            user_seed: keccak256(preimage),
        }
    }
}

/// Converts a requested count into the generator's index domain.
///
/// Counts beyond `u64` are [`RngError::ValueOverflow`], counts beyond `max`
/// are [`RngError::RequestTooLarge`].
pub fn bounded_count(count: U256, max: u64) -> Result<u64, RngError> {
    let requested = u64::try_from(count).map_err(|_| RngError::ValueOverflow(count))?;
    if requested > max {
        return Err(RngError::RequestTooLarge { requested, max });
    }
    Ok(requested)
}

/// Produces `count` values for `caller` at `nonce`.
pub fn generate<E: EntropySource>(
    contract: Address,
    caller: Address,
    nonce: u64,
    count: u64,
    entropy: &E,
) -> Result<Vec<U256>, RngError> {
    let seed = SeedMaterial::derive(contract, caller);
    let extra = entropy.entropy(caller, nonce);

    let keyed = HmacSha256::new_from_slice(seed.server_seed.as_slice())
        .map_err(|e| RngError::Fatal(e.to_string()))?;
    let capacity = usize::try_from(count).map_err(|_| RngError::ValueOverflow(U256::from(count)))?;

    let mut values = Vec::with_capacity(capacity);
    for index in 0..count {
        let mut mac = keyed.clone();
        mac.update(seed.user_seed.as_slice());
        mac.update(&nonce.to_be_bytes());
        mac.update(&index.to_be_bytes());
        if let Some(extra) = extra {
            mac.update(extra.as_slice());
        }
        values.push(U256::from_be_slice(&mac.finalize().into_bytes()));
    }
    Ok(values)
}
