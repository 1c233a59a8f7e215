//! Stateful precompiles exposed by this crate.
//!
//! # Modules
//!
//! - [`ncsprng`]: deterministic pseudo-random values derived from the caller's
//!     identity and nonce, expanded with HMAC-SHA256.
//! - [`stateful_precompile`]: address-keyed registry with snapshot rollback on
//!     failure.

pub mod ncsprng;
pub mod stateful_precompile;
pub use stateful_precompile::StatefulPrecompiles;

use revm::{
    precompile::PrecompileResult,
    primitives::{Address, Bytes},
};

use crate::{
    api::exec::{CallContext, RngContextTr},
    config::RngConfig,
    spec::RngSpecId,
};
use ncsprng::{into_precompile_result, ncsprng_precompile, CallResult, NCSPRNG_ADDRESS};

/// Precompile provider for a PRNG-enabled chain.
#[derive(Debug, Clone)]
pub struct RngPrecompiles<CTX: RngContextTr> {
    stateful_precompiles: StatefulPrecompiles<CTX>,
    address: Address,
    spec: RngSpecId,
}

impl<CTX: RngContextTr> RngPrecompiles<CTX> {
    /// Create a new [`RngPrecompiles`] with the given precompiles.
    pub fn new(spec: RngSpecId, address: Address, precompiles: StatefulPrecompiles<CTX>) -> Self {
        Self {
            stateful_precompiles: precompiles,
            address,
            spec,
        }
    }

    /// Create a new precompile provider with the given spec at the default address.
    #[inline]
    pub fn new_with_spec(spec: RngSpecId) -> Self {
        Self::new_with_address(spec, NCSPRNG_ADDRESS)
    }

    /// Create a new precompile provider matching `cfg`.
    #[inline]
    pub fn new_with_config(cfg: &RngConfig) -> Self {
        Self::new_with_address(cfg.spec, cfg.address)
    }

    fn new_with_address(spec: RngSpecId, address: Address) -> Self {
        match spec {
            RngSpecId::GENESIS | RngSpecId::CALLDATA_METERED => {
                Self::new(spec, address, genesis::<CTX>(address))
            }
        }
    }

    pub fn spec(&self) -> RngSpecId {
        self.spec
    }

    /// Rebuilds the precompile set for `spec`, keeping the address.
    #[inline]
    pub fn set_spec(&mut self, spec: RngSpecId) {
        *self = Self::new_with_address(spec, self.address);
    }

    /// Runs the precompile at `call.address`.
    ///
    /// Returns `None` if no precompile is registered there.
    #[inline]
    pub fn run(&mut self, context: &mut CTX, call: &CallContext) -> Option<CallResult> {
        self.stateful_precompiles.run(context, call)
    }

    /// Like [`RngPrecompiles::run`], with Revm's result type.
    pub fn run_precompile(
        &mut self,
        context: &mut CTX,
        caller: Address,
        address: &Address,
        bytes: &Bytes,
        gas_limit: u64,
        read_only: bool,
    ) -> Option<PrecompileResult> {
        let call = CallContext::new(caller, *address, bytes.clone(), gas_limit)
            .with_read_only(read_only);
        self.run(context, &call).map(into_precompile_result)
    }

    #[inline]
    pub fn warm_addresses(&self) -> Box<impl Iterator<Item = Address> + '_> {
        Box::new(self.stateful_precompiles.addresses().copied())
    }

    #[inline]
    pub fn contains(&self, address: &Address) -> bool {
        self.stateful_precompiles.contains(address)
    }
}

impl<CTX: RngContextTr> Default for RngPrecompiles<CTX> {
    fn default() -> Self {
        Self::new_with_spec(RngSpecId::default())
    }
}

/// Returns the precompiles available since GENESIS.
pub fn genesis<CTX: RngContextTr>(address: Address) -> StatefulPrecompiles<CTX> {
    let mut precompiles = StatefulPrecompiles::new();
    precompiles.extend([ncsprng_precompile::<CTX>(address)]);
    precompiles
}
