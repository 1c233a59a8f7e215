use std::collections::{HashMap, HashSet};

use revm::primitives::Address;
use tracing::debug;

use crate::{
    api::exec::{CallContext, RngContextTr, ScopedContext},
    precompiles::ncsprng::{CallFailure, CallResult, CallStage},
    result::RngError,
    state::StateCapabilities,
};

/// Precompile entry point. State is reached through the call's
/// [`ScopedContext`], never through the host context directly.
pub type StatefulPrecompileFn<CTX> = fn(&mut ScopedContext<'_, CTX>, &CallContext) -> CallResult;

#[derive(Clone, Debug)]
pub struct StatefulPrecompileWithAddress<CTX: RngContextTr>(pub Address, pub StatefulPrecompileFn<CTX>);

/// Address-keyed set of precompiles that may touch state.
#[derive(Clone, Debug)]
pub struct StatefulPrecompiles<CTX: RngContextTr> {
    inner: HashMap<Address, StatefulPrecompileFn<CTX>>,
    addresses: HashSet<Address>,
}

impl<CTX: RngContextTr> Default for StatefulPrecompiles<CTX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<CTX: RngContextTr> StatefulPrecompiles<CTX> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
            addresses: HashSet::new(),
        }
    }

    pub fn insert(&mut self, address: Address, precompile: StatefulPrecompileFn<CTX>) {
        self.addresses.insert(address);
        self.inner.insert(address, precompile);
    }

    pub fn extend<I: IntoIterator<Item = StatefulPrecompileWithAddress<CTX>>>(&mut self, iter: I) {
        for StatefulPrecompileWithAddress(address, precompile) in iter {
            self.insert(address, precompile);
        }
    }

    pub fn get(&self, address: &Address) -> Option<&StatefulPrecompileFn<CTX>> {
        self.inner.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Runs the precompile registered at `call.address`, if any.
    ///
    /// The precompile sees state through a [`ScopedContext`], so every write
    /// fails with `WriteProtection` when `call.read_only` is set. A snapshot is
    /// taken before the call. It is released when the call succeeds and
    /// reverted, with every mutation the call made, when it fails.
    pub fn run(&self, context: &mut CTX, call: &CallContext) -> Option<CallResult> {
        let precompile = self.get(&call.address)?;

        let mut scoped = ScopedContext::new(context, call.read_only);
        let snapshot = scoped.state_mut().snapshot();
        let result = precompile(&mut scoped, call);

        match &result {
            Ok(output) => {
                if let Err(err) = scoped.state_mut().discard_snapshot(snapshot) {
                    return Some(Err(CallFailure {
                        error: RngError::State(err),
                        stage: CallStage::Returned,
                        remaining_gas: output.remaining_gas,
                    }));
                }
            }
            Err(failure) => {
                if let Err(err) = scoped.state_mut().revert_to_snapshot(snapshot) {
                    return Some(Err(CallFailure {
                        error: RngError::State(err),
                        stage: failure.stage,
                        remaining_gas: failure.remaining_gas,
                    }));
                }
                debug!(target: "prng::precompile", address = %call.address, snapshot = snapshot.0, "reverted failed call");
            }
        }
        Some(result)
    }
}

impl<CTX: RngContextTr> From<(Address, StatefulPrecompileFn<CTX>)> for StatefulPrecompileWithAddress<CTX> {
    fn from(value: (Address, StatefulPrecompileFn<CTX>)) -> Self {
        StatefulPrecompileWithAddress(value.0, value.1)
    }
}

impl<CTX: RngContextTr> From<StatefulPrecompileWithAddress<CTX>> for (Address, StatefulPrecompileFn<CTX>) {
    fn from(value: StatefulPrecompileWithAddress<CTX>) -> Self {
        (value.0, value.1)
    }
}

impl<CTX: RngContextTr> StatefulPrecompileWithAddress<CTX> {
    /// Returns reference of address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.0
    }

    /// Returns reference of precompile.
    #[inline]
    pub fn precompile(&self) -> &StatefulPrecompileFn<CTX> {
        &self.1
    }
}
