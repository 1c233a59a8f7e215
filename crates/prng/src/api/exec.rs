use revm::primitives::{Address, Bytes};

use crate::{
    config::RngConfig,
    entropy::EntropySource,
    state::{scope::CallScope, StateCapabilities},
};

/// Everything a stateful precompile may reach from the host.
pub trait RngContextTr {
    type State: StateCapabilities;
    type Entropy: EntropySource;

    fn state(&self) -> &Self::State;

    fn state_mut(&mut self) -> &mut Self::State;

    fn entropy(&self) -> &Self::Entropy;

    fn cfg(&self) -> &RngConfig;

    /// Borrows the state mutably together with the read-only parts.
    fn parts_mut(&mut self) -> (&mut Self::State, &Self::Entropy, &RngConfig);
}

/// Host context as seen by a precompile during one call.
///
/// State is only reachable through a [`CallScope`], so a read-only call
/// cannot mutate it, whatever the precompile does.
pub struct ScopedContext<'a, CTX: RngContextTr> {
    state: CallScope<&'a mut CTX::State>,
    entropy: &'a CTX::Entropy,
    cfg: &'a RngConfig,
}

impl<'a, CTX: RngContextTr> ScopedContext<'a, CTX> {
    pub fn new(context: &'a mut CTX, read_only: bool) -> Self {
        let (state, entropy, cfg) = context.parts_mut();
        Self {
            state: CallScope::new(state, read_only),
            entropy,
            cfg,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.state.is_read_only()
    }
}

impl<'a, CTX: RngContextTr> RngContextTr for ScopedContext<'a, CTX> {
    type State = CallScope<&'a mut CTX::State>;
    type Entropy = CTX::Entropy;

    fn state(&self) -> &Self::State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut Self::State {
        &mut self.state
    }

    fn entropy(&self) -> &Self::Entropy {
        self.entropy
    }

    fn cfg(&self) -> &RngConfig {
        self.cfg
    }

    fn parts_mut(&mut self) -> (&mut Self::State, &Self::Entropy, &RngConfig) {
        (&mut self.state, self.entropy, self.cfg)
    }
}

/// Inputs of a single precompile call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller of the precompile.
    pub caller: Address,
    /// Address the precompile was invoked at.
    pub address: Address,
    pub input: Bytes,
    /// Gas supplied to the call.
    pub gas_limit: u64,
    /// Set for static calls. Every state mutation is rejected.
    pub read_only: bool,
}

impl CallContext {
    pub fn new(caller: Address, address: Address, input: impl Into<Bytes>, gas_limit: u64) -> Self {
        Self {
            caller,
            address,
            input: input.into(),
            gas_limit,
            read_only: false,
        }
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
