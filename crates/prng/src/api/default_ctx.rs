use crate::{
    api::exec::RngContextTr,
    config::RngConfig,
    entropy::{EntropySource, NoEntropy},
    state::{in_memory::InMemoryState, StateCapabilities},
};

/// Default host context: state, entropy source and configuration.
#[derive(Clone, Debug, Default)]
pub struct RngContext<S = InMemoryState, E = NoEntropy> {
    pub state: S,
    pub entropy: E,
    pub cfg: RngConfig,
}

impl<S, E> RngContext<S, E> {
    pub fn new(state: S, entropy: E, cfg: RngConfig) -> Self {
        Self {
            state,
            entropy,
            cfg,
        }
    }

    pub fn with_state<OS>(self, state: OS) -> RngContext<OS, E> {
        RngContext {
            state,
            entropy: self.entropy,
            cfg: self.cfg,
        }
    }

    pub fn with_entropy<OE>(self, entropy: OE) -> RngContext<S, OE> {
        RngContext {
            state: self.state,
            entropy,
            cfg: self.cfg,
        }
    }

    pub fn with_cfg(mut self, cfg: RngConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Changes the configuration in place.
    pub fn modify_cfg<F: FnOnce(&mut RngConfig)>(&mut self, f: F) {
        f(&mut self.cfg);
    }
}

impl<S: StateCapabilities, E: EntropySource> RngContextTr for RngContext<S, E> {
    type State = S;
    type Entropy = E;

    fn state(&self) -> &S {
        &self.state
    }

    fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    fn entropy(&self) -> &E {
        &self.entropy
    }

    fn cfg(&self) -> &RngConfig {
        &self.cfg
    }

    fn parts_mut(&mut self) -> (&mut S, &E, &RngConfig) {
        (&mut self.state, &self.entropy, &self.cfg)
    }
}

/// Trait that allows for a default context to be created.
pub trait DefaultRng {
    /// Create a default context.
    fn ncsprng() -> RngContext;
}

impl DefaultRng for RngContext {
    fn ncsprng() -> Self {
        Self::default()
    }
}
