//! Deterministic pseudo-random value precompile for Revm.
//!
//! The precompile derives a per-caller seed from public identity data and
//! expands it with HMAC-SHA256 into a sequence of 256-bit values. The output
//! is reproducible by anyone and must not be used where unpredictability
//! matters.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod api;
pub mod config;
pub mod entropy;
pub mod precompiles;
pub mod result;
pub mod spec;
pub mod state;

pub use api::{
    default_ctx::{DefaultRng, RngContext},
    exec::{CallContext, RngContextTr, ScopedContext},
};
pub use config::{CallLayout, RngConfig};
pub use entropy::{EntropySource, NoEntropy};
pub use precompiles::{
    ncsprng::{CallFailure, CallOutput, CallResult, CallStage, NCSPRNG_ADDRESS},
    RngPrecompiles,
};
pub use result::{RngError, StateError};
pub use spec::*;
pub use state::{in_memory::InMemoryState, scope::CallScope, SnapshotId, StateCapabilities};
