use revm::{precompile::PrecompileError, primitives::U256};

use crate::state::SnapshotId;

/// Reasons a PRNG precompile call fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RngError {
    /// Typed call data shorter than the 4-byte method identifier.
    #[error("function selector is missing")]
    MissingSelector,
    /// Typed call data with a method identifier this precompile does not expose.
    #[error("unknown function selector: {0:#010x}")]
    UnknownSelector(u32),
    /// Call data does not match the length the active layout requires.
    #[error("invalid input length: expected {expected}, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },
    /// Requested count does not fit the generator's index domain.
    #[error("n overflows the generator index domain: {0}")]
    ValueOverflow(U256),
    /// Requested count exceeds the configured ceiling.
    #[error("request too large: {requested} values requested, at most {max} allowed")]
    RequestTooLarge { requested: u64, max: u64 },
    /// Supplied gas does not cover the required gas.
    #[error("out of gas: required {required}, supplied {supplied}")]
    OutOfGas { required: u64, supplied: u64 },
    /// Output could not be serialized, or a response could not be parsed.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
    /// A state capability rejected the operation.
    #[error(transparent)]
    State(#[from] StateError),
    /// Internal invariant violation.
    #[error("fatal: {0}")]
    Fatal(String),
}

impl RngError {
    /// Returns true for the out of gas error.
    pub fn is_oog(&self) -> bool {
        matches!(self, Self::OutOfGas { .. })
    }
}

impl From<RngError> for PrecompileError {
    fn from(err: RngError) -> Self {
        match err {
            RngError::OutOfGas { .. } => PrecompileError::OutOfGas,
            other => PrecompileError::Other(other.to_string().into()),
        }
    }
}

/// Errors raised by [`StateCapabilities`](crate::state::StateCapabilities).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// A mutation was attempted while the call is read-only.
    #[error("write protection: state mutation in read-only call")]
    WriteProtection,
    /// Revert target is not a live snapshot.
    #[error("unknown snapshot: {0:?}")]
    UnknownSnapshot(SnapshotId),
    /// Balance credit would overflow 256 bits.
    #[error("balance overflow")]
    BalanceOverflow,
}
