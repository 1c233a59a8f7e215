use core::fmt;

use revm::precompile::{PrecompileError, PrecompileOutput, PrecompileResult};
use revm::primitives::{Address, Bytes};
use tracing::{debug, trace};

use super::{
    gas::deduct_gas,
    generator::{bounded_count, generate},
};
use crate::{
    api::exec::{CallContext, RngContextTr, ScopedContext},
    precompiles::stateful_precompile::StatefulPrecompileWithAddress,
    result::RngError,
    state::StateCapabilities,
};

/// Progress of a single call. Failures report the last stage reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallStage {
    Start,
    GasMetered,
    Decoded,
    Generated,
    Encoded,
    Returned,
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::GasMetered => "gas metered",
            Self::Decoded => "decoded",
            Self::Generated => "generated",
            Self::Encoded => "encoded",
            Self::Returned => "returned",
        };
        f.write_str(name)
    }
}

/// Successful call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutput {
    pub bytes: Bytes,
    pub gas_used: u64,
    pub remaining_gas: u64,
}

/// Failed call.
///
/// Gas charged before the failure stays charged. Out of gas consumes the
/// whole supply, so `remaining_gas` is zero in that case.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{error} (after stage: {stage})")]
pub struct CallFailure {
    pub error: RngError,
    pub stage: CallStage,
    pub remaining_gas: u64,
}

pub type CallResult = Result<CallOutput, CallFailure>;

impl From<CallFailure> for PrecompileError {
    fn from(failure: CallFailure) -> Self {
        failure.error.into()
    }
}

/// Maps a call result onto Revm's precompile result.
pub fn into_precompile_result(result: CallResult) -> PrecompileResult {
    result
        .map(|output| PrecompileOutput::new(output.gas_used, output.bytes))
        .map_err(Into::into)
}

/// Registers the precompile at `address`.
pub fn ncsprng_precompile<CTX: RngContextTr>(address: Address) -> StatefulPrecompileWithAddress<CTX> {
    StatefulPrecompileWithAddress(address, run_scoped::<CTX>)
}

fn run_scoped<CTX: RngContextTr>(ctx: &mut ScopedContext<'_, CTX>, call: &CallContext) -> CallResult {
    ncsprng(ctx, call)
}

/// # NCSPRNG Precompile
///
/// ## Input Encoding
///
/// Typed layout:
///
/// | Function                 | Input                           | Output      |
/// | ------------------------ | ------------------------------- | ----------- |
/// | `randomNCSPRNG(uint256)` | selector ‖ `n` (36 bytes)       | `uint256[]` |
/// | `randomPRNG()`           | selector (4 bytes)              | `uint256`   |
///
/// Raw layout:
///
/// | Field    | Bytes | Description                               |
/// | -------- | ----- | ----------------------------------------- |
/// | `caller` | 20    | Identity the seed is derived from         |
/// | `n`      | 32    | Big-endian count of values                |
/// | `nonce`  | 8     | Big-endian nonce, used as is              |
///
/// Any trailing bytes are ignored, but still paid for.
///
/// ## Nonce
///
/// The typed layout reads the caller's account nonce. The raw layout takes the
/// nonce from the payload. The precompile never writes state.
///
/// ## Gas Cost
///
/// ```text
/// cost = base + floor(len(input) / 32) * per_word
/// ```
///
/// `(base, per_word)` comes from the active [`RngSpecId`](crate::RngSpecId).
/// Gas is charged before the input is decoded.
pub fn ncsprng<CTX: RngContextTr>(ctx: &mut CTX, call: &CallContext) -> CallResult {
    let cfg = *ctx.cfg();
    let mut stage = CallStage::Start;

    let cost = cfg.gas_schedule().required_gas(&call.input);
    let remaining_gas = deduct_gas(call.gas_limit, cost).map_err(|error| {
        debug!(target: "prng::precompile", %error, "out of gas");
        CallFailure {
            error,
            stage,
            remaining_gas: 0,
        }
    })?;
    stage = CallStage::GasMetered;
    trace!(target: "prng::precompile", %stage, cost, remaining_gas);

    let fail = |error: RngError, stage: CallStage| {
        debug!(target: "prng::precompile", %error, %stage, "call failed");
        CallFailure {
            error,
            stage,
            remaining_gas,
        }
    };

    let request = cfg
        .codec()
        .decode_request(&call.input)
        .map_err(|e| fail(e, stage))?;
    let count = bounded_count(request.count, cfg.max_values).map_err(|e| fail(e, stage))?;
    stage = CallStage::Decoded;
    trace!(target: "prng::precompile", %stage, count, shape = ?request.shape);

    let caller = request.caller.unwrap_or(call.caller);
    let nonce = match request.nonce {
        Some(nonce) => nonce,
        None => ctx.state().nonce(caller),
    };
    let values =
        generate(call.address, caller, nonce, count, ctx.entropy()).map_err(|e| fail(e, stage))?;
    stage = CallStage::Generated;
    trace!(target: "prng::precompile", %stage, %caller, nonce);

    let bytes = cfg
        .codec()
        .encode_response(&values, request.shape)
        .map_err(|e| fail(e, stage))?;
    stage = CallStage::Encoded;
    trace!(target: "prng::precompile", %stage, len = bytes.len());

    stage = CallStage::Returned;
    trace!(target: "prng::precompile", %stage, gas_used = cost);
    Ok(CallOutput {
        bytes,
        gas_used: cost,
        remaining_gas,
    })
}
