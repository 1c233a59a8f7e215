//! Call-data codecs.
//!
//! A deployment speaks exactly one layout, chosen by
//! [`CallLayout`](crate::CallLayout):
//!
//! | Layout | Input | Output |
//! | ------ | ----- | ------ |
//! | typed  | 4-byte selector ‖ ABI arguments | ABI-encoded return value |
//! | raw    | 20-byte caller ‖ 32-byte `n` ‖ 8-byte nonce | 32-byte count ‖ `n` × 32-byte values |
//!
//! Both codecs validate lengths before interpreting any field.

use alloy_sol_types::{sol, SolCall, SolValue};
use revm::primitives::{Address, Bytes, U256};

use crate::result::RngError;

sol! {
    interface IRandom {
        function randomNCSPRNG(uint256 n) external view returns (uint256[] memory randomValues);
        function randomPRNG() external view returns (uint256 randomValue);
    }
}

/// Length of a 4-byte method identifier.
pub const SELECTOR_LEN: usize = 4;

/// Typed input length of `randomNCSPRNG(uint256)`.
pub const NCSPRNG_CALL_LEN: usize = SELECTOR_LEN + 32;

/// Minimum raw input length: caller, count and nonce.
pub const RAW_INPUT_LEN: usize = 20 + 32 + 8;

/// Shape of the value returned to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// Every generated value, in index order.
    #[default]
    Sequence,
    /// Only the first value, as a single word.
    Single,
}

/// Decoded arguments of one call.
///
/// `caller` and `nonce` are only carried by the raw layout. When absent the
/// dispatcher takes them from the call context and the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: U256,
    pub caller: Option<Address>,
    pub nonce: Option<u64>,
    pub shape: ResponseShape,
}

impl GenerationRequest {
    /// `randomNCSPRNG(n)`.
    pub fn sequence(count: U256) -> Self {
        Self {
            count,
            caller: None,
            nonce: None,
            shape: ResponseShape::Sequence,
        }
    }

    /// `randomPRNG()`, a single value.
    pub fn single() -> Self {
        Self {
            count: U256::from(1),
            caller: None,
            nonce: None,
            shape: ResponseShape::Single,
        }
    }

    /// Raw request carrying its own identity and nonce.
    pub fn raw(caller: Address, count: U256, nonce: u64) -> Self {
        Self {
            count,
            caller: Some(caller),
            nonce: Some(nonce),
            shape: ResponseShape::Sequence,
        }
    }
}

/// Encoding strategy for requests and responses.
pub trait CallCodec: core::fmt::Debug + Send + Sync {
    /// Parses call data into a request.
    fn decode_request(&self, input: &[u8]) -> Result<GenerationRequest, RngError>;

    /// Builds call data for `request`.
    fn encode_request(&self, request: &GenerationRequest) -> Result<Bytes, RngError>;

    /// Serializes generated values.
    fn encode_response(&self, values: &[U256], shape: ResponseShape) -> Result<Bytes, RngError>;

    /// Parses output produced by [`CallCodec::encode_response`].
    fn decode_response(&self, output: &[u8], shape: ResponseShape)
        -> Result<Vec<U256>, RngError>;
}

/// Selector-routed ABI layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbiCodec;

impl CallCodec for AbiCodec {
    fn decode_request(&self, input: &[u8]) -> Result<GenerationRequest, RngError> {
        let selector: [u8; SELECTOR_LEN] = input
            .get(..SELECTOR_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(RngError::MissingSelector)?;
        let args = &input[SELECTOR_LEN..];

        match selector {
            IRandom::randomNCSPRNGCall::SELECTOR => {
                if input.len() != NCSPRNG_CALL_LEN {
                    return Err(RngError::InvalidInputLength {
                        expected: NCSPRNG_CALL_LEN,
                        actual: input.len(),
                    });
                }
                Ok(GenerationRequest::sequence(U256::from_be_slice(args)))
            }
            IRandom::randomPRNGCall::SELECTOR => {
                if !args.is_empty() {
                    return Err(RngError::InvalidInputLength {
                        expected: SELECTOR_LEN,
                        actual: input.len(),
                    });
                }
                Ok(GenerationRequest::single())
            }
            other => Err(RngError::UnknownSelector(u32::from_be_bytes(other))),
        }
    }

    fn encode_request(&self, request: &GenerationRequest) -> Result<Bytes, RngError> {
        if request.caller.is_some() || request.nonce.is_some() {
            return Err(RngError::EncodingFailure(
                "typed layout carries no caller or nonce".into(),
            ));
        }
        let data = match request.shape {
            ResponseShape::Sequence => {
                SolCall::abi_encode(&IRandom::randomNCSPRNGCall { n: request.count })
            }
            ResponseShape::Single => SolCall::abi_encode(&IRandom::randomPRNGCall {}),
        };
        Ok(data.into())
    }

    fn encode_response(&self, values: &[U256], shape: ResponseShape) -> Result<Bytes, RngError> {
        let data = match shape {
            ResponseShape::Sequence => SolValue::abi_encode(&values.to_vec()),
            ResponseShape::Single => match values {
                [value] => SolValue::abi_encode(value),
                _ => {
                    return Err(RngError::EncodingFailure(format!(
                        "single-value response needs exactly one value, got {}",
                        values.len()
                    )))
                }
            },
        };
        Ok(data.into())
    }

    fn decode_response(
        &self,
        output: &[u8],
        shape: ResponseShape,
    ) -> Result<Vec<U256>, RngError> {
        let decoded = match shape {
            ResponseShape::Sequence => <Vec<U256> as SolValue>::abi_decode(output, true),
            ResponseShape::Single => <U256 as SolValue>::abi_decode(output, true).map(|v| vec![v]),
        };
        decoded.map_err(|e| RngError::EncodingFailure(e.to_string()))
    }
}

/// Fixed-offset layout without a selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawCodec;

impl CallCodec for RawCodec {
    fn decode_request(&self, input: &[u8]) -> Result<GenerationRequest, RngError> {
        if input.len() < RAW_INPUT_LEN {
            return Err(RngError::InvalidInputLength {
                expected: RAW_INPUT_LEN,
                actual: input.len(),
            });
        }

        let caller = Address::from_slice(&input[..20]);
        let count = U256::from_be_slice(&input[20..52]);
        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&input[52..RAW_INPUT_LEN]);

        Ok(GenerationRequest::raw(caller, count, u64::from_be_bytes(nonce)))
    }

    fn encode_request(&self, request: &GenerationRequest) -> Result<Bytes, RngError> {
        let (Some(caller), Some(nonce)) = (request.caller, request.nonce) else {
            return Err(RngError::EncodingFailure(
                "raw layout requires caller and nonce".into(),
            ));
        };
        let mut data = Vec::with_capacity(RAW_INPUT_LEN);
        data.extend_from_slice(caller.as_slice());
        data.extend_from_slice(&request.count.to_be_bytes::<32>());
        data.extend_from_slice(&nonce.to_be_bytes());
        Ok(data.into())
    }

    fn encode_response(&self, values: &[U256], shape: ResponseShape) -> Result<Bytes, RngError> {
        if shape != ResponseShape::Sequence {
            return Err(RngError::EncodingFailure(
                "raw layout only returns sequences".into(),
            ));
        }
        let mut data = Vec::with_capacity(32 * (values.len() + 1));
        data.extend_from_slice(&U256::from(values.len()).to_be_bytes::<32>());
        for value in values {
            data.extend_from_slice(&value.to_be_bytes::<32>());
        }
        Ok(data.into())
    }

    fn decode_response(
        &self,
        output: &[u8],
        shape: ResponseShape,
    ) -> Result<Vec<U256>, RngError> {
        if shape != ResponseShape::Sequence {
            return Err(RngError::EncodingFailure(
                "raw layout only returns sequences".into(),
            ));
        }
        if output.len() < 32 {
            return Err(RngError::EncodingFailure("missing element count".into()));
        }
        let (count, body) = output.split_at(32);
        let count = U256::from_be_slice(count);
        let matches = usize::try_from(count).is_ok_and(|n| body.len() / 32 == n);
        if !matches || body.len() % 32 != 0 {
            return Err(RngError::EncodingFailure(format!(
                "element count {count} does not match {} payload bytes",
                body.len()
            )));
        }
        Ok(body.chunks_exact(32).map(U256::from_be_slice).collect())
    }
}
