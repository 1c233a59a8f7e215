use super::{
    codec::{CallCodec, GenerationRequest, IRandom, ResponseShape, RAW_INPUT_LEN},
    generator::generate,
    ncsprng, CallFailure, CallStage, NCSPRNG_ADDRESS,
};
use crate::{
    api::{
        default_ctx::{DefaultRng, RngContext},
        exec::{CallContext, RngContextTr},
    },
    config::{CallLayout, RngConfig},
    entropy::{FixedEntropy, NoEntropy},
    precompiles::RngPrecompiles,
    result::{RngError, StateError},
    spec::RngSpecId,
    state::{in_memory::InMemoryState, StateCapabilities},
};
use alloy_sol_types::SolCall;
use revm::primitives::{address, Address, Bytes, B256, U256};
use rstest::rstest;

const CALLER: Address = address!("abcdabcdabcdabcdabcdabcdabcdabcdabcdabcd");
const NONCE: u64 = 7;

fn setup(layout: CallLayout) -> RngContext {
    RngContext::ncsprng()
        .with_state(InMemoryState::new().with_nonce(CALLER, NONCE))
        .with_cfg(RngConfig::default().with_layout(layout))
}

fn abi_call(n: U256, gas_limit: u64) -> CallContext {
    let input = IRandom::randomNCSPRNGCall { n }.abi_encode();
    CallContext::new(CALLER, NCSPRNG_ADDRESS, input, gas_limit)
}

fn raw_call(caller: Address, n: U256, nonce: u64, gas_limit: u64) -> CallContext {
    let input = CallLayout::Raw
        .codec()
        .encode_request(&GenerationRequest::raw(caller, n, nonce))
        .unwrap();
    // the payload names the identity, the immediate caller is irrelevant
    CallContext::new(Address::ZERO, NCSPRNG_ADDRESS, input, gas_limit)
}

fn decode(ctx: &RngContext, bytes: &Bytes, shape: ResponseShape) -> Vec<U256> {
    ctx.cfg().codec().decode_response(bytes, shape).unwrap()
}

#[test]
fn test_example_scenario() {
    let mut ctx = setup(CallLayout::Abi);
    let call = abi_call(U256::from(3), 1024);

    let output = ncsprng(&mut ctx, &call).unwrap();
    assert_eq!(output.gas_used, 1024);
    assert_eq!(output.remaining_gas, 0);

    let values = decode(&ctx, &output.bytes, ResponseShape::Sequence);
    assert_eq!(
        values,
        generate(NCSPRNG_ADDRESS, CALLER, NONCE, 3, &NoEntropy).unwrap()
    );

    let again = ncsprng(&mut ctx, &call).unwrap();
    assert_eq!(output, again);
}

#[test]
fn test_zero_values() {
    let mut ctx = setup(CallLayout::Abi);
    let output = ncsprng(&mut ctx, &abi_call(U256::ZERO, 5000)).unwrap();
    assert!(decode(&ctx, &output.bytes, ResponseShape::Sequence).is_empty());
    assert_eq!(output.remaining_gas, 5000 - 1024);
}

#[test]
fn test_random_prng_returns_first_value() {
    let mut ctx = setup(CallLayout::Abi);
    let input = IRandom::randomPRNGCall {}.abi_encode();
    let call = CallContext::new(CALLER, NCSPRNG_ADDRESS, input, 2000);

    let output = ncsprng(&mut ctx, &call).unwrap();
    assert_eq!(output.bytes.len(), 32);

    let sequence = ncsprng(&mut ctx, &abi_call(U256::from(4), 2000)).unwrap();
    assert_eq!(
        decode(&ctx, &output.bytes, ResponseShape::Single)[0],
        decode(&ctx, &sequence.bytes, ResponseShape::Sequence)[0]
    );
}

#[test]
fn test_callers_get_distinct_values() {
    let other = address!("1111111111111111111111111111111111111111");
    let mut ctx = RngContext::ncsprng().with_state(
        InMemoryState::new()
            .with_nonce(CALLER, NONCE)
            .with_nonce(other, NONCE),
    );

    let mine = ncsprng(&mut ctx, &abi_call(U256::from(2), 1024)).unwrap();
    let mut theirs_call = abi_call(U256::from(2), 1024);
    theirs_call.caller = other;
    let theirs = ncsprng(&mut ctx, &theirs_call).unwrap();

    assert_ne!(mine.bytes, theirs.bytes);
}

#[test]
fn test_state_nonce_drives_output() {
    let mut ctx = setup(CallLayout::Abi);
    let call = abi_call(U256::from(1), 1024);
    let before = ncsprng(&mut ctx, &call).unwrap();

    ctx.state_mut().set_nonce(CALLER, NONCE + 1).unwrap();
    let after = ncsprng(&mut ctx, &call).unwrap();

    assert_ne!(before.bytes, after.bytes);
}

#[test]
fn test_generator_never_writes_state() {
    let mut ctx = setup(CallLayout::Abi);
    ncsprng(&mut ctx, &abi_call(U256::from(8), 1024)).unwrap();
    assert_eq!(ctx.state().journal_len(), 0);
    assert_eq!(ctx.state().snapshot_depth(), 0);
    assert_eq!(ctx.state().nonce(CALLER), NONCE);
}

#[test]
fn test_read_only_call_succeeds() {
    let mut ctx = setup(CallLayout::Abi);
    let call = abi_call(U256::from(3), 1024);
    let writable = ncsprng(&mut ctx, &call).unwrap();
    let read_only = ncsprng(&mut ctx, &call.with_read_only(true)).unwrap();
    assert_eq!(writable, read_only);
}

#[rstest]
#[case::exact(1024, Some(0))]
#[case::surplus(1_000_000, Some(1_000_000 - 1024))]
#[case::one_short(1023, None)]
#[case::empty(0, None)]
fn test_gas_boundary(#[case] gas_limit: u64, #[case] remaining: Option<u64>) {
    let mut ctx = setup(CallLayout::Abi);
    let result = ncsprng(&mut ctx, &abi_call(U256::from(3), gas_limit));

    match remaining {
        Some(remaining) => assert_eq!(result.unwrap().remaining_gas, remaining),
        None => assert_eq!(
            result,
            Err(CallFailure {
                error: RngError::OutOfGas {
                    required: 1024,
                    supplied: gas_limit
                },
                stage: CallStage::Start,
                remaining_gas: 0,
            })
        ),
    }
}

#[test]
fn test_calldata_metered_schedule() {
    let mut ctx = setup(CallLayout::Abi);
    ctx.modify_cfg(|cfg| cfg.spec = RngSpecId::CALLDATA_METERED);

    // 36 bytes of input is one full word
    let output = ncsprng(&mut ctx, &abi_call(U256::from(3), 1025)).unwrap();
    assert_eq!(output.gas_used, 1025);
    assert_eq!(output.remaining_gas, 0);

    let failure = ncsprng(&mut ctx, &abi_call(U256::from(3), 1024)).unwrap_err();
    assert!(failure.error.is_oog());
}

#[test]
fn test_malformed_input_is_charged() {
    let mut ctx = setup(CallLayout::Abi);
    let call = CallContext::new(CALLER, NCSPRNG_ADDRESS, Bytes::from_static(&[0x27]), 3000);

    let failure = ncsprng(&mut ctx, &call).unwrap_err();
    assert_eq!(failure.error, RngError::MissingSelector);
    assert_eq!(failure.stage, CallStage::GasMetered);
    assert_eq!(failure.remaining_gas, 3000 - 1024);
}

#[test]
fn test_unknown_selector() {
    let mut ctx = setup(CallLayout::Abi);
    let call = CallContext::new(
        CALLER,
        NCSPRNG_ADDRESS,
        Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        3000,
    );
    assert_eq!(
        ncsprng(&mut ctx, &call).unwrap_err().error,
        RngError::UnknownSelector(0xdeadbeef)
    );
}

#[rstest]
#[case::above_u64(U256::from(u64::MAX) + U256::from(1), RngError::ValueOverflow(U256::from(u64::MAX) + U256::from(1)))]
#[case::max(U256::MAX, RngError::ValueOverflow(U256::MAX))]
#[case::above_ceiling(U256::from(1025), RngError::RequestTooLarge { requested: 1025, max: 1024 })]
fn test_count_out_of_domain(#[case] n: U256, #[case] expected: RngError) {
    let mut ctx = setup(CallLayout::Abi);
    let failure = ncsprng(&mut ctx, &abi_call(n, 5000)).unwrap_err();
    assert_eq!(failure.error, expected);
    assert_eq!(failure.stage, CallStage::GasMetered);
    assert_eq!(failure.remaining_gas, 5000 - 1024);
}

#[test]
fn test_ceiling_is_configurable() {
    let mut ctx = setup(CallLayout::Abi);
    ctx.modify_cfg(|cfg| cfg.max_values = 2);

    assert!(ncsprng(&mut ctx, &abi_call(U256::from(2), 1024)).is_ok());
    assert_eq!(
        ncsprng(&mut ctx, &abi_call(U256::from(3), 1024))
            .unwrap_err()
            .error,
        RngError::RequestTooLarge {
            requested: 3,
            max: 2
        }
    );
}

#[test]
fn test_raw_layout_uses_payload_identity_and_nonce() {
    let mut ctx = setup(CallLayout::Raw);
    let output = ncsprng(&mut ctx, &raw_call(CALLER, U256::from(3), NONCE, 1024)).unwrap();

    assert_eq!(output.bytes.len(), 32 * 4);
    assert_eq!(U256::from_be_slice(&output.bytes[..32]), U256::from(3));
    assert_eq!(
        decode(&ctx, &output.bytes, ResponseShape::Sequence),
        generate(NCSPRNG_ADDRESS, CALLER, NONCE, 3, &NoEntropy).unwrap()
    );

    // the state nonce plays no part
    ctx.state_mut().set_nonce(CALLER, 1000).unwrap();
    let again = ncsprng(&mut ctx, &raw_call(CALLER, U256::from(3), NONCE, 1024)).unwrap();
    assert_eq!(output.bytes, again.bytes);
}

#[test]
fn test_raw_and_abi_agree_on_values() {
    let mut abi = setup(CallLayout::Abi);
    let mut raw = setup(CallLayout::Raw);

    let from_abi = ncsprng(&mut abi, &abi_call(U256::from(5), 1024)).unwrap();
    let from_raw = ncsprng(&mut raw, &raw_call(CALLER, U256::from(5), NONCE, 1024)).unwrap();

    assert_eq!(
        decode(&abi, &from_abi.bytes, ResponseShape::Sequence),
        decode(&raw, &from_raw.bytes, ResponseShape::Sequence)
    );
}

#[test]
fn test_raw_short_input() {
    let mut ctx = setup(CallLayout::Raw);
    let call = CallContext::new(CALLER, NCSPRNG_ADDRESS, vec![0u8; RAW_INPUT_LEN - 1], 2000);
    let failure = ncsprng(&mut ctx, &call).unwrap_err();
    assert_eq!(
        failure.error,
        RngError::InvalidInputLength {
            expected: 60,
            actual: 59
        }
    );
    assert_eq!(failure.remaining_gas, 2000 - 1024);
}

#[test]
fn test_raw_trailing_bytes_are_metered() {
    let mut ctx = setup(CallLayout::Raw);
    ctx.modify_cfg(|cfg| cfg.spec = RngSpecId::CALLDATA_METERED);

    let mut call = raw_call(CALLER, U256::from(1), NONCE, 10_000);
    let plain = ncsprng(&mut ctx, &call).unwrap();
    assert_eq!(plain.gas_used, 1024 + 1);

    let mut input = call.input.to_vec();
    input.extend_from_slice(&[0xff; 64]);
    call.input = input.into();
    let padded = ncsprng(&mut ctx, &call).unwrap();

    assert_eq!(padded.gas_used, 1024 + 3);
    assert_eq!(plain.bytes, padded.bytes);
}

#[test]
fn test_entropy_source_changes_output() {
    let mut plain = setup(CallLayout::Abi);
    let mut mixed = setup(CallLayout::Abi).with_entropy(FixedEntropy(B256::repeat_byte(0x42)));
    let call = abi_call(U256::from(2), 1024);

    let a = ncsprng(&mut plain, &call).unwrap();
    let b = ncsprng(&mut mixed, &call).unwrap();
    assert_ne!(a.bytes, b.bytes);
    assert_eq!(b, ncsprng(&mut mixed, &call).unwrap());
}

#[test]
fn test_registry_reverts_and_keeps_state_consistent() {
    let mut precompiles = RngPrecompiles::<RngContext>::default();
    let mut ctx = setup(CallLayout::Abi);

    let ok = precompiles.run(&mut ctx, &abi_call(U256::from(2), 1024));
    assert!(matches!(ok, Some(Ok(_))));

    let failed = precompiles.run(&mut ctx, &abi_call(U256::MAX, 1024));
    assert!(matches!(failed, Some(Err(_))));

    assert_eq!(ctx.state().journal_len(), 0);
    assert_eq!(ctx.state().snapshot_depth(), 0);
    assert_eq!(ctx.state().nonce(CALLER), NONCE);
}

#[test]
fn test_read_only_scope_rejects_writes() {
    let mut ctx = setup(CallLayout::Abi);
    let mut scope = crate::state::scope::CallScope::new(ctx.state_mut(), true);
    assert_eq!(
        scope.set_nonce(CALLER, 1),
        Err(StateError::WriteProtection)
    );
    assert_eq!(
        RngError::from(StateError::WriteProtection),
        RngError::State(StateError::WriteProtection)
    );
}
