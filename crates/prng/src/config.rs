//! Per-deployment configuration of the PRNG precompile.

use revm::primitives::Address;

use crate::{
    precompiles::ncsprng::{
        codec::{AbiCodec, CallCodec, RawCodec},
        gas::GasSchedule,
        NCSPRNG_ADDRESS,
    },
    spec::RngSpecId,
};

/// Default ceiling on the number of values produced by one call.
pub const DEFAULT_MAX_VALUES: u64 = 1024;

/// Call-data convention of a deployment.
///
/// The layout also fixes where the nonce comes from: the typed layout reads
/// the caller's account nonce, the raw layout takes it from the payload.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallLayout {
    /// Selector plus ABI-encoded arguments, ABI-encoded `uint256[]` output.
    #[default]
    Abi,
    /// `caller ‖ n ‖ nonce` input, `count ‖ values` output, no selector.
    Raw,
}

impl CallLayout {
    /// Returns the codec implementing this layout.
    pub fn codec(self) -> &'static dyn CallCodec {
        match self {
            Self::Abi => &AbiCodec,
            Self::Raw => &RawCodec,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngConfig {
    /// Protocol version, selects the gas schedule.
    pub spec: RngSpecId,
    pub layout: CallLayout,
    /// Address the precompile is registered at.
    pub address: Address,
    /// Largest count a single call may request.
    pub max_values: u64,
}

impl Default for RngConfig {
    fn default() -> Self {
        Self {
            spec: RngSpecId::default(),
            layout: CallLayout::default(),
            address: NCSPRNG_ADDRESS,
            max_values: DEFAULT_MAX_VALUES,
        }
    }
}

impl RngConfig {
    pub fn with_spec(mut self, spec: RngSpecId) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_layout(mut self, layout: CallLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_max_values(mut self, max_values: u64) -> Self {
        self.max_values = max_values;
        self
    }

    #[inline]
    pub fn gas_schedule(&self) -> GasSchedule {
        self.spec.gas_schedule()
    }

    #[inline]
    pub fn codec(&self) -> &'static dyn CallCodec {
        self.layout.codec()
    }
}
