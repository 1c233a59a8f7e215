use core::str::FromStr;

use crate::precompiles::ncsprng::gas::GasSchedule;

/// Protocol versions of the PRNG precompile.
///
/// The gas schedule is part of the protocol, so any change to it is a new
/// variant rather than an edit of an existing one.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
pub enum RngSpecId {
    /// Flat 1024 gas per call.
    #[default]
    GENESIS = 0,
    /// 1024 gas plus one gas per full 32-byte word of call data.
    CALLDATA_METERED = 1,
}

impl RngSpecId {
    /// Returns the gas schedule active under this spec.
    pub const fn gas_schedule(self) -> GasSchedule {
        match self {
            Self::GENESIS => GasSchedule::FLAT,
            Self::CALLDATA_METERED => GasSchedule::CALLDATA_METERED,
        }
    }

    pub const fn is_enabled_in(self, other: RngSpecId) -> bool {
        other as u8 <= self as u8
    }
}

/// Returned when parsing an unknown spec name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown prng spec: {0}")]
pub struct UnknownRngSpec(pub String);

impl FromStr for RngSpecId {
    type Err = UnknownRngSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            name::GENESIS => Ok(RngSpecId::GENESIS),
            name::CALLDATA_METERED => Ok(RngSpecId::CALLDATA_METERED),
            _ => Err(UnknownRngSpec(s.to_string())),
        }
    }
}

impl From<RngSpecId> for &'static str {
    fn from(spec_id: RngSpecId) -> Self {
        match spec_id {
            RngSpecId::GENESIS => name::GENESIS,
            RngSpecId::CALLDATA_METERED => name::CALLDATA_METERED,
        }
    }
}

/// String identifiers for PRNG protocol versions
pub mod name {
    pub const GENESIS: &str = "Genesis";
    pub const CALLDATA_METERED: &str = "CalldataMetered";
}
