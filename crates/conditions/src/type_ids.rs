//! Constants for condition types, feature bits and supported limits.

use core::fmt;

use crate::errors::ConditionError;

/// SHA-256 hashing feature bit.
pub const FEATURE_SHA_256: u32 = 0x01;
/// Preimage hashlock feature bit.
pub const FEATURE_PREIMAGE: u32 = 0x02;
/// Prefix wrapper feature bit.
pub const FEATURE_PREFIX: u32 = 0x04;
/// Weighted threshold composite feature bit.
pub const FEATURE_THRESHOLD: u32 = 0x08;
/// RSA-PSS signature feature bit.
pub const FEATURE_RSA_PSS: u32 = 0x10;
/// Ed25519 signature feature bit.
pub const FEATURE_ED25519: u32 = 0x20;

/// Union of every feature bit this implementation can verify.
pub const SUPPORTED_FEATURES: u32 = 0x3f;

/// Largest fulfillment size a condition may commit to.
pub const MAX_FULFILLMENT_LENGTH: u64 = 65_535;

/// Hard ceiling on composite nesting, bounding recursion on adversarial
/// input.
pub const MAX_NESTING_DEPTH: usize = 1024;

/// Largest member count a threshold composite may carry.
pub const MAX_THRESHOLD_MEMBERS: u64 = 65_535;

/// Condition type identifiers.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionTypeId {
    /// SHA-256 preimage hashlock condition type.
    PreimageSha256 = 0,
    /// Prefix wrapper condition type.
    PrefixSha256 = 1,
    /// Weighted threshold composite condition type.
    ThresholdSha256 = 2,
    /// RSA-PSS signature condition type.
    RsaSha256 = 3,
    /// Ed25519 signature condition type.
    Ed25519 = 4,
}

impl ConditionTypeId {
    /// Converts the enum to its underlying u16 value.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl From<ConditionTypeId> for u16 {
    fn from(type_id: ConditionTypeId) -> Self {
        type_id as u16
    }
}

impl TryFrom<u16> for ConditionTypeId {
    type Error = ConditionError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConditionTypeId::PreimageSha256),
            1 => Ok(ConditionTypeId::PrefixSha256),
            2 => Ok(ConditionTypeId::ThresholdSha256),
            3 => Ok(ConditionTypeId::RsaSha256),
            4 => Ok(ConditionTypeId::Ed25519),
            unknown => Err(ConditionError::UnsupportedType(unknown)),
        }
    }
}

impl fmt::Display for ConditionTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTypeId::PreimageSha256 => write!(f, "preimage-sha-256"),
            ConditionTypeId::PrefixSha256 => write!(f, "prefix-sha-256"),
            ConditionTypeId::ThresholdSha256 => write!(f, "threshold-sha-256"),
            ConditionTypeId::RsaSha256 => write!(f, "rsa-sha-256"),
            ConditionTypeId::Ed25519 => write!(f, "ed25519"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_roundtrip() {
        for id in [0u16, 1, 2, 3, 4] {
            let ty = ConditionTypeId::try_from(id).unwrap();
            assert_eq!(ty.as_u16(), id);
        }
    }

    #[test]
    fn test_unknown_type_id() {
        let err = ConditionTypeId::try_from(9).unwrap_err();
        assert!(matches!(err, ConditionError::UnsupportedType(9)));
    }
}
