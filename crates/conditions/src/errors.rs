//! Error types for the crypto-conditions library.

use ccond_codec::CodecError;
use thiserror::Error;

/// Errors that can occur when working with conditions and fulfillments.
///
/// Every failure is surfaced to the caller as one of these kinds; the
/// library never retries and never partially succeeds.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// Binary input that doesn't decode (truncation, bad length prefixes).
    #[error("malformed encoding: {0}")]
    Parse(#[from] CodecError),

    /// Structurally invalid input outside the byte-level codec (bad URI
    /// shape, invalid base64, inconsistent payload fields).
    #[error("malformed input: {0}")]
    Malformed(&'static str),

    /// Type ID outside the registry.
    #[error("unsupported condition type {0}")]
    UnsupportedType(u16),

    /// Feature bits outside the implementation's supported mask.
    #[error("unsupported feature bits {0:#04x}")]
    UnsupportedFeature(u32),

    /// Signing or serialization attempted with a required field unset.
    #[error("missing {0}")]
    MissingData(&'static str),

    /// A supplied value was structurally valid but unacceptable (wrong-length
    /// key, leading-zero modulus, zero weight).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Too little weight among the provided subfulfillments.
    #[error("threshold not met (required {required}, present {present})")]
    ThresholdNotMet {
        /// The weight the condition requires.
        required: u64,
        /// The fulfilled weight actually present.
        present: u64,
    },

    /// A subfulfillment of a composite failed its own validation.
    #[error("subfulfillment did not validate: {0}")]
    InvalidSubfulfillment(#[source] Box<ConditionError>),

    /// A cryptographic signature check failed.
    #[error("signature verification failed")]
    InvalidSignature,

    /// The fulfillment's derived condition differs from the one given.
    #[error("fulfillment does not match condition")]
    ConditionMismatch,

    /// A length exceeds a supported bound.
    #[error("{what} too large ({len} > {max})")]
    TooLarge {
        /// What was oversized.
        what: &'static str,
        /// The observed value.
        len: u64,
        /// The bound it exceeded.
        max: u64,
    },
}

/// Result type alias for condition operations.
pub type Result<T> = std::result::Result<T, ConditionError>;
