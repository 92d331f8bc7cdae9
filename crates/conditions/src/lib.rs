//! # Crypto-conditions
//!
//! Distributable cryptographic commitments and the proofs that satisfy
//! them.  A *condition* is a short fingerprint committing to the type,
//! feature set, worst-case proof size and hash of a verification
//! predicate; a *fulfillment* is the binary object that, together with an
//! optional message, satisfies that predicate.  Any party can check the
//! match offline, which is what makes the format useful for conditional
//! payments and escrow.
//!
//! Five condition types are supported:
//!
//! - **Preimage-SHA-256**: reveal the bytes behind a SHA-256 hashlock.
//! - **Prefix-SHA-256**: prepend fixed bytes to the message, then
//!   delegate to a wrapped fulfillment.
//! - **Threshold-SHA-256**: weighted M-of-N composite over
//!   subconditions, revealing only a minimal covering set of
//!   subfulfillments.
//! - **RSA-SHA-256**: RSA-PSS signature under a committed modulus.
//! - **Ed25519**: pure Ed25519 signature; the condition carries the
//!   public key directly.
//!
//! Conditions travel as `cc:` URIs, fulfillments as `cf:` URIs; both also
//! have canonical binary forms built from a small OER subset
//! (see the `ccond-codec` crate).
//!
//! ## Usage
//!
//! ```rust
//! use ccond::{validate_fulfillment, Fulfillment, PreimageSha256};
//!
//! let fulfillment = Fulfillment::from(PreimageSha256::new(b"my secret".to_vec()));
//! let condition_uri = fulfillment.condition().unwrap().to_uri();
//! let fulfillment_uri = fulfillment.serialize_uri().unwrap();
//!
//! // Later, anyone holding both URIs can verify the match.
//! validate_fulfillment(&fulfillment_uri, &condition_uri, b"").unwrap();
//! ```

mod condition;
mod errors;
mod fulfillment;
pub mod type_ids;
mod uri;

#[cfg(feature = "serde")]
mod serde;

pub use condition::Condition;
pub use errors::{ConditionError, Result};
pub use fulfillment::{
    Ed25519, Fulfillment, MemberEntry, PreimageSha256, PrefixSha256, RsaSha256, ThresholdSha256,
    WeightedMember,
};
pub use type_ids::ConditionTypeId;

/// Parses a `cc:` URI into a [`Condition`].
pub fn from_condition_uri(uri: &str) -> Result<Condition> {
    Condition::parse_uri(uri)
}

/// Parses a `cf:` URI into a [`Fulfillment`].
pub fn from_fulfillment_uri(uri: &str) -> Result<Fulfillment> {
    Fulfillment::parse_uri(uri)
}

/// Checks that a condition URI is well-formed and within this
/// implementation's supported types, features and size bounds.
pub fn validate_condition(uri: &str) -> Result<()> {
    from_condition_uri(uri)?.validate()
}

/// Verifies that a fulfillment satisfies a condition for a message.
///
/// The fulfillment's derived condition must equal the given condition
/// byte-exactly, the serialized fulfillment must fit the condition's
/// committed size bound, and the fulfillment itself must validate against
/// the message.
pub fn validate_fulfillment(
    fulfillment_uri: &str,
    condition_uri: &str,
    message: &[u8],
) -> Result<()> {
    let fulfillment = from_fulfillment_uri(fulfillment_uri)?;
    let condition = from_condition_uri(condition_uri)?;

    if fulfillment.condition()? != condition {
        return Err(ConditionError::ConditionMismatch);
    }

    let payload = fulfillment.serialize_payload()?;
    if payload.len() as u64 > condition.max_fulfillment_length() {
        return Err(ConditionError::TooLarge {
            what: "fulfillment",
            len: payload.len() as u64,
            max: condition.max_fulfillment_length(),
        });
    }

    fulfillment.validate(message)
}

/// Derives the condition URI a fulfillment URI satisfies.
pub fn fulfillment_to_condition(fulfillment_uri: &str) -> Result<String> {
    Ok(from_fulfillment_uri(fulfillment_uri)?.condition()?.to_uri())
}
