//! Fulfillment variants and the dispatch shared between them.
//!
//! A fulfillment is the proof object that satisfies a condition.  Every
//! variant implements the same protocol: write its hash payload (what the
//! condition hash commits to), write its fulfillment payload (what goes on
//! the wire), predict its worst-case size and validate itself against a
//! message.  The enum here routes each operation to the variant.

mod ed25519;
mod preimage;
mod prefix;
mod rsa;
mod threshold;

pub use ed25519::Ed25519;
pub use preimage::PreimageSha256;
pub use prefix::PrefixSha256;
pub use rsa::RsaSha256;
pub use threshold::{MemberEntry, ThresholdSha256, WeightedMember};

use ccond_codec::{
    read_var_octet_string, write_var_octet_string, BufDecoder, Codec, CodecError, Decoder,
    Encoder, Sha256Hasher,
};

use crate::condition::Condition;
use crate::errors::{ConditionError, Result};
use crate::type_ids::{ConditionTypeId, MAX_NESTING_DEPTH};
use crate::uri::{self, base64url_decode, base64url_encode, parse_hex_u32};

/// A fulfillment for one of the five supported condition types.
///
/// The binary form is `u16 type_id (BE) | var octet string payload`; the
/// textual form is `cf:<hex type_id>:<base64url payload>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fulfillment {
    /// SHA-256 preimage hashlock.
    Preimage(PreimageSha256),
    /// Prefix wrapper around another fulfillment.
    Prefix(PrefixSha256),
    /// Weighted threshold composite.
    Threshold(ThresholdSha256),
    /// RSA-PSS signature.
    Rsa(RsaSha256),
    /// Ed25519 signature.
    Ed25519(Ed25519),
}

impl Fulfillment {
    /// Gets the type ID of the contained variant.
    pub fn type_id(&self) -> ConditionTypeId {
        match self {
            Fulfillment::Preimage(_) => ConditionTypeId::PreimageSha256,
            Fulfillment::Prefix(_) => ConditionTypeId::PrefixSha256,
            Fulfillment::Threshold(_) => ConditionTypeId::ThresholdSha256,
            Fulfillment::Rsa(_) => ConditionTypeId::RsaSha256,
            Fulfillment::Ed25519(_) => ConditionTypeId::Ed25519,
        }
    }

    /// Computes the feature bitmask a verifier needs for this fulfillment,
    /// including subfulfillment features for composites.
    pub fn features(&self) -> Result<u32> {
        match self {
            Fulfillment::Preimage(f) => Ok(f.features()),
            Fulfillment::Prefix(f) => f.features(),
            Fulfillment::Threshold(f) => f.features(),
            Fulfillment::Rsa(f) => Ok(f.features()),
            Fulfillment::Ed25519(f) => Ok(f.features()),
        }
    }

    /// Derives the condition this fulfillment satisfies.
    pub fn condition(&self) -> Result<Condition> {
        Ok(Condition::new(
            self.type_id(),
            self.features()?,
            self.generate_hash()?,
            self.calculate_max_fulfillment_length()? as u64,
        ))
    }

    /// Checks whether this fulfillment satisfies its predicate for the
    /// given message.
    pub fn validate(&self, message: &[u8]) -> Result<()> {
        match self {
            Fulfillment::Preimage(f) => f.validate(),
            Fulfillment::Prefix(f) => f.validate(message),
            Fulfillment::Threshold(f) => f.validate(message),
            Fulfillment::Rsa(f) => f.validate(message),
            Fulfillment::Ed25519(f) => f.validate(message),
        }
    }

    /// Serializes the type-specific payload into a vec.
    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_payload(&mut buf)?;
        Ok(buf)
    }

    /// Serializes the binary form (`u16 type_id | var octet string payload`).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = self.serialize_payload()?;
        let mut buf = Vec::new();
        self.type_id().as_u16().encode(&mut buf)?;
        write_var_octet_string(&mut buf, &payload)?;
        Ok(buf)
    }

    /// Emits the canonical `cf:` URI.
    pub fn serialize_uri(&self) -> Result<String> {
        let payload = self.serialize_payload()?;
        Ok(format!(
            "{}:{:x}:{}",
            uri::FULFILLMENT_SCHEME,
            self.type_id().as_u16(),
            base64url_encode(&payload)
        ))
    }

    /// Parses a `cf:` URI.
    pub fn parse_uri(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [scheme, type_id, payload]: [&str; 3] = parts
            .try_into()
            .map_err(|_| ConditionError::Malformed("fulfillment uri needs three segments"))?;

        if scheme != uri::FULFILLMENT_SCHEME {
            return Err(ConditionError::Malformed("expected cf: scheme"));
        }

        let type_id = parse_hex_u32(type_id)?;
        let type_id = u16::try_from(type_id)
            .map_err(|_| ConditionError::Malformed("type id out of range"))?;
        let type_id = ConditionTypeId::try_from(type_id)?;

        let payload = base64url_decode(payload)?;
        Self::parse_payload(type_id, &payload, 0)
    }

    /// Parses the binary form, rejecting trailing bytes.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::parse_binary_at_depth(buf, 0)
    }

    /// Parses the binary form at a given composite nesting depth.
    pub(crate) fn parse_binary_at_depth(buf: &[u8], depth: usize) -> Result<Self> {
        let mut dec = BufDecoder::new(buf);
        let type_id = ConditionTypeId::try_from(u16::decode(&mut dec)?)?;
        let payload = read_var_octet_string(&mut dec)?;
        if dec.remaining() > 0 {
            return Err(CodecError::ExtraInput.into());
        }

        Self::parse_payload(type_id, &payload, depth)
    }

    /// Parses a type-specific payload, dispatching on the type ID.
    ///
    /// Composite types recurse through here with an incremented depth; the
    /// nesting ceiling bounds stack usage on adversarial input.
    pub(crate) fn parse_payload(
        type_id: ConditionTypeId,
        payload: &[u8],
        depth: usize,
    ) -> Result<Self> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ConditionError::TooLarge {
                what: "composite nesting depth",
                len: depth as u64,
                max: MAX_NESTING_DEPTH as u64,
            });
        }

        match type_id {
            ConditionTypeId::PreimageSha256 => {
                Ok(Fulfillment::Preimage(PreimageSha256::parse_payload(payload)))
            }
            ConditionTypeId::PrefixSha256 => {
                Ok(Fulfillment::Prefix(PrefixSha256::parse_payload(payload, depth)?))
            }
            ConditionTypeId::ThresholdSha256 => Ok(Fulfillment::Threshold(
                ThresholdSha256::parse_payload(payload, depth)?,
            )),
            ConditionTypeId::RsaSha256 => {
                Ok(Fulfillment::Rsa(RsaSha256::parse_payload(payload)?))
            }
            ConditionTypeId::Ed25519 => {
                Ok(Fulfillment::Ed25519(Ed25519::parse_payload(payload)?))
            }
        }
    }

    /// Writes the type-specific payload through any encoder sink.
    pub(crate) fn write_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        match self {
            Fulfillment::Preimage(f) => Ok(f.write_payload(enc)?),
            Fulfillment::Prefix(f) => f.write_payload(enc),
            Fulfillment::Threshold(f) => f.write_payload(enc),
            Fulfillment::Rsa(f) => f.write_payload(enc),
            Fulfillment::Ed25519(f) => f.write_payload(enc),
        }
    }

    /// Writes the payload the condition hash commits to.
    pub(crate) fn write_hash_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        match self {
            Fulfillment::Preimage(f) => Ok(f.write_hash_payload(enc)?),
            Fulfillment::Prefix(f) => f.write_hash_payload(enc),
            Fulfillment::Threshold(f) => f.write_hash_payload(enc),
            Fulfillment::Rsa(f) => f.write_hash_payload(enc),
            Fulfillment::Ed25519(f) => f.write_hash_payload(enc),
        }
    }

    /// Computes the condition's hash field.
    ///
    /// For every hashed type this is the SHA-256 of the hash payload.
    /// Ed25519 conditions instead expose the 32-byte public key directly,
    /// which is already a binding commitment.
    pub(crate) fn generate_hash(&self) -> Result<Vec<u8>> {
        match self {
            Fulfillment::Ed25519(f) => f.public_key_hash(),
            _ => {
                let mut hasher = Sha256Hasher::new();
                self.write_hash_payload(&mut hasher)?;
                Ok(hasher.digest().to_vec())
            }
        }
    }

    /// Predicts the worst-case size of any fulfillment payload satisfying
    /// this fulfillment's condition.
    pub(crate) fn calculate_max_fulfillment_length(&self) -> Result<usize> {
        match self {
            Fulfillment::Preimage(f) => Ok(f.max_fulfillment_length()),
            Fulfillment::Prefix(f) => f.max_fulfillment_length(),
            Fulfillment::Threshold(f) => f.max_fulfillment_length(),
            Fulfillment::Rsa(f) => f.max_fulfillment_length(),
            Fulfillment::Ed25519(f) => Ok(f.max_fulfillment_length()),
        }
    }
}

impl From<PreimageSha256> for Fulfillment {
    fn from(f: PreimageSha256) -> Self {
        Fulfillment::Preimage(f)
    }
}

impl From<PrefixSha256> for Fulfillment {
    fn from(f: PrefixSha256) -> Self {
        Fulfillment::Prefix(f)
    }
}

impl From<ThresholdSha256> for Fulfillment {
    fn from(f: ThresholdSha256) -> Self {
        Fulfillment::Threshold(f)
    }
}

impl From<RsaSha256> for Fulfillment {
    fn from(f: RsaSha256) -> Self {
        Fulfillment::Rsa(f)
    }
}

impl From<Ed25519> for Fulfillment {
    fn from(f: Ed25519) -> Self {
        Fulfillment::Ed25519(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uri_unknown_type() {
        let err = Fulfillment::parse_uri("cf:9:").unwrap_err();
        assert!(matches!(err, ConditionError::UnsupportedType(9)));
    }

    #[test]
    fn test_parse_uri_malformed() {
        assert!(Fulfillment::parse_uri("cf:0").is_err());
        assert!(Fulfillment::parse_uri("cc:0:").is_err());
        assert!(Fulfillment::parse_uri("cf:0:!!!").is_err());
    }

    #[test]
    fn test_binary_roundtrip() {
        let fulfillment = Fulfillment::from(PreimageSha256::new(b"secret".to_vec()));
        let buf = fulfillment.to_bytes().unwrap();
        assert_eq!(&buf[..3], &[0x00, 0x00, 0x06]);

        let parsed = Fulfillment::from_bytes(&buf).unwrap();
        assert_eq!(parsed, fulfillment);
    }

    #[test]
    fn test_binary_rejects_trailing_bytes() {
        let fulfillment = Fulfillment::from(PreimageSha256::new(b"secret".to_vec()));
        let mut buf = fulfillment.to_bytes().unwrap();
        buf.push(0xff);
        assert!(Fulfillment::from_bytes(&buf).is_err());
    }

    #[test]
    fn test_nesting_depth_bounded() {
        // A tower of prefix wrappers one deeper than the ceiling.
        let mut fulfillment = Fulfillment::from(PreimageSha256::new(Vec::new()));
        for _ in 0..MAX_NESTING_DEPTH {
            fulfillment = Fulfillment::from(PrefixSha256::new(Vec::new(), fulfillment));
        }

        let buf = fulfillment.to_bytes().unwrap();
        assert!(matches!(
            Fulfillment::from_bytes(&buf),
            Err(ConditionError::TooLarge { .. })
        ));
    }
}
