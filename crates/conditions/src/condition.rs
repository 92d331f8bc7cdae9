//! The condition value: an immutable, portable fingerprint of a
//! verification predicate.

use core::fmt;

use ccond_codec::{
    read_var_octet_string, read_var_uint, write_var_octet_string, write_var_uint, BufDecoder,
    Codec, CodecError, Decoder, Encoder,
};

use crate::errors::{ConditionError, Result};
use crate::type_ids::{ConditionTypeId, MAX_FULFILLMENT_LENGTH, SUPPORTED_FEATURES};
use crate::uri::{self, base64url_decode, base64url_encode, parse_hex_u32};

/// A condition commits to the type, feature set, worst-case fulfillment
/// size and predicate hash of a verification predicate.
///
/// Anyone holding a condition can later verify a claimed fulfillment
/// against it without trusting the party that produced either.  The binary
/// form is:
///
/// ```txt
/// u16 type_id (BE) | varuint features | var octet string hash | varuint max_fulfillment_length
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    type_id: ConditionTypeId,
    features: u32,
    hash: Vec<u8>,
    max_fulfillment_length: u64,
}

impl Condition {
    /// Constructs a new instance from its four committed fields.
    pub fn new(
        type_id: ConditionTypeId,
        features: u32,
        hash: Vec<u8>,
        max_fulfillment_length: u64,
    ) -> Self {
        Self {
            type_id,
            features,
            hash,
            max_fulfillment_length,
        }
    }

    /// Gets the type ID.
    pub fn type_id(&self) -> ConditionTypeId {
        self.type_id
    }

    /// Gets the feature bitmask a fulfiller must support.
    pub fn features(&self) -> u32 {
        self.features
    }

    /// Gets the predicate hash.  For Ed25519 conditions this is the public
    /// key itself rather than a digest.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Gets the committed upper bound on fulfillment size.
    pub fn max_fulfillment_length(&self) -> u64 {
        self.max_fulfillment_length
    }

    /// Checks that this implementation can process fulfillments of this
    /// condition: every feature bit must be supported and the committed
    /// fulfillment size must be within bounds.
    pub fn validate(&self) -> Result<()> {
        let unsupported = self.features & !SUPPORTED_FEATURES;
        if unsupported != 0 {
            return Err(ConditionError::UnsupportedFeature(unsupported));
        }

        if self.max_fulfillment_length > MAX_FULFILLMENT_LENGTH {
            return Err(ConditionError::TooLarge {
                what: "max fulfillment length",
                len: self.max_fulfillment_length,
                max: MAX_FULFILLMENT_LENGTH,
            });
        }

        Ok(())
    }

    /// Writes the binary form through any encoder sink.
    pub fn write_to(&self, enc: &mut impl Encoder) -> std::result::Result<(), CodecError> {
        self.type_id.as_u16().encode(enc)?;
        write_var_uint(enc, self.features as u64)?;
        write_var_octet_string(enc, &self.hash)?;
        write_var_uint(enc, self.max_fulfillment_length)
    }

    /// Serializes the binary form into a vec.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Reads the binary form from a decoder.
    pub fn read_from(dec: &mut impl Decoder) -> Result<Self> {
        let type_id = ConditionTypeId::try_from(u16::decode(dec)?)?;

        let features = read_var_uint(dec)?;
        let features = u32::try_from(features)
            .map_err(|_| ConditionError::Malformed("feature bitmask out of range"))?;

        let hash = read_var_octet_string(dec)?;
        let max_fulfillment_length = read_var_uint(dec)?;

        Ok(Self::new(type_id, features, hash, max_fulfillment_length))
    }

    /// Parses the binary form, rejecting trailing bytes.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut dec = BufDecoder::new(buf);
        let condition = Self::read_from(&mut dec)?;
        if dec.remaining() > 0 {
            return Err(CodecError::ExtraInput.into());
        }
        Ok(condition)
    }

    /// Parses a `cc:` URI.
    pub fn parse_uri(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [scheme, type_id, features, hash, max_len]: [&str; 5] = parts
            .try_into()
            .map_err(|_| ConditionError::Malformed("condition uri needs five segments"))?;

        if scheme != uri::CONDITION_SCHEME {
            return Err(ConditionError::Malformed("expected cc: scheme"));
        }

        let type_id = parse_hex_u32(type_id)?;
        let type_id = u16::try_from(type_id)
            .map_err(|_| ConditionError::Malformed("type id out of range"))?;
        let type_id = ConditionTypeId::try_from(type_id)?;

        let features = parse_hex_u32(features)?;
        let hash = base64url_decode(hash)?;
        let max_fulfillment_length = max_len
            .parse::<u64>()
            .map_err(|_| ConditionError::Malformed("invalid max fulfillment length"))?;

        Ok(Self::new(type_id, features, hash, max_fulfillment_length))
    }

    /// Emits the canonical `cc:` URI.
    pub fn to_uri(&self) -> String {
        format!(
            "{}:{:x}:{:x}:{}:{}",
            uri::CONDITION_SCHEME,
            self.type_id.as_u16(),
            self.features,
            base64url_encode(&self.hash),
            self.max_fulfillment_length
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}
