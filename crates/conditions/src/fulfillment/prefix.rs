//! Prefix wrapper (type 1).
//!
//! Wraps another fulfillment and prepends fixed bytes to the message before
//! delegating validation to it.  The condition commits to the prefix and
//! the wrapped subcondition.

use ccond_codec::{read_var_octet_string, write_var_octet_string, BufDecoder, Encoder, Predictor};

use crate::errors::{ConditionError, Result};
use crate::fulfillment::Fulfillment;
use crate::type_ids::{FEATURE_PREFIX, FEATURE_SHA_256};

/// Prefix fulfillment wrapping a subfulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixSha256 {
    prefix: Vec<u8>,
    subfulfillment: Option<Box<Fulfillment>>,
}

impl PrefixSha256 {
    /// Constructs a new instance from the prefix and the wrapped
    /// fulfillment.
    pub fn new(prefix: Vec<u8>, subfulfillment: Fulfillment) -> Self {
        Self {
            prefix,
            subfulfillment: Some(Box::new(subfulfillment)),
        }
    }

    /// Gets the prefix bytes.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Replaces the prefix.
    pub fn set_prefix(&mut self, prefix: Vec<u8>) {
        self.prefix = prefix;
    }

    /// Gets the wrapped fulfillment, if set.
    pub fn subfulfillment(&self) -> Option<&Fulfillment> {
        self.subfulfillment.as_deref()
    }

    /// Sets the wrapped fulfillment.
    pub fn set_subfulfillment(&mut self, subfulfillment: Fulfillment) {
        self.subfulfillment = Some(Box::new(subfulfillment));
    }

    fn sub(&self) -> Result<&Fulfillment> {
        self.subfulfillment
            .as_deref()
            .ok_or(ConditionError::MissingData("subfulfillment"))
    }

    pub(crate) fn features(&self) -> Result<u32> {
        Ok(FEATURE_SHA_256 | FEATURE_PREFIX | self.sub()?.features()?)
    }

    pub(crate) fn write_hash_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        write_var_octet_string(enc, &self.prefix)?;
        Ok(self.sub()?.condition()?.write_to(enc)?)
    }

    pub(crate) fn write_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        write_var_octet_string(enc, &self.prefix)?;
        let sub_binary = self.sub()?.to_bytes()?;
        Ok(enc.write_buf(&sub_binary)?)
    }

    pub(crate) fn parse_payload(payload: &[u8], depth: usize) -> Result<Self> {
        let mut dec = BufDecoder::new(payload);
        let prefix = read_var_octet_string(&mut dec)?;
        let sub_binary = dec.read_rest();
        let subfulfillment = Fulfillment::parse_binary_at_depth(&sub_binary, depth + 1)?;

        Ok(Self::new(prefix, subfulfillment))
    }

    /// Validates the wrapped fulfillment against `prefix || message`.
    pub(crate) fn validate(&self, message: &[u8]) -> Result<()> {
        let mut effective = Vec::with_capacity(self.prefix.len() + message.len());
        effective.extend_from_slice(&self.prefix);
        effective.extend_from_slice(message);
        self.sub()?.validate(&effective)
    }

    /// Worst case is the prefix framing plus whatever the subcondition
    /// commits to for its own fulfillments.
    pub(crate) fn max_fulfillment_length(&self) -> Result<usize> {
        let sub_max = self.sub()?.calculate_max_fulfillment_length()?;
        let mut predictor = Predictor::new();
        write_var_octet_string(&mut predictor, &self.prefix)?;
        predictor.skip(sub_max);
        Ok(predictor.size())
    }
}
